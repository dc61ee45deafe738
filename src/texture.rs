//! CPU-side images.
//!
//! A [`Texture`] holds decoded 8-bit pixels in memory so they can be sampled
//! on the CPU (heightmaps, procedural lookups) and later turned into a GPU
//! [`Material`](crate::Material). Rows are stored bottom-up: loading flips
//! the image vertically so `v = 0` is the bottom edge, matching OpenGL-style
//! texture coordinates used by the meshes in this crate.

use std::path::{Path, PathBuf};

use crate::math::{Vec2, Vec4};
use crate::resources::Resource;

/// An image in CPU memory with 1 to 4 interleaved 8-bit channels.
///
/// Loading never fails loudly: a missing or undecodable file is logged and
/// the texture stays unloaded. Check [`loaded`](Self::loaded) before relying
/// on its contents. Lookups on an unloaded texture return [`Vec4::ZERO`].
#[derive(Debug, Clone)]
pub struct Texture {
    path: PathBuf,
    width: u32,
    height: u32,
    channels: u8,
    data: Option<Vec<u8>>,
}

impl Texture {
    /// An unloaded texture pointing at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 0,
            height: 0,
            channels: 0,
            data: None,
        }
    }

    /// Creates a texture at `path` and loads it with `channels` channels.
    pub fn open(path: impl Into<PathBuf>, channels: u8) -> Self {
        let mut texture = Self::new(path);
        texture.load(channels);
        texture
    }

    /// Wraps already decoded pixels. Rows are taken bottom-up as given.
    ///
    /// An empty extent, or a buffer whose length does not match
    /// `width * height * channels`, is logged and leaves the texture unloaded.
    pub fn from_pixels(
        label: impl Into<PathBuf>,
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Self {
        let mut texture = Self::new(label);
        let expected = width as usize * height as usize * channels as usize;
        if expected == 0 || !(1..=4).contains(&channels) || data.len() != expected {
            log::error!(
                "Rejected pixel buffer for {}: {} bytes for {}x{} with {} channels",
                texture.path.display(),
                data.len(),
                width,
                height,
                channels
            );
            return texture;
        }
        texture.width = width;
        texture.height = height;
        texture.channels = channels;
        texture.data = Some(data);
        texture
    }

    /// An RGBA checkerboard of `size × size` pixels with square cells of
    /// `cell` pixels.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                data.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self::from_pixels("checkerboard", size, size, 4, data)
    }

    /// Decodes the file at the texture's path.
    ///
    /// `channels` selects the stored layout: 1 grey, 2 grey + alpha, 3 RGB,
    /// 4 RGBA, or 0 to keep whatever the file provides. The image is flipped
    /// vertically. Failures are logged and leave the texture unloaded.
    pub fn load(&mut self, channels: u8) {
        match decode(&self.path, channels) {
            Ok((width, height, channels, data)) => {
                self.width = width;
                self.height = height;
                self.channels = channels;
                self.data = Some(data);
                log::info!(
                    "Loaded texture [{}x{}, {} channels]: {}",
                    width,
                    height,
                    channels,
                    self.path.display()
                );
            }
            Err(err) => {
                self.destroy();
                log::error!("Failed to load texture {}: {}", self.path.display(), err);
            }
        }
    }

    /// Drops the pixel buffer.
    pub fn destroy(&mut self) {
        self.data = None;
        self.width = 0;
        self.height = 0;
        self.channels = 0;
    }

    pub fn loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw interleaved pixels, bottom row first.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Color at integer coordinates, normalized to `[0, 1]`.
    ///
    /// Grey images replicate luminance into RGB. Alpha comes from the last
    /// channel of grey-alpha and RGBA images and is `1.0` otherwise.
    /// Unloaded textures and out-of-range coordinates give [`Vec4::ZERO`].
    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        let Some(data) = &self.data else {
            return Vec4::ZERO;
        };
        if x >= self.width || y >= self.height {
            return Vec4::ZERO;
        }
        let c = self.channels as usize;
        let i = (y as usize * self.width as usize + x as usize) * c;
        let px = &data[i..i + c];
        let n = |b: u8| b as f32 / 255.0;
        match *px {
            [l] => Vec4::new(n(l), n(l), n(l), 1.0),
            [l, a] => Vec4::new(n(l), n(l), n(l), n(a)),
            [r, g, b] => Vec4::new(n(r), n(g), n(b), 1.0),
            [r, g, b, a] => Vec4::new(n(r), n(g), n(b), n(a)),
            _ => Vec4::ZERO,
        }
    }

    /// Nearest-pixel lookup at normalized coordinates.
    ///
    /// Coordinates are scaled by the image size, truncated and clamped to the
    /// last row and column, so `u = 1.0` reads the right edge and nothing
    /// wraps.
    pub fn sample(&self, u: f32, v: f32) -> Vec4 {
        if !self.loaded() || self.width == 0 || self.height == 0 {
            return Vec4::ZERO;
        }
        let x = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1);
        let y = ((v * self.height as f32) as i64).clamp(0, self.height as i64 - 1);
        self.pixel(x as u32, y as u32)
    }

    pub fn sample_uv(&self, uv: Vec2) -> Vec4 {
        self.sample(uv.x, uv.y)
    }

    /// Pixels expanded to RGBA8, bottom row first. `None` when unloaded.
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        let data = self.data.as_ref()?;
        let c = self.channels as usize;
        let mut out = Vec::with_capacity(data.len() / c * 4);
        for px in data.chunks_exact(c) {
            match *px {
                [l] => out.extend_from_slice(&[l, l, l, 255]),
                [l, a] => out.extend_from_slice(&[l, l, l, a]),
                [r, g, b] => out.extend_from_slice(&[r, g, b, 255]),
                [r, g, b, a] => out.extend_from_slice(&[r, g, b, a]),
                _ => return None,
            }
        }
        Some(out)
    }
}

fn decode(path: &Path, channels: u8) -> Result<(u32, u32, u8, Vec<u8>), image::ImageError> {
    let img = image::open(path)?.flipv();
    let (width, height) = (img.width(), img.height());
    let channels = match channels {
        0 => img.color().channel_count().min(4),
        n => n.min(4),
    };
    let data = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    };
    Ok((width, height, channels, data))
}

impl Resource for Texture {
    fn label(&self) -> String {
        format!("texture {}", self.path.display())
    }

    fn release(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_2x2() -> Texture {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0, 255,    0, 255, 0, 255,
            0, 0, 255, 255,    255, 255, 255, 128,
        ];
        Texture::from_pixels("quad", 2, 2, 4, data)
    }

    #[test]
    fn sample_near_one_reads_last_pixel() {
        let t = quad_2x2();
        let p = t.sample(0.99, 0.99);
        assert_eq!(p, Vec4::new(1.0, 1.0, 1.0, 128.0 / 255.0));
    }

    #[test]
    fn sample_at_one_clamps_to_edge() {
        let t = quad_2x2();
        assert_eq!(t.sample(1.0, 0.0), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(t.sample(1.0, 1.0), t.pixel(1, 1));
        assert_eq!(t.sample(-3.0, 7.5), t.pixel(0, 1));
    }

    #[test]
    fn sample_origin_reads_first_pixel() {
        let t = quad_2x2();
        assert_eq!(t.sample(0.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(t.sample_uv(Vec2::new(0.49, 0.51)), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn grey_and_rgb_alpha_defaults() {
        let grey = Texture::from_pixels("grey", 1, 1, 1, vec![51]);
        assert_eq!(grey.pixel(0, 0), Vec4::new(0.2, 0.2, 0.2, 1.0));

        let rgb = Texture::from_pixels("rgb", 1, 1, 3, vec![0, 51, 255]);
        assert_eq!(rgb.pixel(0, 0), Vec4::new(0.0, 0.2, 1.0, 1.0));
        assert_eq!(rgb.to_rgba8(), Some(vec![0, 51, 255, 255]));
    }

    #[test]
    fn unloaded_texture_reads_zero() {
        let t = Texture::new("missing.png");
        assert!(!t.loaded());
        assert_eq!(t.pixel(0, 0), Vec4::ZERO);
        assert_eq!(t.sample(0.5, 0.5), Vec4::ZERO);
        assert_eq!(t.to_rgba8(), None);
    }

    #[test]
    fn missing_file_stays_unloaded() {
        let t = Texture::open("this/path/does/not/exist.png", 4);
        assert!(!t.loaded());
        assert_eq!(t.width(), 0);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let t = Texture::from_pixels("short", 2, 2, 4, vec![0; 15]);
        assert!(!t.loaded());
    }

    #[test]
    fn empty_extent_is_rejected() {
        assert!(!Texture::from_pixels("empty", 0, 0, 4, Vec::new()).loaded());
        assert!(!Texture::from_pixels("flat", 3, 0, 1, Vec::new()).loaded());
        assert!(!Texture::checkerboard(0, 2, [255; 4], [0; 4]).loaded());
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let t = Texture::checkerboard(4, 2, [255; 4], [0, 0, 0, 255]);
        assert_eq!(t.pixel(0, 0), Vec4::ONE);
        assert_eq!(t.pixel(2, 0), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(t.pixel(2, 2), Vec4::ONE);
    }

    #[test]
    fn release_drops_pixels() {
        let mut t = quad_2x2();
        t.release();
        assert!(!t.loaded());
        assert_eq!(t.sample(0.0, 0.0), Vec4::ZERO);
    }
}
