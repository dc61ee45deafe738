use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;
use crate::resources::Resource;
use crate::texture::Texture;

/// GPU objects backing a material.
#[derive(Debug)]
pub(crate) struct MaterialTexture {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
}

/// A [`Texture`] uploaded to the GPU for sampling in the scene shader.
///
/// Pixels are expanded to RGBA8 and stored as sRGB. The sampler repeats in
/// both directions and filters linearly.
#[derive(Debug)]
pub struct Material {
    label: String,
    width: u32,
    height: u32,
    pub(crate) gpu: Option<MaterialTexture>,
}

impl Material {
    /// Uploads a loaded texture. An unloaded texture is logged and gives a
    /// material that is not [`loaded`](Self::loaded).
    pub fn from_texture(gpu: &GpuContext, texture: &Texture) -> Self {
        let label = texture.path().display().to_string();
        match texture.to_rgba8() {
            Some(rgba) => Self::from_rgba(gpu, &rgba, texture.width(), texture.height(), &label),
            None => {
                log::error!("Cannot create material from unloaded texture {label}");
                Self::unloaded(label)
            }
        }
    }

    /// Uploads raw RGBA8 pixels, bottom row first. An empty extent or a
    /// buffer of the wrong length is logged and gives an unloaded material.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        if !rgba_extent_valid(data.len(), width, height) {
            log::error!(
                "Rejected RGBA data for material {label}: {} bytes for {width}x{height}",
                data.len()
            );
            return Self::unloaded(label.to_string());
        }

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            label: label.to_string(),
            width,
            height,
            gpu: Some(MaterialTexture {
                texture,
                view,
                sampler,
            }),
        }
    }

    /// A 1×1 opaque white material, the neutral element for multiplying
    /// textures.
    pub fn white(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &[255, 255, 255, 255], 1, 1, "Default White Texture")
    }

    fn unloaded(label: String) -> Self {
        Self {
            label,
            width: 0,
            height: 0,
            gpu: None,
        }
    }

    pub fn loaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn destroy(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.texture.destroy();
        }
    }
}

impl Resource for Material {
    fn label(&self) -> String {
        format!("material {} [{}x{}]", self.label, self.width, self.height)
    }

    fn release(&mut self) {
        self.destroy();
    }
}

fn rgba_extent_valid(len: usize, width: u32, height: u32) -> bool {
    width > 0 && height > 0 && len == width as usize * height as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_extent_rejects_empty_and_short_buffers() {
        assert!(rgba_extent_valid(4, 1, 1));
        assert!(rgba_extent_valid(2 * 3 * 4, 2, 3));
        assert!(!rgba_extent_valid(0, 0, 0));
        assert!(!rgba_extent_valid(0, 4, 0));
        assert!(!rgba_extent_valid(15, 2, 2));
    }
}
