//! Triangle meshes.
//!
//! - [`Vertex`] — the interleaved vertex format (position + texture coordinate)
//! - [`Mesh`] — CPU geometry that can be uploaded once and drawn many times
//!
//! Meshes are built on the CPU first, so generators such as
//! [`Mesh::from_heightmap`] can be tested without a GPU. Call
//! [`Mesh::upload`] once a [`GpuContext`] exists; the arena in
//! [`ResourceManager`](crate::ResourceManager) releases the buffers at
//! shutdown.
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | uv        | Float32x2 | 12     | 1               |

use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;
use crate::math::{Vec2, Vec3, Vec4};
use crate::resources::Resource;
use crate::texture::Texture;

/// A vertex with a model-space position and a texture coordinate.
///
/// 20 bytes, `#[repr(C)]` and [`bytemuck::Pod`] so slices can be copied to
/// the GPU as-is.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Buffer layout for pipelines that read [`Vertex`] data.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// GPU buffers for an uploaded mesh.
#[derive(Debug)]
pub struct MeshBuffers {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

/// Indexed triangle-list geometry.
///
/// The vertex and index lists stay on the CPU after [`upload`](Self::upload)
/// so they can be inspected or regenerated.
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            buffers: None,
        }
    }

    /// A square spanning `-1..1` on X and Y at `z = 0`, facing +Z, with
    /// texture coordinates `0..1`.
    pub fn quad() -> Self {
        let vertices = vec![
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-1.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
        ];
        Self::new(vertices, vec![0, 1, 3, 1, 2, 3])
    }

    /// The quad with a square hole of half-width `inner` cut out of its
    /// center. The hole's texture coordinates are scaled by half, as if the
    /// image were shrunk toward the middle.
    pub fn square_ring(inner: f32) -> Self {
        let lo = 0.5 - inner / 2.0;
        let hi = 0.5 + inner / 2.0;
        let vertices = vec![
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-1.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::new(-inner, -inner, 0.0), Vec2::new(lo, lo)),
            Vertex::new(Vec3::new(inner, -inner, 0.0), Vec2::new(hi, lo)),
            Vertex::new(Vec3::new(inner, inner, 0.0), Vec2::new(hi, hi)),
            Vertex::new(Vec3::new(-inner, inner, 0.0), Vec2::new(lo, hi)),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 4, 1, 5, 4,
            1, 2, 5, 2, 6, 5,
            2, 3, 6, 3, 7, 6,
            3, 0, 7, 0, 4, 7,
        ];
        Self::new(vertices, indices)
    }

    /// A `width × height` grid displaced along Z by the red channel of
    /// `heightmap`.
    ///
    /// Grid point `(x, y)` gets `u = x / (width - 1)` and
    /// `v = y / (height - 1)` (0 when that dimension has a single column or
    /// row), position `(2u - 1, 2v - 1, (2r - 1) * height_scale)` where `r`
    /// is the sampled red value, and texture coordinate `(u, v)`. Each grid
    /// cell becomes two triangles. An unloaded heightmap samples as black,
    /// which flattens the grid at `-height_scale`.
    pub fn from_heightmap(heightmap: &Texture, height_scale: f32, width: u32, height: u32) -> Self {
        let norm = |i: u32, n: u32| if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };

        let mut vertices = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let u = norm(x, width);
                let v = norm(y, height);
                let h = (heightmap.sample(u, v) * 2.0 - Vec4::ONE).x * height_scale;
                vertices.push(Vertex::new(
                    Vec3::new(u * 2.0 - 1.0, v * 2.0 - 1.0, h),
                    Vec2::new(u, v),
                ));
            }
        }

        let cells = width.saturating_sub(1) as usize * height.saturating_sub(1) as usize;
        let mut indices = Vec::with_capacity(cells * 6);
        for z in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                let i = z * width + x;
                indices.extend_from_slice(&[i, i + 1, i + width, i + width, i + 1, i + width + 1]);
            }
        }

        Self::new(vertices, indices)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Creates (or recreates) the vertex and index buffers.
    pub fn upload(&mut self, gpu: &GpuContext) {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.destroy();
        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        });
    }

    pub fn uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Binds the buffers and issues one indexed draw. Does nothing before
    /// [`upload`](Self::upload).
    pub fn draw(&self, pass: &mut wgpu::RenderPass) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..buffers.index_count, 0, 0..1);
    }

    /// Frees the GPU buffers. The CPU geometry is kept.
    pub fn destroy(&mut self) {
        if let Some(buffers) = self.buffers.take() {
            buffers.vertex_buffer.destroy();
            buffers.index_buffer.destroy();
        }
    }
}

impl Resource for Mesh {
    fn label(&self) -> String {
        format!(
            "mesh ({} vertices, {} indices)",
            self.vertices.len(),
            self.indices.len()
        )
    }

    fn release(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(Vertex::LAYOUT.array_stride, 20);
    }

    #[test]
    fn heightmap_2x2_is_one_quad() {
        let map = Texture::from_pixels("flat", 1, 1, 1, vec![255]);
        let mesh = Mesh::from_heightmap(&map, 0.5, 2, 2);
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn heightmap_positions_and_heights() {
        #[rustfmt::skip]
        let map = Texture::from_pixels("ramp", 2, 1, 1, vec![0, 255]);
        let mesh = Mesh::from_heightmap(&map, 2.0, 3, 2);
        let v = mesh.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(mesh.indices().len(), 2 * 6);

        // u = 0 samples black: (2 * 0 - 1) * 2
        assert_eq!(v[0].position, [-1.0, -1.0, -2.0]);
        assert_eq!(v[0].uv, [0.0, 0.0]);
        // u = 0.5 lands on the white column
        assert_eq!(v[1].position, [0.0, -1.0, 2.0]);
        // last vertex is the far corner
        assert_eq!(v[5].position, [1.0, 1.0, 2.0]);
        assert_eq!(v[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn heightmap_single_row_has_no_triangles() {
        let map = Texture::from_pixels("flat", 1, 1, 1, vec![128]);
        let mesh = Mesh::from_heightmap(&map, 1.0, 4, 1);
        assert_eq!(mesh.vertices().len(), 4);
        assert!(mesh.indices().is_empty());
        assert!(mesh.vertices().iter().all(|v| v.position[1] == -1.0));
    }

    #[test]
    fn quad_and_ring_indices_stay_in_range() {
        for mesh in [Mesh::quad(), Mesh::square_ring(0.2)] {
            let n = mesh.vertices().len() as u32;
            assert_eq!(mesh.indices().len() % 3, 0);
            assert!(mesh.indices().iter().all(|&i| i < n));
        }
        assert_eq!(Mesh::square_ring(0.2).indices().len(), 24);
    }

    #[test]
    fn release_keeps_cpu_geometry() {
        let mut mesh = Mesh::quad();
        assert!(!mesh.uploaded());
        mesh.release();
        assert_eq!(mesh.vertices().len(), 4);
    }
}
