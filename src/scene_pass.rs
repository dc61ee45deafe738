//! Depth-tested, alpha-blended rendering of [`Renderable`]s.
//!
//! # Bind groups
//!
//! - **Group 0**: [`CameraUniforms`] (projection, view)
//! - **Group 1**: [`ObjectUniforms`] (model, albedo, mix mode), one slot per
//!   draw in a buffer addressed with dynamic offsets
//! - **Group 2**: base texture + sampler, layer texture + sampler
//!
//! Objects are drawn in the order given. Pass them through
//! [`sort_back_to_front`](crate::depth_sort::sort_back_to_front) first so
//! translucent surfaces blend over what is behind them.

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::Context;

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::material::{Material, MaterialTexture};
use crate::mesh::Vertex;
use crate::mix_mode::MixMode;
use crate::object::Renderable;
use crate::resources::{MaterialId, ResourceManager};
use crate::shader::{CameraUniforms, ObjectUniforms, Shader, Uniforms};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A second texture blended over every object's base texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub material: MaterialId,
    pub mode: MixMode,
}

/// Draws a list of renderables into the surface with its own depth buffer.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: usize,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    default_material: Material,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    /// Builds the pipeline from a compiled scene shader (entry points `vs`
    /// and `fs`).
    pub fn new(gpu: &GpuContext, shader: &Shader) -> anyhow::Result<Self> {
        let device = &gpu.device;
        let module = shader
            .module()
            .context("Scene shader is not loaded; see the compile error above")?;

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Object uniform buffer (group 1)
        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ObjectUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let object_stride = object_stride(device.limits().min_uniform_buffer_offset_alignment);
        let object_capacity = 64;
        let (object_buffer, object_bind_group) = Self::create_object_buffer(
            device,
            &object_bind_group_layout,
            object_stride,
            object_capacity,
        );

        // Texture bind group layout (group 2)
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    texture_entry(0),
                    sampler_entry(1),
                    texture_entry(2),
                    sampler_entry(3),
                ],
            });

        let default_material = Material::white(gpu);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &object_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        // Faces are seen from both sides, so nothing is culled.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_view(gpu);

        Ok(Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            object_bind_group_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity,
            texture_bind_group_layout,
            default_material,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Grows the object buffer to hold at least `count` slots.
    fn reserve(&mut self, gpu: &GpuContext, count: usize) {
        if count <= self.object_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        log::debug!("Growing object uniform buffer to {capacity} slots");
        let (buffer, bind_group) = Self::create_object_buffer(
            &gpu.device,
            &self.object_bind_group_layout,
            self.object_stride,
            capacity,
        );
        self.object_buffer.destroy();
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_capacity = capacity;
    }

    fn texture_bind_group(
        &self,
        gpu: &GpuContext,
        base: &MaterialTexture,
        layer: &MaterialTexture,
    ) -> wgpu::BindGroup {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Texture Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&base.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&base.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&layer.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&layer.sampler),
                },
            ],
        })
    }

    /// Clears `target` and its depth buffer to `clear`, then draws `items` in
    /// order.
    ///
    /// Objects whose mesh is missing or not uploaded are skipped. Objects
    /// without a loaded material use a plain white texture. When `layer` names
    /// a loaded material it is blended over every object's base texture.
    #[allow(clippy::too_many_arguments)]
    pub fn render<R: Renderable>(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
        camera: &Camera,
        items: &[R],
        resources: &ResourceManager,
        layer: Option<Layer>,
    ) {
        self.ensure_depth_size(gpu);
        self.reserve(gpu, items.len());

        let mut uniforms = Uniforms::new();
        uniforms
            .set_mat4("projection", camera.projection_matrix())
            .set_mat4("view", camera.view_matrix());
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms::from_uniforms(&uniforms)),
        );

        let layer_texture = layer
            .and_then(|l| resources.materials.get(l.material))
            .and_then(|m| m.gpu.as_ref());
        let mix_mode = layer.map_or(MixMode::default(), |l| l.mode);

        let stride = self.object_stride as usize;
        let mut staging = vec![0u8; stride * items.len()];
        for (slot, item) in staging.chunks_exact_mut(stride).zip(items) {
            uniforms
                .set_mat4("model", item.model())
                .set_vec4("albedo", item.albedo())
                .set_int("mix_mode", mix_mode.id())
                .set_int("layer_count", layer_texture.is_some() as i32);
            let block = ObjectUniforms::from_uniforms(&uniforms);
            slot[..std::mem::size_of::<ObjectUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&block));
        }
        if !staging.is_empty() {
            gpu.queue.write_buffer(&self.object_buffer, 0, &staging);
        }

        let Some(white) = self.default_material.gpu.as_ref() else {
            return;
        };
        let layer_texture = layer_texture.unwrap_or(white);

        // One texture bind group per distinct base material this frame.
        let (bases, group_of) = dedup_slots(items.iter().map(|item| {
            item.material()
                .filter(|&id| resources.materials.get(id).is_some_and(Material::loaded))
        }));
        let texture_groups: Vec<wgpu::BindGroup> = bases
            .iter()
            .map(|base| {
                let base = base
                    .and_then(|id| resources.materials.get(id))
                    .and_then(|m| m.gpu.as_ref())
                    .unwrap_or(white);
                self.texture_bind_group(gpu, base, layer_texture)
            })
            .collect();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        let mut bound = None;
        for ((i, item), &group) in items.iter().enumerate().zip(&group_of) {
            let Some(mesh) = resources.meshes.get(item.mesh()).filter(|m| m.uploaded()) else {
                log::trace!("Skipping object with missing mesh {:?}", item.mesh());
                continue;
            };

            let offset = (i as u64 * self.object_stride) as u32;
            pass.set_bind_group(1, &self.object_bind_group, &[offset]);
            if bound != Some(group) {
                pass.set_bind_group(2, &texture_groups[group], &[]);
                bound = Some(group);
            }
            mesh.draw(&mut pass);
        }
    }
}

impl Drop for ScenePass {
    fn drop(&mut self) {
        self.default_material.destroy();
    }
}

/// Size of one object slot: the block rounded up to the device's dynamic
/// offset alignment.
fn object_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<ObjectUniforms>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

/// Collapses `keys` into its distinct values in first-seen order, plus the
/// position of each key among them.
fn dedup_slots<K: Copy + Eq + Hash>(keys: impl IntoIterator<Item = K>) -> (Vec<K>, Vec<usize>) {
    let mut unique = Vec::new();
    let mut seen = HashMap::new();
    let slots = keys
        .into_iter()
        .map(|key| {
            *seen.entry(key).or_insert_with(|| {
                unique.push(key);
                unique.len() - 1
            })
        })
        .collect();
    (unique, slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_materials_share_a_slot() {
        let (unique, slots) = dedup_slots([Some(3), None, Some(3), Some(1), None]);
        assert_eq!(unique, vec![Some(3), None, Some(1)]);
        assert_eq!(slots, vec![0, 1, 0, 2, 1]);

        let (unique, slots) = dedup_slots(std::iter::empty::<Option<u32>>());
        assert!(unique.is_empty());
        assert!(slots.is_empty());
    }

    #[test]
    fn stride_respects_alignment() {
        assert_eq!(object_stride(256), 256);
        assert_eq!(object_stride(64), 128);
        assert_eq!(object_stride(32), 96);
        assert_eq!(object_stride(0), 96);
    }
}
