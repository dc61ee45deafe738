//! Shader programs and their uniform data.
//!
//! Uniforms are collected by name into a [`Uniforms`] map and then packed
//! into the `#[repr(C)]` blocks the scene shader declares:
//!
//! | Block              | Bind group | Uniform names                                 |
//! |--------------------|------------|-----------------------------------------------|
//! | [`CameraUniforms`] | 0          | `projection`, `view`                          |
//! | [`ObjectUniforms`] | 1          | `model`, `albedo`, `mix_mode`, `layer_count`  |
//!
//! Missing names fall back to identity matrices, white, and zero.

use std::collections::BTreeMap;
use std::path::Path;

use crate::gpu::GpuContext;
use crate::math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::resources::Resource;

/// A value that can be assigned to a named uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    BoolArray(Vec<bool>),
    Int(i32),
    IntArray(Vec<i32>),
    UInt(u32),
    UIntArray(Vec<u32>),
    Float(f32),
    FloatArray(Vec<f32>),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

macro_rules! uniform_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for UniformValue {
                fn from(value: $t) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

uniform_from!(
    bool => Bool,
    Vec<bool> => BoolArray,
    i32 => Int,
    Vec<i32> => IntArray,
    u32 => UInt,
    Vec<u32> => UIntArray,
    f32 => Float,
    Vec<f32> => FloatArray,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
);

/// Named uniform values for one draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_uint(&mut self, name: &str, value: u32) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_mat2(&mut self, name: &str, value: Mat2) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_mat3(&mut self, name: &str, value: Mat3) -> &mut Self {
        self.set(name, value)
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> &mut Self {
        self.set(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) => Some(*v),
            UniformValue::UInt(v) => i32::try_from(*v).ok(),
            UniformValue::Bool(v) => Some(*v as i32),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Some(*v),
            UniformValue::Vec3(v) => Some(Vec4::from_vec3(*v, 1.0)),
            _ => None,
        }
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(m) => Some(*m),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Per-frame camera block (group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Projection with clip depth already remapped to wgpu's `[0, 1]`.
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl CameraUniforms {
    /// Packs `projection` and `view`. The projection is expected in OpenGL
    /// form and is multiplied by [`Mat4::GL_TO_WGPU_DEPTH`] on the way.
    pub fn from_uniforms(uniforms: &Uniforms) -> Self {
        let projection = uniforms.mat4("projection").unwrap_or(Mat4::IDENTITY);
        let view = uniforms.mat4("view").unwrap_or(Mat4::IDENTITY);
        Self {
            projection: (Mat4::GL_TO_WGPU_DEPTH * projection).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }
}

/// Per-object block (group 1). 96 bytes, a multiple of 16 as WGSL requires.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub albedo: [f32; 4],
    /// [`MixMode`](crate::MixMode) id for combining the layer texture.
    pub mix_mode: i32,
    /// Number of bound texture layers after the base (0 or 1).
    pub layer_count: i32,
    pub _pad: [i32; 2],
}

impl ObjectUniforms {
    pub fn from_uniforms(uniforms: &Uniforms) -> Self {
        Self {
            model: uniforms
                .mat4("model")
                .unwrap_or(Mat4::IDENTITY)
                .to_cols_array_2d(),
            albedo: uniforms.vec4("albedo").unwrap_or(Vec4::ONE).to_array(),
            mix_mode: uniforms.int("mix_mode").unwrap_or(0),
            layer_count: uniforms.int("layer_count").unwrap_or(0),
            _pad: [0; 2],
        }
    }
}

/// A compiled WGSL module.
///
/// Compilation errors are caught in a validation error scope and logged;
/// the shader is then simply not [`loaded`](Self::loaded).
#[derive(Debug)]
pub struct Shader {
    label: String,
    module: Option<wgpu::ShaderModule>,
}

impl Shader {
    pub fn from_wgsl(gpu: &GpuContext, label: &str, source: &str) -> Self {
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let module = match pollster::block_on(gpu.device.pop_error_scope()) {
            Some(err) => {
                log::error!("Failed to compile shader {label}: {err}");
                None
            }
            None => {
                log::info!("Compiled shader: {label}");
                Some(module)
            }
        };

        Self {
            label: label.to_string(),
            module,
        }
    }

    /// Reads and compiles a WGSL file. A missing file is logged like a
    /// compile error.
    pub fn from_file(gpu: &GpuContext, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let label = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_wgsl(gpu, &label, &source),
            Err(err) => {
                log::error!("Failed to read shader {label}: {err}");
                Self {
                    label,
                    module: None,
                }
            }
        }
    }

    pub fn loaded(&self) -> bool {
        self.module.is_some()
    }

    pub fn module(&self) -> Option<&wgpu::ShaderModule> {
        self.module.as_ref()
    }

    pub fn destroy(&mut self) {
        self.module = None;
    }
}

impl Resource for Shader {
    fn label(&self) -> String {
        format!("shader {}", self.label)
    }

    fn release(&mut self) {
        self.destroy();
    }
}
