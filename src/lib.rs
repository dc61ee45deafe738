//! # Vitrail
//!
//! **Translucent objects, sorted and drawn, with the math written out.**
//!
//! A small real-time 3D renderer: a hand-written linear algebra layer, a
//! free-fly camera, painter's-algorithm depth sorting for alpha-blended
//! objects, CPU texture sampling with heightmap meshes, and a wgpu scene
//! pass that blends a texture layer with one of 27 mix modes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vitrail::math::Vec3;
//! use vitrail::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(LoggingConfig::default());
//!
//!     run(AppConfig::new().title("Glass"), |ctx| {
//!         let quad = ctx.mesh(Mesh::quad());
//!         ctx.scene.add_cube_faces(quad, Vec3::new(0.0, 0.0, -5.0), 0.5);
//!
//!         |frame: &mut Frame| {
//!             frame.camera.rotate(Vec3::new(0.0, 0.001, 0.0));
//!         }
//!     })
//! }
//! ```
//!
//! ## Layout
//!
//! - [`math`]: vectors, matrices, axis-angle and quaternions
//! - [`Camera`] and [`Input`]: mouse look and WASD movement
//! - [`Object`], [`Scene`], [`depth_sort`]: what gets drawn and in what order
//! - [`Texture`], [`Mesh`], [`Material`], [`Shader`]: resources, owned by the
//!   [`ResourceManager`] and released by its `shutdown`
//! - [`ScenePass`], [`GpuContext`], [`run`]: the wgpu and winit plumbing

mod app;
mod camera;
pub mod depth_sort;
mod gpu;
mod input;
pub mod logging;
mod material;
pub mod math;
mod mesh;
mod mix_mode;
mod object;
mod resources;
mod scene;
mod scene_pass;
mod shader;
mod texture;
mod time;

pub use app::{AppConfig, Frame, SetupContext, run};
pub use camera::Camera;
pub use depth_sort::{sort_back_to_front, view_depth};
pub use gpu::GpuContext;
pub use input::{Action, Input, InputSnapshot, KeyBindings};
pub use logging::{LoggingConfig, init_logging};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use mix_mode::MixMode;
pub use object::{Object, Renderable};
pub use resources::{
    Arena, Handle, MaterialId, MeshId, Resource, ResourceManager, ShaderId, TextureId,
};
pub use scene::Scene;
pub use scene_pass::{Layer, ScenePass};
pub use shader::{CameraUniforms, ObjectUniforms, Shader, UniformValue, Uniforms};
pub use texture::Texture;
pub use time::{FrameClock, FrameTime};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
