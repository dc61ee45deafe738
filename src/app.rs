//! Window, event loop and frame pacing.
//!
//! [`run`] opens a window, builds the GPU context and scene pass, calls the
//! setup closure once, then drives frames until the window closes:
//!
//! 1. camera update from the current input
//! 2. the per-frame closure
//! 3. depth sort, clear and draw
//! 4. present
//! 5. wait out the rest of the frame budget
//!
//! Escape or closing the window exits; every resource is released through
//! [`ResourceManager::shutdown`] on the way out.
//!
//! ```no_run
//! use vitrail::math::Vec3;
//! use vitrail::{AppConfig, Mesh};
//!
//! vitrail::run(AppConfig::new().title("Cube"), |ctx| {
//!     let quad = ctx.mesh(Mesh::quad());
//!     ctx.scene.add_cube_faces(quad, Vec3::new(0.0, 0.0, -5.0), 0.5);
//!     |_frame: &mut vitrail::Frame| {}
//! })
//! .unwrap();
//! ```

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::input::{Input, KeyBindings};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::mix_mode::MixMode;
use crate::resources::{MaterialId, MeshId, ResourceManager, TextureId};
use crate::scene::Scene;
use crate::scene_pass::{Layer, ScenePass};
use crate::shader::Shader;
use crate::texture::Texture;
use crate::time::{FrameClock, FrameTime};

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");

/// Window and loop settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second to pace to; `0` renders as fast as presentation
    /// allows.
    pub target_fps: u32,
    pub clear_color: wgpu::Color,
    /// WGSL file replacing the built-in scene shader.
    pub shader_path: Option<std::path::PathBuf>,
    pub bindings: KeyBindings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Vitrail".to_string(),
            width: 800,
            height: 600,
            target_fps: 60,
            clear_color: wgpu::Color::BLACK,
            shader_path: None,
            bindings: KeyBindings::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn shader(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.shader_path = Some(path.into());
        self
    }

    pub fn bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }
}

/// Access to the GPU and scene during setup.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    pub resources: &'a mut ResourceManager,
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    layer: &'a mut Option<Layer>,
}

impl SetupContext<'_> {
    /// Uploads `mesh` and stores it.
    pub fn mesh(&mut self, mut mesh: Mesh) -> MeshId {
        mesh.upload(self.gpu);
        self.resources.meshes.insert(mesh)
    }

    pub fn texture(&mut self, texture: Texture) -> TextureId {
        self.resources.textures.insert(texture)
    }

    /// Uploads a stored texture as a material. A missing or unloaded texture
    /// gives a material that draws as plain white.
    pub fn material(&mut self, texture: TextureId) -> MaterialId {
        let material = match self.resources.textures.get(texture) {
            Some(texture) => Material::from_texture(self.gpu, texture),
            None => Material::from_texture(self.gpu, &Texture::new("<released>")),
        };
        self.resources.materials.insert(material)
    }

    /// Blends `material` over every object's base texture with `mode`.
    pub fn layer(&mut self, material: MaterialId, mode: MixMode) {
        *self.layer = Some(Layer { material, mode });
    }
}

/// Per-frame access for the frame closure.
pub struct Frame<'a> {
    pub gpu: &'a GpuContext,
    pub camera: &'a mut Camera,
    pub input: &'a Input,
    pub scene: &'a mut Scene,
    pub time: FrameTime,
}

impl Frame<'_> {
    pub fn fps(&self) -> f32 {
        let dt = self.time.dt.as_secs_f32();
        if dt > 0.0 { 1.0 / dt } else { 0.0 }
    }
}

type FrameFn = Box<dyn FnMut(&mut Frame)>;
type SetupFn = Box<dyn FnOnce(&mut SetupContext) -> FrameFn>;

/// Runs the application until the window closes.
///
/// Errors creating the event loop, window, GPU context or scene pipeline
/// are returned; everything after setup is logged instead.
pub fn run<S, F>(config: AppConfig, setup: S) -> anyhow::Result<()>
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new().context("Failed to create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let setup: SetupFn = Box::new(move |ctx: &mut SetupContext| -> FrameFn { Box::new(setup(ctx)) });
    let mut app = VitrailApp::Pending {
        config,
        setup: Some(setup),
    };

    event_loop
        .run_app(&mut app)
        .context("Event loop terminated abnormally")?;

    match app {
        VitrailApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    scene_pass: ScenePass,
    resources: ResourceManager,
    scene: Scene,
    camera: Camera,
    input: Input,
    bindings: KeyBindings,
    layer: Option<Layer>,
    clear_color: wgpu::Color,
    clock: FrameClock,
    frame_fn: FrameFn,
}

enum VitrailApp {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
    },
    Running(Box<Running>),
    Exited,
    Failed(anyhow::Error),
}

impl VitrailApp {
    fn start(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        setup: SetupFn,
    ) -> anyhow::Result<Running> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create the window")?,
        );

        let gpu = GpuContext::new(window.clone())?;

        let mut resources = ResourceManager::new();
        let shader = match &config.shader_path {
            Some(path) => Shader::from_file(&gpu, path),
            None => Shader::from_wgsl(&gpu, "scene.wgsl", SCENE_SHADER),
        };
        let scene_pass = ScenePass::new(&gpu, &shader)?;
        resources.shaders.insert(shader);

        let mut camera = Camera::default();
        camera.set_aspect_ratio(gpu.aspect());

        let mut input = Input::new();
        grab_cursor(&window, &mut input);

        let mut scene = Scene::new();
        let mut layer = None;
        let frame_fn = setup(&mut SetupContext {
            gpu: &gpu,
            resources: &mut resources,
            scene: &mut scene,
            camera: &mut camera,
            layer: &mut layer,
        });

        camera.reset_cursor(input.cursor());
        log::info!(
            "Scene ready: {} objects, {} meshes, {} materials",
            scene.len(),
            resources.meshes.len(),
            resources.materials.len()
        );

        Ok(Running {
            window,
            gpu,
            scene_pass,
            resources,
            scene,
            camera,
            input,
            bindings: config.bindings.clone(),
            layer,
            clear_color: config.clear_color,
            clock: FrameClock::new(config.target_fps),
            frame_fn,
        })
    }
}

/// Hides the cursor and locks it to the window, falling back to confining
/// it where locking is unsupported.
fn grab_cursor(window: &Window, input: &mut Input) {
    match window.set_cursor_grab(CursorGrabMode::Locked) {
        Ok(()) => input.set_cursor_locked(true),
        Err(_) => {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::Confined) {
                log::warn!("Could not grab the cursor: {err}");
            }
        }
    }
    window.set_cursor_visible(false);
}

impl Running {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frame_start = Instant::now();
        let time = self.clock.tick();

        let snapshot = self.input.snapshot(&self.bindings);
        self.camera.update(time.dt, &snapshot);

        (self.frame_fn)(&mut Frame {
            gpu: &self.gpu,
            camera: &mut self.camera,
            input: &self.input,
            scene: &mut self.scene,
            time,
        });

        self.render(event_loop);
        self.input.end_frame();

        match self.clock.remaining(frame_start.elapsed()) {
            Some(wait) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + wait));
            }
            None => {
                event_loop.set_control_flow(ControlFlow::Poll);
                self.window.request_redraw();
            }
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(err) => {
                log::warn!("Skipping frame: {err}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let sorted = self.scene.sorted(&self.camera.view_matrix());
        self.scene_pass.render(
            &self.gpu,
            &mut encoder,
            &view,
            self.clear_color,
            &self.camera,
            &sorted,
            &self.resources,
            self.layer,
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn shutdown(&mut self) {
        let released = self.resources.shutdown();
        log::info!("Shut down, released {released} resources");
    }
}

impl ApplicationHandler for VitrailApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let VitrailApp::Running(app) = self {
            app.clock.reset();
            app.window.request_redraw();
            return;
        }
        let VitrailApp::Pending { config, setup } = self else {
            return;
        };
        let Some(setup) = setup.take() else {
            return;
        };

        match Self::start(event_loop, config, setup) {
            Ok(running) => {
                running.window.request_redraw();
                *self = VitrailApp::Running(Box::new(running));
            }
            Err(err) => {
                log::error!("{err:#}");
                *self = VitrailApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let (VitrailApp::Running(app), StartCause::ResumeTimeReached { .. }) = (self, cause) {
            app.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let VitrailApp::Running(app) = self else {
            return;
        };

        app.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed
                    && key.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    app.camera.set_aspect_ratio(app.gpu.aspect());
                }
            }
            WindowEvent::Focused(true) => grab_cursor(&app.window, &mut app.input),
            WindowEvent::RedrawRequested => app.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let VitrailApp::Running(app) = self {
            app.input.handle_device_event(&event);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let VitrailApp::Running(app) = self {
            app.shutdown();
            *self = VitrailApp::Exited;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = AppConfig::new()
            .title("Test")
            .size(1280, 720)
            .target_fps(30)
            .shader("res/shaders/custom.wgsl");
        assert_eq!(config.title, "Test");
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.target_fps, 30);
        assert_eq!(
            config.shader_path.as_deref(),
            Some(std::path::Path::new("res/shaders/custom.wgsl"))
        );
    }

    #[test]
    fn config_defaults_match_demo() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.clear_color, wgpu::Color::BLACK);
    }
}
