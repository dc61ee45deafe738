//! First-person free-fly camera.
//!
//! The camera stores a position and Euler angles in radians: `x` is pitch,
//! `y` is yaw, `z` is roll. Pitch is clamped to `[-π/2, π/2]` whenever it
//! changes through [`Camera::rotate`], so the view can look straight up or
//! down but never flip over.
//!
//! The view matrix is `Rx · Ry · Rz · T(-position)`, i.e. the world is first
//! moved so the camera sits at the origin and then rotated into view space,
//! where the camera looks down −Z.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use vitrail::math::{Vec2, Vec3};
//! use vitrail::{Action, Camera, InputSnapshot};
//!
//! let mut camera = Camera::new(90.0, 16.0 / 9.0, 0.1, 1000.0);
//! camera.reset_cursor(Vec2::new(400.0, 300.0));
//!
//! // One frame with W held and the mouse nudged right.
//! let input = InputSnapshot::new(Vec2::new(410.0, 300.0)).with(Action::Forward);
//! camera.update(Duration::from_millis(16), &input);
//!
//! assert!(camera.rotation().y > 0.0);
//! assert!(camera.position().z < 0.0);
//! ```

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use crate::input::{Action, InputSnapshot};
use crate::math::{Mat4, Vec2, Vec3};

/// Radians of rotation per pixel of cursor motion.
pub const LOOK_SENSITIVITY: f32 = 0.01;
/// World units moved per update while a movement key is held.
pub const MOVE_SPEED: f32 = 0.1;

pub const DEFAULT_FOV: f32 = 60.0;
pub const DEFAULT_ASPECT_RATIO: f32 = 1.0;
pub const DEFAULT_NEAR_CLIP: f32 = 0.1;
pub const DEFAULT_FAR_CLIP: f32 = 1000.0;

/// A perspective camera driven by mouse look and WASD-style movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    fov: f32,
    aspect_ratio: f32,
    near_clip: f32,
    far_clip: f32,
    position: Vec3,
    rotation: Vec3,
    last_cursor: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            DEFAULT_FOV,
            DEFAULT_ASPECT_RATIO,
            DEFAULT_NEAR_CLIP,
            DEFAULT_FAR_CLIP,
        )
    }
}

impl Camera {
    /// `fov` is the vertical field of view in degrees.
    pub fn new(fov: f32, aspect_ratio: f32, near_clip: f32, far_clip: f32) -> Self {
        Self {
            fov,
            aspect_ratio,
            near_clip,
            far_clip,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            last_cursor: Vec2::ZERO,
        }
    }

    /// Moves by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.position += offset;
        self
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    /// Moves by an offset expressed along the camera's own axes:
    /// `x` along [`right`](Self::right), `y` along [`up`](Self::up), `z`
    /// along [`forward`](Self::forward).
    pub fn move_relative(&mut self, offset: Vec3) -> &mut Self {
        let world = self.forward() * offset.z + self.right() * offset.x + self.up() * offset.y;
        self.translate(world)
    }

    /// Adds to the Euler angles, then clamps pitch to `[-π/2, π/2]`.
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        let mut rotation = self.rotation + delta;
        rotation.x = rotation.x.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.rotation = rotation;
        self
    }

    /// Replaces the Euler angles as given. No clamping is applied.
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Records the cursor position without turning, so the next
    /// [`update`](Self::update) measures motion from here.
    pub fn reset_cursor(&mut self, cursor: Vec2) {
        self.last_cursor = cursor;
    }

    /// Applies one frame of input.
    ///
    /// Cursor motion since the previous update turns the camera:
    /// horizontal motion changes yaw, vertical motion changes pitch. Held
    /// movement actions build a local direction (forward is −Z) that is
    /// turned by yaw only, so looking up or down does not change walking
    /// height, and the camera moves [`MOVE_SPEED`] along it. Movement is
    /// per update rather than per second; `_dt` is accepted for callers that
    /// drive the camera from a clock.
    pub fn update(&mut self, _dt: Duration, input: &InputSnapshot) {
        let delta = input.cursor - self.last_cursor;
        self.last_cursor = input.cursor;
        self.rotate(Vec3::new(delta.y, delta.x, 0.0) * LOOK_SENSITIVITY);

        let mut movement = Vec3::ZERO;
        for action in &input.held {
            movement += match action {
                Action::Forward => -Vec3::UNIT_Z,
                Action::Back => Vec3::UNIT_Z,
                Action::Left => -Vec3::UNIT_X,
                Action::Right => Vec3::UNIT_X,
                Action::Up => Vec3::UNIT_Y,
                Action::Down => -Vec3::UNIT_Y,
            };
        }

        if movement != Vec3::ZERO {
            let movement = movement * Mat4::rotation_y(self.rotation.y);
            self.translate(movement * MOVE_SPEED);
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn set_fov(&mut self, fov: f32) -> &mut Self {
        self.fov = fov;
        self
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> &mut Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn set_near_clip(&mut self, near_clip: f32) -> &mut Self {
        self.near_clip = near_clip;
        self
    }

    pub fn set_far_clip(&mut self, far_clip: f32) -> &mut Self {
        self.far_clip = far_clip;
        self
    }

    /// The camera's local +Z axis in world space. The view looks down −Z,
    /// so this points behind the camera.
    pub fn forward(&self) -> Vec3 {
        Vec3::UNIT_Z * self.rotation_matrix()
    }

    pub fn right(&self) -> Vec3 {
        Vec3::UNIT_X * self.rotation_matrix()
    }

    pub fn up(&self) -> Vec3 {
        Vec3::UNIT_Y * self.rotation_matrix()
    }

    /// `Rx · Ry · Rz` from the Euler angles.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::euler(self.rotation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.rotation_matrix() * Mat4::translation(-self.position)
    }

    /// OpenGL-style perspective projection (clip depth `[-1, 1]`).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near_clip,
            self.far_clip,
        )
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera{{position={}, rotation={}, fov={}, aspect_ratio={}, near_clip={}, far_clip={}}}",
            self.position, self.rotation, self.fov, self.aspect_ratio, self.near_clip, self.far_clip
        )
    }
}
