//! Linear algebra for the renderer.
//!
//! Small `Copy` value types with operator overloading:
//!
//! - [`Vec2`], [`Vec3`], [`Vec4`] — component-wise arithmetic, dot/cross,
//!   normalization and axis rotation
//! - [`Mat2`], [`Mat3`], [`Mat4`] — row-major square matrices with checked
//!   element access, determinant and inverse
//! - [`AxisAngle`], [`Quaternion`] — rotation representations that convert
//!   through [`Mat4`]
//!
//! Matrices are stored row-major and act on column vectors: `M * v`.
//! Multiplying a vector on the left (`v * M`) treats it as a row vector,
//! which is the same as `Mᵀ * v`. [`Mat4::to_cols_array_2d`] produces the
//! column-major layout WGSL expects.
//!
//! Arithmetic never guards against degenerate input. Normalizing a zero
//! vector gives NaN, and only an exactly zero determinant is reported as
//! [`MathError::Singular`].
//!
//! # Example
//!
//! ```
//! use vitrail::math::{Mat4, Vec3};
//!
//! let model = Mat4::translation(Vec3::new(0.0, 0.0, -5.0))
//!     * Mat4::rotation_y(0.5)
//!     * Mat4::scale(Vec3::splat(2.0));
//! let back = model.inverse().unwrap() * (model * Vec3::ONE);
//! assert!((back - Vec3::ONE).magnitude() < 1e-5);
//! ```

mod axis_angle;
mod error;
mod macros;
mod mat2;
mod mat3;
mod mat4;
mod quaternion;
mod vec2;
mod vec3;
mod vec4;

pub use axis_angle::AxisAngle;
pub use error::MathError;
pub use mat2::Mat2;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quaternion::Quaternion;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
