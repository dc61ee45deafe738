use super::macros::impl_vector;
use super::{Quaternion, Vec3};

/// A 4D vector: homogeneous points and RGBA colors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector!(Vec4, 4, { 0 => x, 1 => y, 2 => z, 3 => w });

impl Vec4 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const UNIT_W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drops `w` without dividing.
    pub const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    pub fn with_z(self, z: f32) -> Self {
        Self { z, ..self }
    }

    pub fn with_w(self, w: f32) -> Self {
        Self { w, ..self }
    }

    /// Rotates the xyz part about `axis.xyz()` by `angle` radians using the
    /// quaternion sandwich `q v q*`. `w` is carried through unchanged.
    pub fn rotate(self, angle: f32, axis: Vec4) -> Self {
        let k = axis.xyz().normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        let q = Quaternion::new(k.x * s, k.y * s, k.z * s, c);
        let v = Quaternion::new(self.x, self.y, self.z, 0.0);
        let r = q * v * q.conjugate();
        Self::new(r.x, r.y, r.z, self.w)
    }
}

impl From<Vec4> for glam::Vec4 {
    fn from(v: Vec4) -> Self {
        glam::Vec4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<glam::Vec4> for Vec4 {
    fn from(v: glam::Vec4) -> Self {
        Vec4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn rotate_about_z_keeps_w() {
        let v = Vec4::new(1.0, 0.0, 0.0, 7.0);
        let r = v.rotate(FRAC_PI_2, Vec4::UNIT_Z);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
        assert_eq!(r.z, 0.0);
        assert_eq!(r.w, 7.0);
    }

    #[test]
    fn rotate_agrees_with_vec3_rodrigues() {
        let v = Vec3::new(0.3, -1.2, 2.0);
        let axis = Vec3::new(1.0, 1.0, 0.5);
        let a = Vec4::from_vec3(v, 1.0).rotate(PI / 3.0, Vec4::from_vec3(axis, 0.0));
        let b = v.rotate(PI / 3.0, axis);
        assert!((a.xyz() - b).magnitude() < 1e-5);
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vec4::new(1.0, 2.0, 3.0, 4.0).normalize();
        assert!((n.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn compound_assignment() {
        let mut c = Vec4::ONE;
        c -= Vec4::new(0.5, 0.5, 0.5, 0.0);
        c /= 0.5;
        assert_eq!(c, Vec4::new(1.0, 1.0, 1.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_end_panics() {
        let _ = Vec4::ONE[4];
    }

    #[test]
    fn display() {
        assert_eq!(Vec4::new(1.0, 0.0, 0.5, 1.0).to_string(), "(1, 0, 0.5, 1)");
    }
}
