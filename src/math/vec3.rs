use super::macros::impl_vector;

/// A 3D vector for positions, directions, Euler angles and scales.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector!(Vec3, 3, { 0 => x, 1 => y, 2 => z });

impl Vec3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
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

    /// Right-handed cross product.
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Rotates about `axis` by `angle` radians (Rodrigues). The axis is
    /// normalized first.
    pub fn rotate(self, angle: f32, axis: Vec3) -> Self {
        let k = axis.normalize();
        let (s, c) = angle.sin_cos();
        self * c + k.cross(self) * s + k * (k.dot(self) * (1.0 - c))
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn normalize_gives_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1.0, 2.0, 7.5),
            Vec3::new(1e-3, 0.0, 1e-3),
        ] {
            assert!((v.normalize().magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn normalize_zero_is_nan() {
        let n = Vec3::ZERO.normalize();
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::UNIT_X.cross(Vec3::UNIT_Y), Vec3::UNIT_Z);
        assert_eq!(Vec3::UNIT_Y.cross(Vec3::UNIT_Z), Vec3::UNIT_X);
        assert_eq!(Vec3::UNIT_Z.cross(Vec3::UNIT_X), Vec3::UNIT_Y);
    }

    #[test]
    fn rotate_normalizes_axis() {
        let r = Vec3::UNIT_X.rotate(FRAC_PI_2, Vec3::new(0.0, 0.0, 5.0));
        assert!(close(r, Vec3::UNIT_Y));
    }

    #[test]
    fn rotate_keeps_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = v.rotate(1.234, Vec3::UNIT_Z);
        assert!((r.z - 3.0).abs() < 1e-5);
        assert!((r.magnitude() - v.magnitude()).abs() < 1e-5);
    }

    #[test]
    fn matches_glam() {
        let a = Vec3::new(0.5, -1.0, 2.0);
        let b = Vec3::new(4.0, 0.25, -3.0);
        let expected: Vec3 = glam::Vec3::from(a).cross(glam::Vec3::from(b)).into();
        assert!(close(a.cross(b), expected));
        assert!((a.dot(b) - glam::Vec3::from(a).dot(b.into())).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_end_panics() {
        let _ = Vec3::ZERO[3];
    }

    #[test]
    fn display() {
        assert_eq!(Vec3::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }
}
