use super::macros::impl_vector;

/// A 2D vector, used for texture coordinates and cursor positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl_vector!(Vec2, 2, { 0 => x, 1 => y });

impl Vec2 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    /// Z component of the 3D cross product of `(x, y, 0)` vectors.
    pub fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotate(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// The vector rotated a quarter turn counter-clockwise.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl From<Vec2> for glam::Vec2 {
    fn from(v: Vec2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

impl From<glam::Vec2> for Vec2 {
    fn from(v: glam::Vec2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(b - a, Vec2::new(2.0, 2.0));
        assert_eq!(a * b, Vec2::new(3.0, 8.0));
        assert_eq!(b / a, Vec2::new(3.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));

        let mut c = a;
        c += b;
        c *= 0.5;
        assert_eq!(c, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn cross_and_perpendicular() {
        assert_eq!(Vec2::UNIT_X.cross(Vec2::UNIT_Y), 1.0);
        assert_eq!(Vec2::UNIT_Y.cross(Vec2::UNIT_X), -1.0);
        assert_eq!(Vec2::UNIT_X.perpendicular(), Vec2::UNIT_Y);
        assert_eq!(Vec2::new(3.0, 4.0).perpendicular().dot(Vec2::new(3.0, 4.0)), 0.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = Vec2::UNIT_X.rotate(FRAC_PI_2);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn indexing_and_setters() {
        let v = Vec2::new(5.0, 6.0);
        assert_eq!(v[1], 6.0);
        assert_eq!(v.get(2), Err(crate::math::MathError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(v.with_x(1.0), Vec2::new(1.0, 6.0));
        assert_eq!(v.with(1, 0.0).unwrap(), Vec2::new(5.0, 0.0));
        assert_eq!(v, Vec2::new(5.0, 6.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_end_panics() {
        let _ = Vec2::ONE[2];
    }

    #[test]
    fn display() {
        assert_eq!(Vec2::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
