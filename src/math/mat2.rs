use super::macros::impl_matrix;
use super::{MathError, Vec2};

/// Row-major 2×2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2 {
    m: [f32; 4],
}

impl_matrix!(Mat2, 2, 4);

impl Mat2 {
    pub const IDENTITY: Self = Self::new([1.0, 0.0, 0.0, 1.0]);

    pub fn determinant(&self) -> f32 {
        let [a, b, c, d] = self.m;
        a * d - b * c
    }

    /// Fails only when the determinant is exactly zero.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(MathError::Singular);
        }
        let [a, b, c, d] = self.m;
        Ok(Self::new([d, -b, -c, a]) / det)
    }

    /// Planar rotation by `angle` radians.
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([c, -s, s, c])
    }

    pub fn scale(factors: Vec2) -> Self {
        Self::new([factors.x, 0.0, 0.0, factors.y])
    }
}

/// Column-vector product.
impl std::ops::Mul<Vec2> for Mat2 {
    type Output = Vec2;
    fn mul(self, v: Vec2) -> Vec2 {
        let [a, b, c, d] = self.m;
        Vec2::new(a * v.x + b * v.y, c * v.x + d * v.y)
    }
}

/// Row-vector product, equivalent to `Mᵀ v`.
impl std::ops::Mul<Mat2> for Vec2 {
    type Output = Vec2;
    fn mul(self, m: Mat2) -> Vec2 {
        m.transpose() * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_round_trip() {
        let m = Mat2::new([4.0, 7.0, 2.0, 6.0]);
        let p = m * m.inverse().unwrap();
        for (a, b) in p.data().iter().zip(Mat2::IDENTITY.data()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn singular_matrix_fails() {
        let m = Mat2::new([1.0, 2.0, 2.0, 4.0]);
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(m.inverse(), Err(MathError::Singular));
    }

    #[test]
    fn row_and_column_products_differ_by_transpose() {
        let m = Mat2::new([1.0, 2.0, 3.0, 4.0]);
        let v = Vec2::new(1.0, 1.0);
        assert_eq!(m * v, Vec2::new(3.0, 7.0));
        assert_eq!(v * m, Vec2::new(4.0, 6.0));
    }

    #[test]
    fn rotation_matches_vector_rotate() {
        let v = Vec2::new(2.0, -1.0);
        let a = Mat2::rotation(0.7) * v;
        let b = v.rotate(0.7);
        assert!((a - b).magnitude() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn position_past_end_panics() {
        let _ = Mat2::IDENTITY[(2, 0)];
    }

    #[test]
    fn element_access() {
        let m = Mat2::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m[3], 4.0);
        assert_eq!(m.at(2, 0), Err(MathError::PositionOutOfRange { row: 2, column: 0, size: 2 }));
        let n = m.with_at(0, 1, 9.0).unwrap();
        assert_eq!(n[1], 9.0);
        assert_eq!(m[1], 2.0);
        assert_eq!(m.to_string(), "[1, 2; 3, 4]");
        assert_eq!(format!("{:#}", m), "[1, 2]\n[3, 4]");
    }
}
