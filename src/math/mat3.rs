use super::macros::impl_matrix;
use super::{MathError, Vec3};

/// Row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    m: [f32; 9],
}

impl_matrix!(Mat3, 3, 9);

impl Mat3 {
    pub const IDENTITY: Self = Self::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Rule of Sarrus.
    pub fn determinant(&self) -> f32 {
        let [a, b, c, d, e, f, g, h, i] = self.m;
        a * e * i + b * f * g + c * d * h - c * e * g - b * d * i - a * f * h
    }

    /// Adjugate over determinant. Fails only when the determinant is exactly
    /// zero.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(MathError::Singular);
        }
        let [a, b, c, d, e, f, g, h, i] = self.m;
        let adj = Self::new([
            e * i - f * h,
            c * h - b * i,
            b * f - c * e,
            f * g - d * i,
            a * i - c * g,
            c * d - a * f,
            d * h - e * g,
            b * g - a * h,
            a * e - b * d,
        ]);
        Ok(adj / det)
    }

    /// Rodrigues rotation about a unit `axis`.
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self::new([
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
        ])
    }

    pub fn scale(factors: Vec3) -> Self {
        Self::new([factors.x, 0.0, 0.0, 0.0, factors.y, 0.0, 0.0, 0.0, factors.z])
    }

    /// Columns padded to `vec4` stride, the layout of a WGSL `mat3x3<f32>`.
    pub fn to_cols_padded(&self) -> [[f32; 4]; 3] {
        let mut out = [[0.0; 4]; 3];
        for (c, col) in out.iter_mut().enumerate() {
            for r in 0..3 {
                col[r] = self.m[r * 3 + c];
            }
        }
        out
    }
}

/// Column-vector product.
impl std::ops::Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        let r = |i: usize| self.m[i * 3] * v.x + self.m[i * 3 + 1] * v.y + self.m[i * 3 + 2] * v.z;
        Vec3::new(r(0), r(1), r(2))
    }
}

/// Row-vector product, equivalent to `Mᵀ v`.
impl std::ops::Mul<Mat3> for Vec3 {
    type Output = Vec3;
    fn mul(self, m: Mat3) -> Vec3 {
        m.transpose() * self
    }
}
