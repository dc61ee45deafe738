use super::macros::impl_matrix;
use super::{MathError, Vec3, Vec4};

/// Row-major 4×4 matrix.
///
/// Transforms follow the column-vector convention: `M * v` applies `M`, and
/// `A * B` applies `B` first. The projection factories produce OpenGL clip
/// space (depth in `[-1, 1]`); premultiply by [`Mat4::GL_TO_WGPU_DEPTH`]
/// before handing the result to wgpu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    m: [f32; 16],
}

impl_matrix!(Mat4, 4, 16);

impl Mat4 {
    pub const IDENTITY: Self = Self::new([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Remaps clip depth from `[-1, 1]` to `[0, 1]`.
    pub const GL_TO_WGPU_DEPTH: Self = Self::new([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.5, 0.5, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn determinant(&self) -> f32 {
        let (s, c) = self.sub_determinants();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Full adjugate inverse. Fails only when the determinant is exactly
    /// zero; near-singular input yields very large or non-finite elements.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let (s, c) = self.sub_determinants();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1]
            + s[5] * c[0];
        if det == 0.0 {
            return Err(MathError::Singular);
        }
        let [
            a00, a01, a02, a03, //
            a10, a11, a12, a13, //
            a20, a21, a22, a23, //
            a30, a31, a32, a33,
        ] = self.m;

        let adj = Self::new([
            a11 * c[5] - a12 * c[4] + a13 * c[3],
            -a01 * c[5] + a02 * c[4] - a03 * c[3],
            a31 * s[5] - a32 * s[4] + a33 * s[3],
            -a21 * s[5] + a22 * s[4] - a23 * s[3],
            -a10 * c[5] + a12 * c[2] - a13 * c[1],
            a00 * c[5] - a02 * c[2] + a03 * c[1],
            -a30 * s[5] + a32 * s[2] - a33 * s[1],
            a20 * s[5] - a22 * s[2] + a23 * s[1],
            a10 * c[4] - a11 * c[2] + a13 * c[0],
            -a00 * c[4] + a01 * c[2] - a03 * c[0],
            a30 * s[4] - a31 * s[2] + a33 * s[0],
            -a20 * s[4] + a21 * s[2] - a23 * s[0],
            -a10 * c[3] + a11 * c[1] - a12 * c[0],
            a00 * c[3] - a01 * c[1] + a02 * c[0],
            -a30 * s[3] + a31 * s[1] - a32 * s[0],
            a20 * s[3] - a21 * s[1] + a22 * s[0],
        ]);
        Ok(adj / det)
    }

    // 2×2 minors of the top two rows (s) and bottom two rows (c).
    fn sub_determinants(&self) -> ([f32; 6], [f32; 6]) {
        let [
            a00, a01, a02, a03, //
            a10, a11, a12, a13, //
            a20, a21, a22, a23, //
            a30, a31, a32, a33,
        ] = self.m;
        let s = [
            a00 * a11 - a10 * a01,
            a00 * a12 - a10 * a02,
            a00 * a13 - a10 * a03,
            a01 * a12 - a11 * a02,
            a01 * a13 - a11 * a03,
            a02 * a13 - a12 * a03,
        ];
        let c = [
            a20 * a31 - a30 * a21,
            a20 * a32 - a30 * a22,
            a20 * a33 - a30 * a23,
            a21 * a32 - a31 * a22,
            a21 * a33 - a31 * a23,
            a22 * a33 - a32 * a23,
        ];
        (s, c)
    }

    /// Column-major copy, the layout of a WGSL `mat4x4<f32>`.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let t = self.transpose();
        [t.row(0), t.row(1), t.row(2), t.row(3)]
    }

    pub fn translation(offset: Vec3) -> Self {
        Self::new([
            1.0, 0.0, 0.0, offset.x, //
            0.0, 1.0, 0.0, offset.y, //
            0.0, 0.0, 1.0, offset.z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale(factors: Vec3) -> Self {
        Self::new([
            factors.x, 0.0, 0.0, 0.0, //
            0.0, factors.y, 0.0, 0.0, //
            0.0, 0.0, factors.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rodrigues rotation by `angle` radians about a unit `axis`.
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self::new([
            t * x * x + c,
            t * x * y - s * z,
            t * x * z + s * y,
            0.0,
            t * x * y + s * z,
            t * y * y + c,
            t * y * z - s * x,
            0.0,
            t * x * z - s * y,
            t * y * z + s * x,
            t * z * z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        Self::rotation(angle, Vec3::UNIT_X)
    }

    pub fn rotation_y(angle: f32) -> Self {
        Self::rotation(angle, Vec3::UNIT_Y)
    }

    pub fn rotation_z(angle: f32) -> Self {
        Self::rotation(angle, Vec3::UNIT_Z)
    }

    /// `Rx · Ry · Rz` for Euler angles in radians.
    pub fn euler(angles: Vec3) -> Self {
        Self::rotation_x(angles.x) * Self::rotation_y(angles.y) * Self::rotation_z(angles.z)
    }

    /// Right-handed perspective projection with OpenGL depth range.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let depth = 1.0 / (near - far);
        Self::new([
            f / aspect,
            0.0,
            0.0,
            0.0,
            0.0,
            f,
            0.0,
            0.0,
            0.0,
            0.0,
            (far + near) * depth,
            2.0 * far * near * depth,
            0.0,
            0.0,
            -1.0,
            0.0,
        ])
    }

    /// Right-handed orthographic projection with OpenGL depth range.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let fne = 1.0 / (far - near);
        Self::new([
            2.0 * rl,
            0.0,
            0.0,
            -(right + left) * rl,
            0.0,
            2.0 * tb,
            0.0,
            -(top + bottom) * tb,
            0.0,
            0.0,
            -2.0 * fne,
            -(far + near) * fne,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Right-handed view matrix looking from `eye` toward `center`.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let f = (center - eye).normalize();
        let r = f.cross(up).normalize();
        let u = r.cross(f);
        Self::new([
            r.x,
            r.y,
            r.z,
            -r.dot(eye),
            u.x,
            u.y,
            u.z,
            -u.dot(eye),
            -f.x,
            -f.y,
            -f.z,
            f.dot(eye),
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Applies the matrix to a point (`w = 1`) and divides by the resulting `w`.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v = *self * Vec4::from_vec3(p, 1.0);
        v.xyz() / v.w
    }
}

/// Column-vector product.
impl std::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        let r = |i: usize| {
            self.m[i * 4] * v.x + self.m[i * 4 + 1] * v.y + self.m[i * 4 + 2] * v.z + self.m[i * 4 + 3] * v.w
        };
        Vec4::new(r(0), r(1), r(2), r(3))
    }
}

/// Row-vector product, equivalent to `Mᵀ v`.
impl std::ops::Mul<Mat4> for Vec4 {
    type Output = Vec4;
    fn mul(self, m: Mat4) -> Vec4 {
        m.transpose() * self
    }
}

/// Point transform with perspective divide.
impl std::ops::Mul<Vec3> for Mat4 {
    type Output = Vec3;
    fn mul(self, p: Vec3) -> Vec3 {
        self.transform_point(p)
    }
}

/// Row-vector point transform with perspective divide.
impl std::ops::Mul<Mat4> for Vec3 {
    type Output = Vec3;
    fn mul(self, m: Mat4) -> Vec3 {
        let v = Vec4::from_vec3(self, 1.0) * m;
        v.xyz() / v.w
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.to_cols_array_2d())
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_rows(m.to_cols_array_2d()).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    fn approx_eq(a: &Mat4, b: &Mat4, eps: f32) -> bool {
        a.data().iter().zip(b.data()).all(|(x, y)| (x - y).abs() < eps)
    }

    fn sample() -> Mat4 {
        Mat4::translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::rotation(0.7, Vec3::new(1.0, 2.0, 2.0).normalize())
            * Mat4::scale(Vec3::new(2.0, 0.5, 1.5))
    }

    #[test]
    fn inverse_round_trip() {
        let m = sample();
        let inv = m.inverse().unwrap();
        assert!(approx_eq(&(m * inv), &Mat4::IDENTITY, 1e-5));
        assert!(approx_eq(&(inv * m), &Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn inverse_matches_glam() {
        let m = Mat4::new([
            3.0, 0.0, 2.0, -1.0, //
            1.0, 2.0, 0.0, -2.0, //
            4.0, 0.0, 6.0, -3.0, //
            5.0, 0.0, 2.0, 0.0,
        ]);
        let expected: Mat4 = glam::Mat4::from(m).inverse().into();
        assert!(approx_eq(&m.inverse().unwrap(), &expected, 1e-4));
        assert!((m.determinant() - glam::Mat4::from(m).determinant()).abs() < 1e-3);
    }

    #[test]
    fn singular_matrix_fails() {
        let m = Mat4::scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(m.inverse(), Err(MathError::Singular));
    }

    #[test]
    fn multiplication_is_associative() {
        let a = sample();
        let b = Mat4::perspective(1.0, 1.5, 0.1, 50.0);
        let c = Mat4::look_at(Vec3::new(2.0, 3.0, 4.0), Vec3::ZERO, Vec3::UNIT_Y);
        assert!(approx_eq(&((a * b) * c), &(a * (b * c)), 1e-3));
    }

    #[test]
    fn factories_match_glam() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            t,
            Mat4::from(glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)))
        );

        let axis = Vec3::new(0.0, 0.6, 0.8);
        let r = Mat4::rotation(FRAC_PI_3, axis);
        let gr: Mat4 = glam::Mat4::from_axis_angle(axis.into(), FRAC_PI_3).into();
        assert!(approx_eq(&r, &gr, 1e-6));

        let p = Mat4::perspective(FRAC_PI_2, 4.0 / 3.0, 0.1, 1000.0);
        let gp: Mat4 = glam::Mat4::perspective_rh_gl(FRAC_PI_2, 4.0 / 3.0, 0.1, 1000.0).into();
        assert!(approx_eq(&p, &gp, 1e-4));

        let o = Mat4::orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 20.0);
        let go: Mat4 = glam::Mat4::orthographic_rh_gl(-2.0, 4.0, -1.0, 3.0, 0.5, 20.0).into();
        assert!(approx_eq(&o, &go, 1e-6));

        let eye = Vec3::new(3.0, 1.0, 5.0);
        let l = Mat4::look_at(eye, Vec3::new(0.0, 0.5, 0.0), Vec3::UNIT_Y);
        let gl: Mat4 = glam::Mat4::look_at_rh(eye.into(), glam::Vec3::new(0.0, 0.5, 0.0), glam::Vec3::Y).into();
        assert!(approx_eq(&l, &gl, 1e-5));
    }

    #[test]
    fn point_transform_divides_by_w() {
        let p = Mat4::perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
        // A point on the near plane lands at clip depth -1.
        let ndc = p * Vec3::new(0.0, 0.0, -1.0);
        assert!((ndc.z + 1.0).abs() < 1e-6);
        let ndc = p * Vec3::new(0.0, 0.0, -10.0);
        assert!((ndc.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn wgpu_depth_correction_maps_to_unit_range() {
        let p = Mat4::GL_TO_WGPU_DEPTH * Mat4::perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
        assert!((p.transform_point(Vec3::new(0.0, 0.0, -1.0)).z).abs() < 1e-6);
        assert!((p.transform_point(Vec3::new(0.0, 0.0, -10.0)).z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn row_vector_applies_transpose() {
        let m = sample();
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(v * m, m.transpose() * v);
    }

    #[test]
    fn translation_lives_in_last_column() {
        let t = Mat4::translation(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(t.at(0, 3), Ok(4.0));
        assert_eq!(t.at(2, 3), Ok(6.0));
        assert_eq!(t * Vec3::ZERO, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(t.to_cols_array_2d()[3], [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn element_access_is_checked() {
        let m = Mat4::IDENTITY;
        assert_eq!(m.get(16), Err(MathError::IndexOutOfRange { index: 16, len: 16 }));
        assert!(m.with_at(4, 0, 1.0).is_err());
        let n = m.with(3, 9.0).unwrap();
        assert_eq!(n[(0, 3)], 9.0);
        assert_eq!(m[(0, 3)], 0.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn position_past_end_panics() {
        let _ = Mat4::IDENTITY[(0, 4)];
    }

    #[test]
    fn arithmetic() {
        let a = Mat4::IDENTITY;
        assert_eq!(a + a, a * 2.0);
        assert_eq!((a * 2.0) / 2.0, a);
        assert_eq!(a - a, Mat4::ZERO);
        assert_eq!(-a + a, Mat4::ZERO);
        assert_eq!(!sample(), sample().transpose());
        let mut m = a;
        m *= sample();
        assert_eq!(m, sample());
    }
}
