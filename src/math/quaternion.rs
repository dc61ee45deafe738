use super::{AxisAngle, Mat4, Vec3, Vec4};

/// Rotation quaternion `(x, y, z, w)` with `w` the scalar part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn as_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.as_vec4().dot(rhs.as_vec4())
    }

    pub fn magnitude(self) -> f32 {
        self.as_vec4().magnitude()
    }

    pub fn normalize(self) -> Self {
        self / self.magnitude()
    }

    /// Rotation matrix of a unit quaternion.
    pub fn to_matrix(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        Mat4::new([
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - z * w),
            2.0 * (x * z + y * w),
            0.0,
            2.0 * (x * y + z * w),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - x * w),
            0.0,
            2.0 * (x * z - y * w),
            2.0 * (y * z + x * w),
            1.0 - 2.0 * (x * x + y * y),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Extracts the rotation in the upper-left 3×3 of `m`.
    pub fn from_matrix(m: &Mat4) -> Self {
        let [x, y, z, w] = decompose_rotation(m);
        Self::new(x, y, z, w)
    }

    pub fn to_axis_angle(self) -> AxisAngle {
        AxisAngle::from_matrix(&self.to_matrix())
    }

    pub fn from_axis_angle(rotation: AxisAngle) -> Self {
        Self::from_matrix(&rotation.to_matrix())
    }
}

/// Trace-based rotation matrix to quaternion decomposition, returning
/// `[x, y, z, w]`. Branches on a positive trace, otherwise on the largest
/// diagonal element, so the square root argument stays well above zero.
pub(crate) fn decompose_rotation(m: &Mat4) -> [f32; 4] {
    let e = |r: usize, c: usize| m.data()[r * 4 + c];
    let (m00, m11, m22) = (e(0, 0), e(1, 1), e(2, 2));
    let trace = m00 + m11 + m22;

    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        [
            (e(2, 1) - e(1, 2)) * s,
            (e(0, 2) - e(2, 0)) * s,
            (e(1, 0) - e(0, 1)) * s,
            0.25 / s,
        ]
    } else if m00 > m11 && m00 > m22 {
        let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
        [
            0.25 * s,
            (e(0, 1) + e(1, 0)) / s,
            (e(0, 2) + e(2, 0)) / s,
            (e(2, 1) - e(1, 2)) / s,
        ]
    } else if m11 > m22 {
        let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
        [
            (e(0, 1) + e(1, 0)) / s,
            0.25 * s,
            (e(1, 2) + e(2, 1)) / s,
            (e(0, 2) - e(2, 0)) / s,
        ]
    } else {
        let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
        [
            (e(0, 2) + e(2, 0)) / s,
            (e(1, 2) + e(2, 1)) / s,
            0.25 * s,
            (e(1, 0) - e(0, 1)) / s,
        ]
    }
}

impl std::ops::Add for Quaternion {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl std::ops::Sub for Quaternion {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

/// Hamilton product.
impl std::ops::Mul for Quaternion {
    type Output = Self;
    fn mul(self, q: Self) -> Self {
        let p = self;
        Self::new(
            p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            p.w * q.y - p.x * q.z + p.y * q.w + p.z * q.x,
            p.w * q.z + p.x * q.y - p.y * q.x + p.z * q.w,
            p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
        )
    }
}

impl std::ops::Mul<f32> for Quaternion {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl std::ops::Div<f32> for Quaternion {
    type Output = Self;
    fn div(self, s: f32) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s, self.w / s)
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// `!q` is the conjugate.
impl std::ops::Not for Quaternion {
    type Output = Self;
    fn not(self) -> Self {
        self.conjugate()
    }
}

impl std::ops::AddAssign for Quaternion {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Quaternion {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl std::ops::MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl std::ops::MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl std::ops::DivAssign<f32> for Quaternion {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl std::ops::Mul<Vec4> for Quaternion {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.to_matrix() * v
    }
}

impl std::ops::Mul<Vec3> for Quaternion {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        self.to_matrix() * v
    }
}

impl std::fmt::Display for Quaternion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Quaternion::new(q.x, q.y, q.z, q.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn approx_eq(a: &Mat4, b: &Mat4) -> bool {
        a.data().iter().zip(b.data()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    // Covers every decomposition branch: small angles hit the trace branch,
    // half turns about each axis hit the diagonal branches.
    fn rotations() -> Vec<Mat4> {
        vec![
            Mat4::rotation(0.3, Vec3::new(1.0, 2.0, 3.0).normalize()),
            Mat4::rotation(PI, Vec3::UNIT_X),
            Mat4::rotation(PI, Vec3::UNIT_Y),
            Mat4::rotation(PI, Vec3::UNIT_Z),
            Mat4::rotation(2.9, Vec3::new(0.2, 0.3, 1.0).normalize()),
            Mat4::rotation(2.9, Vec3::new(0.1, 1.0, 0.2).normalize()),
            Mat4::rotation(2.9, Vec3::new(1.0, 0.2, 0.1).normalize()),
        ]
    }

    #[test]
    fn matrix_round_trip() {
        for r in rotations() {
            let q = Quaternion::from_matrix(&r);
            assert!((q.magnitude() - 1.0).abs() < 1e-5);
            assert!(approx_eq(&q.to_matrix(), &r));
        }
    }

    #[test]
    fn hamilton_product_matches_glam() {
        let a = Quaternion::new(0.1, 0.2, 0.3, 0.9).normalize();
        let b = Quaternion::new(-0.4, 0.1, 0.5, 0.7).normalize();
        let expected: Quaternion = (glam::Quat::from(a) * glam::Quat::from(b)).into();
        let got = a * b;
        assert!((got.as_vec4() - expected.as_vec4()).magnitude() < 1e-6);
    }

    #[test]
    fn product_composes_matrices() {
        let a = Quaternion::from_matrix(&Mat4::rotation(0.4, Vec3::UNIT_Y));
        let b = Quaternion::from_matrix(&Mat4::rotation(1.1, Vec3::UNIT_X));
        assert!(approx_eq(&(a * b).to_matrix(), &(a.to_matrix() * b.to_matrix())));
    }

    #[test]
    fn conjugate_inverts_unit_rotation() {
        let q = Quaternion::new(0.3, -0.2, 0.6, 0.5).normalize();
        let p = q * !q;
        assert!((p.as_vec4() - Quaternion::IDENTITY.as_vec4()).magnitude() < 1e-6);
    }

    #[test]
    fn axis_angle_round_trip_goes_through_matrix() {
        let aa = AxisAngle::new(Vec3::new(0.0, 0.6, 0.8), 1.2);
        let q = Quaternion::from_axis_angle(aa);
        assert!(approx_eq(&q.to_matrix(), &aa.to_matrix()));
        assert!(approx_eq(&q.to_axis_angle().to_matrix(), &aa.to_matrix()));
    }

    #[test]
    fn rotates_vectors() {
        let q = Quaternion::from_matrix(&Mat4::rotation(PI / 2.0, Vec3::UNIT_Z));
        let v = q * Vec3::UNIT_X;
        assert!((v - Vec3::UNIT_Y).magnitude() < 1e-6);
    }

    #[test]
    fn scalar_arithmetic() {
        let mut q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        q *= 2.0;
        assert_eq!(q, Quaternion::new(2.0, 4.0, 6.0, 8.0));
        q /= 2.0;
        q -= Quaternion::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(q, Quaternion::new(0.0, 1.0, 2.0, 3.0));
        assert_eq!(-q + q, Quaternion::new(0.0, 0.0, 0.0, 0.0));
    }
}
