use super::quaternion::decompose_rotation;
use super::{Mat4, Vec3, Vec4};

/// A rotation of `angle` radians about the unit axis `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub angle: f32,
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::new(Vec3::UNIT_X, 0.0)
    }
}

impl AxisAngle {
    pub const fn new(axis: Vec3, angle: f32) -> Self {
        Self {
            x: axis.x,
            y: axis.y,
            z: axis.z,
            angle,
        }
    }

    pub const fn axis(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn with_axis(self, axis: Vec3) -> Self {
        Self::new(axis, self.angle)
    }

    pub fn with_angle(self, angle: f32) -> Self {
        Self { angle, ..self }
    }

    /// Rodrigues rotation matrix.
    pub fn to_matrix(self) -> Mat4 {
        Mat4::rotation(self.angle, self.axis())
    }

    /// Recovers axis and angle from the rotation in `m`.
    ///
    /// Uses the same decomposition as [`Quaternion::from_matrix`]. A rotation
    /// with no effective angle comes back as a zero turn about `UNIT_X`.
    ///
    /// [`Quaternion::from_matrix`]: super::Quaternion::from_matrix
    pub fn from_matrix(m: &Mat4) -> Self {
        let [x, y, z, w] = decompose_rotation(m);
        let v = Vec3::new(x, y, z);
        let n = v.magnitude();
        if n == 0.0 {
            return Self::default();
        }
        // atan2 keeps small angles exact where acos(w) saturates near 1.
        Self::new(v / n, 2.0 * n.atan2(w))
    }
}

/// Composes two rotations. Shared axes add angles, opposite axes subtract,
/// anything else goes through the matrix product.
impl std::ops::Add for AxisAngle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let a = self.axis().normalize();
        let b = rhs.axis().normalize();
        if a == b {
            self.with_angle(self.angle + rhs.angle)
        } else if a == -b {
            self.with_angle(self.angle - rhs.angle)
        } else {
            Self::from_matrix(&(self.to_matrix() * rhs.to_matrix()))
        }
    }
}

impl std::ops::Sub for AxisAngle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl std::ops::Neg for AxisAngle {
    type Output = Self;
    fn neg(self) -> Self {
        self.with_angle(-self.angle)
    }
}

impl std::ops::Mul<f32> for AxisAngle {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        self.with_angle(self.angle * s)
    }
}

impl std::ops::Div<f32> for AxisAngle {
    type Output = Self;
    fn div(self, s: f32) -> Self {
        self.with_angle(self.angle / s)
    }
}

impl std::ops::AddAssign for AxisAngle {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for AxisAngle {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl std::ops::MulAssign<f32> for AxisAngle {
    fn mul_assign(&mut self, s: f32) {
        *self = *self * s;
    }
}

impl std::ops::DivAssign<f32> for AxisAngle {
    fn div_assign(&mut self, s: f32) {
        *self = *self / s;
    }
}

impl std::ops::Mul<Vec4> for AxisAngle {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.to_matrix() * v
    }
}

impl std::ops::Mul<Vec3> for AxisAngle {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        self.to_matrix() * v
    }
}

impl std::fmt::Display for AxisAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "([{}, {}, {}], {})", self.x, self.y, self.z, self.angle)
    }
}
