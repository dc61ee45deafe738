//! Operator boilerplate shared by the vector and matrix types.

/// Implements component-wise arithmetic, indexing and formatting for a
/// vector type whose fields are listed with their index.
macro_rules! impl_vector {
    ($t:ident, $len:literal, { $($i:literal => $f:ident),+ }) => {
        impl $t {
            /// Number of components.
            pub const LEN: usize = $len;

            /// All components set to `value`.
            pub const fn splat(value: f32) -> Self {
                Self { $($f: value),+ }
            }

            /// Components in `x, y, z, w` order.
            pub const fn to_array(self) -> [f32; $len] {
                [$(self.$f),+]
            }

            /// Checked component access.
            pub fn get(&self, index: usize) -> Result<f32, $crate::math::MathError> {
                match index {
                    $($i => Ok(self.$f),)+
                    _ => Err($crate::math::MathError::IndexOutOfRange { index, len: $len }),
                }
            }

            /// Copy of `self` with component `index` replaced.
            pub fn with(self, index: usize, value: f32) -> Result<Self, $crate::math::MathError> {
                let mut out = self;
                match index {
                    $($i => out.$f = value,)+
                    _ => return Err($crate::math::MathError::IndexOutOfRange { index, len: $len }),
                }
                Ok(out)
            }

            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$f * rhs.$f)+
            }

            pub fn magnitude(self) -> f32 {
                self.dot(self).sqrt()
            }

            /// Unit-length copy. The zero vector yields NaN components.
            pub fn normalize(self) -> Self {
                self / self.magnitude()
            }
        }

        impl From<[f32; $len]> for $t {
            fn from(v: [f32; $len]) -> Self {
                Self { $($f: v[$i]),+ }
            }
        }

        impl From<$t> for [f32; $len] {
            fn from(v: $t) -> Self {
                v.to_array()
            }
        }

        impl std::ops::Index<usize> for $t {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match index {
                    $($i => &self.$f,)+
                    _ => panic!("index {} out of range for {}", index, stringify!($t)),
                }
            }
        }

        impl std::ops::Add for $t {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($f: self.$f + rhs.$f),+ }
            }
        }

        impl std::ops::Sub for $t {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($f: self.$f - rhs.$f),+ }
            }
        }

        impl std::ops::Mul for $t {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Self { $($f: self.$f * rhs.$f),+ }
            }
        }

        impl std::ops::Div for $t {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                Self { $($f: self.$f / rhs.$f),+ }
            }
        }

        impl std::ops::Mul<f32> for $t {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { $($f: self.$f * rhs),+ }
            }
        }

        impl std::ops::Mul<$t> for f32 {
            type Output = $t;
            fn mul(self, rhs: $t) -> $t {
                rhs * self
            }
        }

        impl std::ops::Div<f32> for $t {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self { $($f: self.$f / rhs),+ }
            }
        }

        impl std::ops::Neg for $t {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($f: -self.$f),+ }
            }
        }

        impl std::ops::AddAssign for $t {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $t {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl std::ops::MulAssign for $t {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign for $t {
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl std::ops::MulAssign<f32> for $t {
            fn mul_assign(&mut self, rhs: f32) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign<f32> for $t {
            fn div_assign(&mut self, rhs: f32) {
                *self = *self / rhs;
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let parts = self.to_array();
                write!(f, "(")?;
                for (i, v) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    };
}

/// Implements storage access, element-wise arithmetic, the matrix product
/// and formatting for a square row-major matrix of side `$n`.
macro_rules! impl_matrix {
    ($t:ident, $n:literal, $len:literal) => {
        impl $t {
            /// Side length.
            pub const SIZE: usize = $n;

            /// All elements zero.
            pub const ZERO: Self = Self { m: [0.0; $len] };

            /// Builds a matrix from row-major elements.
            pub const fn new(m: [f32; $len]) -> Self {
                Self { m }
            }

            /// Every element set to `value`.
            pub const fn splat(value: f32) -> Self {
                Self { m: [value; $len] }
            }

            pub fn from_rows(rows: [[f32; $n]; $n]) -> Self {
                let mut m = [0.0; $len];
                for (r, row) in rows.iter().enumerate() {
                    m[r * $n..(r + 1) * $n].copy_from_slice(row);
                }
                Self { m }
            }

            pub fn identity() -> Self {
                Self::IDENTITY
            }

            /// Row-major element storage.
            pub fn data(&self) -> &[f32; $len] {
                &self.m
            }

            pub fn row(&self, r: usize) -> [f32; $n] {
                let mut out = [0.0; $n];
                out.copy_from_slice(&self.m[r * $n..(r + 1) * $n]);
                out
            }

            /// Checked access by flat row-major index.
            pub fn get(&self, index: usize) -> Result<f32, $crate::math::MathError> {
                self.m
                    .get(index)
                    .copied()
                    .ok_or($crate::math::MathError::IndexOutOfRange { index, len: $len })
            }

            /// Checked access by `(row, column)`.
            pub fn at(&self, row: usize, column: usize) -> Result<f32, $crate::math::MathError> {
                Self::flat(row, column).map(|i| self.m[i])
            }

            /// Copy of `self` with the element at `index` replaced.
            pub fn with(self, index: usize, value: f32) -> Result<Self, $crate::math::MathError> {
                if index >= $len {
                    return Err($crate::math::MathError::IndexOutOfRange { index, len: $len });
                }
                let mut out = self;
                out.m[index] = value;
                Ok(out)
            }

            /// Copy of `self` with the element at `(row, column)` replaced.
            pub fn with_at(
                self,
                row: usize,
                column: usize,
                value: f32,
            ) -> Result<Self, $crate::math::MathError> {
                let i = Self::flat(row, column)?;
                let mut out = self;
                out.m[i] = value;
                Ok(out)
            }

            pub fn transpose(&self) -> Self {
                let mut m = [0.0; $len];
                for r in 0..$n {
                    for c in 0..$n {
                        m[c * $n + r] = self.m[r * $n + c];
                    }
                }
                Self { m }
            }

            fn flat(row: usize, column: usize) -> Result<usize, $crate::math::MathError> {
                if row < $n && column < $n {
                    Ok(row * $n + column)
                } else {
                    Err($crate::math::MathError::PositionOutOfRange {
                        row,
                        column,
                        size: $n,
                    })
                }
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl std::ops::Index<usize> for $t {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match self.m.get(index) {
                    Some(v) => v,
                    None => panic!("index {} out of range for {}", index, stringify!($t)),
                }
            }
        }

        impl std::ops::Index<(usize, usize)> for $t {
            type Output = f32;

            fn index(&self, (row, column): (usize, usize)) -> &f32 {
                match Self::flat(row, column) {
                    Ok(i) => &self.m[i],
                    Err(e) => panic!("{}", e),
                }
            }
        }

        impl std::ops::Add for $t {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                let mut m = self.m;
                for (a, b) in m.iter_mut().zip(rhs.m) {
                    *a += b;
                }
                Self { m }
            }
        }

        impl std::ops::Sub for $t {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                let mut m = self.m;
                for (a, b) in m.iter_mut().zip(rhs.m) {
                    *a -= b;
                }
                Self { m }
            }
        }

        impl std::ops::Mul for $t {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                let mut m = [0.0; $len];
                for r in 0..$n {
                    for c in 0..$n {
                        let mut sum = 0.0;
                        for k in 0..$n {
                            sum += self.m[r * $n + k] * rhs.m[k * $n + c];
                        }
                        m[r * $n + c] = sum;
                    }
                }
                Self { m }
            }
        }

        impl std::ops::Mul<f32> for $t {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { m: self.m.map(|v| v * rhs) }
            }
        }

        impl std::ops::Div<f32> for $t {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self { m: self.m.map(|v| v / rhs) }
            }
        }

        impl std::ops::Neg for $t {
            type Output = Self;
            fn neg(self) -> Self {
                Self { m: self.m.map(|v| -v) }
            }
        }

        /// `!m` is the transpose.
        impl std::ops::Not for $t {
            type Output = Self;
            fn not(self) -> Self {
                self.transpose()
            }
        }

        impl std::ops::AddAssign for $t {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl std::ops::SubAssign for $t {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl std::ops::MulAssign for $t {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl std::ops::MulAssign<f32> for $t {
            fn mul_assign(&mut self, rhs: f32) {
                *self = *self * rhs;
            }
        }

        impl std::ops::DivAssign<f32> for $t {
            fn div_assign(&mut self, rhs: f32) {
                *self = *self / rhs;
            }
        }

        /// `{}` prints `[a, b; c, d]`, `{:#}` prints one bracketed row per line.
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let pretty = f.alternate();
                write!(f, "[")?;
                for r in 0..$n {
                    if r > 0 {
                        if pretty {
                            write!(f, "]\n[")?;
                        } else {
                            write!(f, "; ")?;
                        }
                    }
                    for c in 0..$n {
                        if c > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", self.m[r * $n + c])?;
                    }
                }
                write!(f, "]")
            }
        }
    };
}

pub(crate) use impl_matrix;
pub(crate) use impl_vector;
