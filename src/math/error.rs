/// Errors raised by checked math operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// A flat component or element index was outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
    /// A `(row, column)` pair was outside a `size × size` matrix.
    PositionOutOfRange {
        row: usize,
        column: usize,
        size: usize,
    },
    /// The matrix determinant is exactly zero.
    Singular,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            MathError::PositionOutOfRange { row, column, size } => {
                write!(
                    f,
                    "position ({}, {}) out of range for a {}x{} matrix",
                    row, column, size, size
                )
            }
            MathError::Singular => write!(f, "matrix is not invertible"),
        }
    }
}

impl std::error::Error for MathError {}
