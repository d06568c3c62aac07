/// Errors raised while building or converting expression matrices
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Buffer length does not match the declared dimensions
    #[error("shape mismatch: expected {expected} values for a {n_rows}x{n_cols} matrix, got {actual}")]
    ShapeMismatch {
        /// Declared row count
        n_rows: usize,
        /// Declared column count
        n_cols: usize,
        /// Number of values implied by the shape
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// A row of a nested-row matrix has a different width than the first row
    #[error("ragged rows: row {row} has {actual} values, expected {expected}")]
    RaggedRows {
        /// Offending row
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        actual: usize,
    },

    /// The compressed-row structure is inconsistent
    #[error("invalid CSR structure: {0}")]
    InvalidCsr(String),

    /// A coordinate falls outside the matrix
    #[error("index ({row}, {col}) out of bounds for a {n_rows}x{n_cols} matrix")]
    OutOfBounds {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Row count
        n_rows: usize,
        /// Column count
        n_cols: usize,
    },
}
