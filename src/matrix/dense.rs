use super::error::MatrixError;

/// Row-major dense matrix of `f64` values.
///
/// Used both for dense expression matrices and for embeddings
/// (one row per observation, one column per dimension).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Create a matrix from a row-major buffer
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] if `data.len() != n_rows * n_cols`.
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        let expected = n_rows * n_cols;
        if data.len() != expected {
            return Err(MatrixError::ShapeMismatch {
                n_rows,
                n_cols,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Create a matrix from nested rows
    ///
    /// An empty slice yields a 0x0 matrix.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let n_cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n_cols {
                return Err(MatrixError::RaggedRows {
                    row,
                    expected: n_cols,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Self::new(rows.len(), n_cols, data)
    }

    /// An all-zero matrix
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // Not chunks_exact: a zero-width matrix still has rows
        (0..self.n_rows).map(move |r| {
            let start = r * self.n_cols;
            &self.data[start..start + self.n_cols]
        })
    }
}
