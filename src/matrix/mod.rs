//! # Expression matrices
//!
//! Observation-by-feature matrices in either dense or compressed-row sparse
//! form. Sparse storage is a `sprs` [`CsMat`](sprs::CsMat). The exporter only
//! ever serializes [`CsrMatrix`]; dense inputs go
//! through [`ExpressionMatrix::to_csr`] first so the Matrix Market header and
//! entry layout are the same regardless of input density.
//!
//! ```rust
//! use scexport::matrix::{DenseMatrix, ExpressionMatrix};
//!
//! let dense = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]])?;
//! let x = ExpressionMatrix::Dense(dense);
//!
//! let csr = x.to_csr();
//! assert_eq!(csr.shape(), (3, 2));
//! assert_eq!(csr.nnz(), 4);
//! # Ok::<(), scexport::matrix::MatrixError>(())
//! ```

use std::borrow::Cow;

mod dense;
mod error;
mod sparse;

pub use dense::DenseMatrix;
pub use error::MatrixError;
pub use sparse::{csr_from_dense, csr_from_parts, csr_from_triplets, CsrMatrix};

/// An expression matrix, rows are observations and columns are features
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionMatrix {
    /// Dense row-major values
    Dense(DenseMatrix),
    /// Sparse values, normally compressed-row
    Sparse(CsrMatrix),
}

impl ExpressionMatrix {
    /// `(observations, features)`
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(m) => m.shape(),
            Self::Sparse(m) => m.shape(),
        }
    }

    /// Number of observations
    pub fn n_rows(&self) -> usize {
        self.shape().0
    }

    /// Number of features
    pub fn n_cols(&self) -> usize {
        self.shape().1
    }

    /// Whether the matrix is already stored sparse
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Sparse view of the matrix, converting dense storage on demand
    pub fn to_csr(&self) -> Cow<'_, CsrMatrix> {
        match self {
            Self::Sparse(m) if m.is_csr() => Cow::Borrowed(m),
            // Column-major storage is reordered row by row
            Self::Sparse(m) => Cow::Owned(m.to_csr()),
            Self::Dense(m) => Cow::Owned(csr_from_dense(m)),
        }
    }
}

impl From<DenseMatrix> for ExpressionMatrix {
    fn from(m: DenseMatrix) -> Self {
        Self::Dense(m)
    }
}

impl From<CsrMatrix> for ExpressionMatrix {
    fn from(m: CsrMatrix) -> Self {
        Self::Sparse(m)
    }
}
