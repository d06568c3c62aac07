use sprs::{CsMat, TriMat};

use super::dense::DenseMatrix;
use super::error::MatrixError;

/// Compressed sparse matrix of `f64` values.
///
/// Every constructor in this module yields row-major (CSR) storage.
pub type CsrMatrix = CsMat<f64>;

/// Build a CSR matrix from `(row, col, value)` triplets.
///
/// Duplicate coordinates are summed. Every triplet is kept, including
/// explicit zeros.
///
/// # Errors
///
/// Returns [`MatrixError::OutOfBounds`] for a coordinate outside the shape.
pub fn csr_from_triplets<I>(
    n_rows: usize,
    n_cols: usize,
    triplets: I,
) -> Result<CsrMatrix, MatrixError>
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut tri = TriMat::new((n_rows, n_cols));
    for (row, col, value) in triplets {
        if row >= n_rows || col >= n_cols {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                n_rows,
                n_cols,
            });
        }
        tri.add_triplet(row, col, value);
    }
    Ok(tri.to_csr())
}

/// Assemble a CSR matrix from its raw buffers
///
/// # Errors
///
/// Returns [`MatrixError::InvalidCsr`] when `sprs` rejects the structure.
pub fn csr_from_parts(
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
) -> Result<CsrMatrix, MatrixError> {
    CsMat::try_new((n_rows, n_cols), indptr, indices, data)
        .map_err(|(_, _, _, e)| MatrixError::InvalidCsr(e.to_string()))
}

/// Convert a dense matrix, keeping every value that is not exactly zero
pub fn csr_from_dense(dense: &DenseMatrix) -> CsrMatrix {
    let mut tri = TriMat::new(dense.shape());
    for (row, values) in dense.rows().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            // NaN != 0.0, so missing values stay stored
            if value != 0.0 {
                tri.add_triplet(row, col, value);
            }
        }
    }
    tri.to_csr()
}
