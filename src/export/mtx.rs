//! Matrix Market coordinate writer.
//!
//! The matrix is written features-by-barcodes, the layout Cell Ranger and
//! its readers expect: row indices are 1-based feature positions and column
//! indices are 1-based barcode positions. The selected observation-by-feature
//! matrix is therefore transposed on the way out. The value field is always
//! `real`, matching the `f64` storage, so float readers such as
//! `sprs::io::read_matrix_market` accept the file.
//!
//! ```text
//! %%MatrixMarket matrix coordinate real general
//! % written by sprs
//! 2 3 4
//! 1 1 1
//! 2 2 2
//! 1 3 3
//! 2 3 3
//! ```

use std::io::{self, Write};

use crate::matrix::CsrMatrix;

/// Header line opening every exported matrix
pub const MTX_HEADER: &str = "%%MatrixMarket matrix coordinate real general";

/// Write `matrix` (observations x features) as a features x barcodes
/// coordinate file.
///
/// Entries are emitted in storage order of the transposed view, so
/// barcode-major for CSR input.
pub fn write_matrix_market<W>(writer: &mut W, matrix: &CsrMatrix) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let transposed = matrix.transpose_view();
    sprs::io::write_matrix_market_to_bufwrite(writer, &transposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{csr_from_dense, csr_from_parts, csr_from_triplets, DenseMatrix};

    fn render(matrix: &CsrMatrix) -> String {
        let mut buf = Vec::new();
        write_matrix_market(&mut buf, matrix).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn entries(text: &str) -> Vec<&str> {
        text.lines().filter(|l| !l.starts_with('%')).skip(1).collect()
    }

    #[test]
    fn test_transposed_layout() {
        let dense = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]]).unwrap();
        let text = render(&csr_from_dense(&dense));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], MTX_HEADER);
        assert_eq!(lines[2], "2 3 4");
        assert_eq!(entries(&text), vec!["1 1 1", "2 2 2", "1 3 3", "2 3 3"]);
    }

    #[test]
    fn test_integral_counts_still_real() {
        let csr = csr_from_triplets(2, 2, vec![(0, 0, 5.0), (1, 1, 12.0)]).unwrap();
        assert!(render(&csr).starts_with(MTX_HEADER));
    }

    #[test]
    fn test_fractional_values() {
        let csr = csr_from_triplets(1, 2, vec![(0, 1, 0.25), (0, 0, 2.0)]).unwrap();
        let text = render(&csr);
        assert_eq!(entries(&text), vec!["1 1 2", "2 1 0.25"]);
    }

    #[test]
    fn test_empty_matrix_header_only() {
        let text = render(&CsrMatrix::zero((4, 7)));
        assert_eq!(text.lines().filter(|l| !l.starts_with('%')).count(), 1);
        assert!(text.lines().any(|l| l == "7 4 0"));
    }

    #[test]
    fn test_explicit_zero_counted() {
        let csr = csr_from_parts(1, 2, vec![0, 2], vec![0, 1], vec![0.0, 1.0]).unwrap();
        let text = render(&csr);
        assert!(text.lines().any(|l| l == "2 1 2"));
        assert_eq!(entries(&text)[0], "1 1 0");
    }

    #[test]
    fn test_readable_as_float_matrix() {
        let dense = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]]).unwrap();
        let text = render(&csr_from_dense(&dense));

        let tri: sprs::TriMat<f32> =
            sprs::io::read_matrix_market_from_bufread(&mut text.as_bytes()).unwrap();
        assert_eq!(tri.shape(), (2, 3));
        assert_eq!(tri.nnz(), 4);

        let counts: sprs::CsMat<f32> = tri.to_csr();
        assert_eq!(counts.get(1, 2), Some(&3.0));
        assert_eq!(counts.get(0, 1), None);
    }
}
