//! # scexport - Cell Ranger-style export for annotated single-cell data
//!
//! `scexport` takes an annotated single-cell dataset (an expression matrix of
//! observations x features, per-observation metadata and low-dimensional
//! embeddings) and writes it as the flat directory layout that Cell Ranger
//! produces and that most single-cell tooling can read back.
//!
//! ## Key Features
//!
//! - **Raw counts first**: when a dataset carries a raw matrix/feature pair,
//!   that pair is exported instead of the processed one.
//!
//! - **Dense or sparse input**: dense matrices are converted to compressed-row
//!   form; stored entries of sparse matrices are written as-is.
//!
//! - **Streaming compression**: gzip artifacts are encoded while they are
//!   written, so no uncompressed intermediate ever reaches the disk.
//!
//! - **Shape checks up front**: every dimension that the layout depends on is
//!   validated before the output directory is created.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scexport::dataset::{ColumnValues, Dataset, FeatureTable, MetadataTable};
//! use scexport::export::export;
//! use scexport::matrix::DenseMatrix;
//!
//! let x = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]])?;
//! let obs = MetadataTable::new(3)
//!     .with_column("cluster", ColumnValues::Integer(vec![0, 1, 0]))?;
//!
//! let dataset = Dataset::new(x.into(), FeatureTable::new(["G1", "G2"]), ["AAA", "BBB", "CCC"])
//!     .with_obs(obs)
//!     .with_embedding("X_umap", DenseMatrix::zeros(3, 2));
//!
//! let stats = export(&dataset, "exported", true)?;
//! println!("Wrote {} files", stats.files_written.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This creates a directory structure:
//! ```text
//! exported/
//! ├── matrix.mtx.gz      # Matrix Market coordinates, features x barcodes
//! ├── features.tsv.gz    # id, id, "Gene Expression"
//! ├── barcodes.tsv.gz    # one barcode per line
//! ├── meta.tsv           # metadata + barcode column
//! └── umap.drc           # UMAP coordinates
//! ```
//!
//! ## Architecture
//!
//! - [`matrix`]: dense and compressed-row expression matrices
//! - [`dataset`]: the annotated dataset model and its shape contract
//! - [`export`]: the directory writer and its individual artifact writers
//! - [`ingest`]: building datasets from tab-separated files on disk

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod export;
pub mod ingest;
pub mod matrix;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{
        validate_dataset, AnnotatedData, Column, ColumnValues, Dataset, DatasetError,
        FeatureTable, MetadataTable, RawData,
    };
    pub use crate::export::{export, ExportConfig, ExportError, ExportStats, Exporter};
    pub use crate::ingest::{DatasetLoader, IngestError};
    pub use crate::matrix::{
        csr_from_dense, csr_from_parts, csr_from_triplets, CsrMatrix, DenseMatrix,
        ExpressionMatrix, MatrixError,
    };
}
