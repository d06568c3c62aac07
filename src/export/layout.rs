//! File names of the exported directory.

/// Gzip Matrix Market matrix, features as rows and barcodes as columns
pub const MATRIX_FILE: &str = "matrix.mtx.gz";

/// Gzip feature table: id, name, type
pub const FEATURES_FILE: &str = "features.tsv.gz";

/// Gzip barcode list, one per line
pub const BARCODES_FILE: &str = "barcodes.tsv.gz";

/// Observation metadata with an appended barcode column
pub const META_FILE: &str = "meta.tsv";

/// UMAP coordinates
pub const UMAP_FILE: &str = "umap.drc";

/// PCA coordinates
pub const PCA_FILE: &str = "pca.drc";

/// Feature type written in the third column of the feature table
pub const FEATURE_TYPE: &str = "Gene Expression";

/// Name of the metadata column holding observation identifiers
pub const BARCODE_COLUMN: &str = "barcode";

/// Default embedding key for UMAP coordinates
pub const DEFAULT_UMAP_KEY: &str = "X_umap";

/// Default embedding key for PCA coordinates
pub const DEFAULT_PCA_KEY: &str = "X_pca";
