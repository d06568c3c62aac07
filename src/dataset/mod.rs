//! # Annotated single-cell datasets
//!
//! The exporter reads its input through the [`AnnotatedData`] trait: a
//! primary observation-by-feature matrix with its feature table, an optional
//! raw matrix/feature-table pair, ordered observation identifiers, an
//! observation metadata table and named embeddings aligned to the
//! observations. [`Dataset`] is the in-memory implementation.
//!
//! ```rust
//! use scexport::dataset::{ColumnValues, Dataset, FeatureTable, MetadataTable};
//! use scexport::matrix::DenseMatrix;
//!
//! let x = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]])?;
//! let obs = MetadataTable::new(3).with_column("cluster", ColumnValues::Integer(vec![0, 1, 0]))?;
//!
//! let dataset = Dataset::new(x.into(), FeatureTable::new(["G1", "G2"]), ["AAA", "BBB", "CCC"])
//!     .with_obs(obs);
//! dataset.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use crate::matrix::{DenseMatrix, ExpressionMatrix};

mod error;
mod table;


pub use error::DatasetError;
pub use table::{Column, ColumnValues, FeatureTable, MetadataTable};

/// Unfiltered copy of the matrix and its feature table
#[derive(Debug, Clone, PartialEq)]
pub struct RawData {
    /// Raw observation-by-feature matrix
    pub x: ExpressionMatrix,
    /// Feature table matching the columns of `x`
    pub var: FeatureTable,
}

impl RawData {
    /// Pair a raw matrix with its feature table
    pub fn new(x: ExpressionMatrix, var: FeatureTable) -> Self {
        Self { x, var }
    }
}

/// Read-only access to an annotated data matrix
pub trait AnnotatedData {
    /// Primary observation-by-feature matrix
    fn x(&self) -> &ExpressionMatrix;

    /// Feature table for [`AnnotatedData::x`]
    fn var(&self) -> &FeatureTable;

    /// Raw matrix/feature-table pair, if retained
    fn raw(&self) -> Option<&RawData>;

    /// Observation identifiers (barcodes), in row order
    fn obs_names(&self) -> &[String];

    /// Per-observation metadata
    fn obs(&self) -> &MetadataTable;

    /// Named embeddings, one row per observation
    fn obsm(&self) -> &BTreeMap<String, DenseMatrix>;

    /// Number of observations
    fn n_obs(&self) -> usize {
        self.obs_names().len()
    }

    /// Look up an embedding by key
    fn embedding(&self, key: &str) -> Option<&DenseMatrix> {
        self.obsm().get(key)
    }

    /// The matrix/feature-table pair to export: raw when present, primary otherwise
    fn counts(&self) -> (&ExpressionMatrix, &FeatureTable) {
        match self.raw() {
            Some(raw) => (&raw.x, &raw.var),
            None => (self.x(), self.var()),
        }
    }
}

/// In-memory annotated data matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: ExpressionMatrix,
    var: FeatureTable,
    raw: Option<RawData>,
    obs_names: Vec<String>,
    obs: MetadataTable,
    obsm: BTreeMap<String, DenseMatrix>,
}

impl Dataset {
    /// Create a dataset with an empty metadata table and no embeddings
    pub fn new<I, S>(x: ExpressionMatrix, var: FeatureTable, obs_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let obs_names: Vec<String> = obs_names.into_iter().map(Into::into).collect();
        let obs = MetadataTable::new(obs_names.len());
        Self {
            x,
            var,
            raw: None,
            obs_names,
            obs,
            obsm: BTreeMap::new(),
        }
    }

    /// Replace the observation metadata
    pub fn with_obs(mut self, obs: MetadataTable) -> Self {
        self.obs = obs;
        self
    }

    /// Attach a raw matrix/feature-table pair
    pub fn with_raw(mut self, raw: RawData) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Add or replace a named embedding
    pub fn with_embedding(mut self, key: impl Into<String>, embedding: DenseMatrix) -> Self {
        self.obsm.insert(key.into(), embedding);
        self
    }

    /// Check every embedding along with the matrix and table shapes
    pub fn validate(&self) -> Result<(), DatasetError> {
        let keys: Vec<&str> = self.obsm.keys().map(String::as_str).collect();
        validate_dataset(self, &keys)
    }
}

impl AnnotatedData for Dataset {
    fn x(&self) -> &ExpressionMatrix {
        &self.x
    }

    fn var(&self) -> &FeatureTable {
        &self.var
    }

    fn raw(&self) -> Option<&RawData> {
        self.raw.as_ref()
    }

    fn obs_names(&self) -> &[String] {
        &self.obs_names
    }

    fn obs(&self) -> &MetadataTable {
        &self.obs
    }

    fn obsm(&self) -> &BTreeMap<String, DenseMatrix> {
        &self.obsm
    }
}

/// Check the shape contract of a dataset.
///
/// Matrix rows, observation identifiers and metadata rows must agree, matrix
/// columns must match the feature table, and each embedding named in
/// `embedding_keys` (when present) must have one row per observation.
/// Absent embeddings are not an error.
pub fn validate_dataset<D>(data: &D, embedding_keys: &[&str]) -> Result<(), DatasetError>
where
    D: AnnotatedData + ?Sized,
{
    let n_obs = data.n_obs();

    check_pair("matrix", data.x(), data.var(), n_obs)?;
    if let Some(raw) = data.raw() {
        check_pair("raw matrix", &raw.x, &raw.var, n_obs)?;
    }

    if data.obs().n_rows() != n_obs {
        return Err(DatasetError::mismatch(
            "observation metadata",
            n_obs,
            data.obs().n_rows(),
        ));
    }

    for key in embedding_keys {
        if let Some(embedding) = data.embedding(key) {
            if embedding.n_rows() != n_obs {
                return Err(DatasetError::mismatch(
                    format!("embedding '{}'", key),
                    n_obs,
                    embedding.n_rows(),
                ));
            }
        }
    }

    Ok(())
}

fn check_pair(
    label: &str,
    x: &ExpressionMatrix,
    var: &FeatureTable,
    n_obs: usize,
) -> Result<(), DatasetError> {
    let (n_rows, n_cols) = x.shape();
    if n_rows != n_obs {
        return Err(DatasetError::mismatch(format!("{} rows", label), n_obs, n_rows));
    }
    if n_cols != var.len() {
        return Err(DatasetError::mismatch(
            format!("{} columns", label),
            var.len(),
            n_cols,
        ));
    }
    Ok(())
}
