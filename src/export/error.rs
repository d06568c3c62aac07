use crate::dataset::DatasetError;

/// Errors that can occur while exporting a dataset
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error creating the directory or writing an artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the TSV writer
    #[error("TSV writer error: {0}")]
    CsvError(#[from] csv::Error),

    /// The dataset violates its shape contract
    #[error("Dataset error: {0}")]
    DatasetError(#[from] DatasetError),
}
