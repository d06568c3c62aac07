use std::fmt;
use std::path::PathBuf;

/// Statistics from a completed export
#[derive(Debug, Clone)]
pub struct ExportStats {
    /// Output directory
    pub output_dir: PathBuf,

    /// Number of observations (barcodes) written
    pub n_obs: usize,

    /// Number of features written
    pub n_features: usize,

    /// Stored entries written to the Matrix Market file
    pub nnz: usize,

    /// Whether the raw matrix/feature-table pair was exported
    pub used_raw: bool,

    /// Every artifact written, in write order
    pub files_written: Vec<PathBuf>,

    /// Combined size of the artifacts in bytes
    pub total_size_bytes: u64,
}

impl ExportStats {
    /// Whether an artifact with this file name was written
    pub fn wrote(&self, file_name: &str) -> bool {
        self.files_written
            .iter()
            .any(|p| p.file_name().map(|n| n == file_name).unwrap_or(false))
    }
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported {} barcodes x {} features ({} nonzero{}) as {} files, {} bytes",
            self.n_obs,
            self.n_features,
            self.nnz,
            if self.used_raw { ", raw" } else { "" },
            self.files_written.len(),
            self.total_size_bytes
        )
    }
}
