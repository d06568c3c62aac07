use super::layout::{DEFAULT_PCA_KEY, DEFAULT_UMAP_KEY};

/// Highest gzip compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Configuration for the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Write `pca.drc` when the PCA embedding is present
    pub include_pca: bool,

    /// Gzip level for the compressed artifacts (0-9)
    pub compression_level: u32,

    /// Embedding key holding UMAP coordinates
    pub umap_key: String,

    /// Embedding key holding PCA coordinates
    pub pca_key: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_pca: true,
            compression_level: MAX_COMPRESSION_LEVEL,
            umap_key: DEFAULT_UMAP_KEY.to_string(),
            pca_key: DEFAULT_PCA_KEY.to_string(),
        }
    }
}

impl ExportConfig {
    /// Toggle the PCA artifact
    pub fn with_include_pca(mut self, include_pca: bool) -> Self {
        self.include_pca = include_pca;
        self
    }

    /// Set the gzip level, clamped to 0-9
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(MAX_COMPRESSION_LEVEL);
        self
    }

    /// Read UMAP coordinates from a different embedding key
    pub fn with_umap_key(mut self, key: impl Into<String>) -> Self {
        self.umap_key = key.into();
        self
    }

    /// Read PCA coordinates from a different embedding key
    pub fn with_pca_key(mut self, key: impl Into<String>) -> Self {
        self.pca_key = key.into();
        self
    }

    /// gzip level as a `flate2` setting
    pub(crate) fn compression(&self) -> flate2::Compression {
        flate2::Compression::new(self.compression_level.min(MAX_COMPRESSION_LEVEL))
    }
}
