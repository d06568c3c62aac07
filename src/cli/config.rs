//! TOML configuration file support.
//!
//! Settings that would otherwise be passed as flags can live in a file:
//!
//! ```toml
//! # scexport.toml
//! [export]
//! include_pca = false
//! compression_level = 6
//! umap_key = "X_umap_harmony"
//! pca_key = "X_pca"
//! ```
//!
//! Flags given on the command line take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use scexport::export::ExportConfig;

/// Root configuration structure for scexport.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Export settings.
    #[serde(default)]
    pub export: ExportSection,
}

/// The `[export]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    /// Write pca.drc when the PCA embedding is present.
    pub include_pca: Option<bool>,

    /// Gzip level (0-9).
    pub compression_level: Option<u32>,

    /// Embedding key for UMAP coordinates.
    pub umap_key: Option<String>,

    /// Embedding key for PCA coordinates.
    pub pca_key: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Overlay the file settings on top of `base`.
    pub fn apply(&self, mut base: ExportConfig) -> ExportConfig {
        let section = &self.export;
        if let Some(include_pca) = section.include_pca {
            base = base.with_include_pca(include_pca);
        }
        if let Some(level) = section.compression_level {
            base = base.with_compression_level(level);
        }
        if let Some(key) = &section.umap_key {
            base = base.with_umap_key(key.clone());
        }
        if let Some(key) = &section.pca_key {
            base = base.with_pca_key(key.clone());
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [export]
            include_pca = false
            compression_level = 6
            umap_key = "X_umap_harmony"
            pca_key = "X_pca_harmony"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.export.include_pca, Some(false));
        assert_eq!(config.export.compression_level, Some(6));

        let export = config.apply(ExportConfig::default());
        assert!(!export.include_pca);
        assert_eq!(export.compression_level, 6);
        assert_eq!(export.umap_key, "X_umap_harmony");
        assert_eq!(export.pca_key, "X_pca_harmony");
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [export]
            compression_level = 1
        "#;

        let config = Config::from_str(toml).unwrap();
        let export = config.apply(ExportConfig::default());
        assert_eq!(export.compression_level, 1);
        assert!(export.include_pca);
        assert_eq!(export.umap_key, "X_umap");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.export.include_pca, None);
        assert_eq!(config.apply(ExportConfig::default()), ExportConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_str("[export]\nrow_group_size = 5\n").is_err());
    }
}
