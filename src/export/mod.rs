//! # Cell Ranger-style export
//!
//! Writes an annotated dataset into a directory of flat files:
//!
//! ```text
//! {outdir}/
//! ├── matrix.mtx.gz      # Matrix Market coordinates, features x barcodes
//! ├── features.tsv.gz    # id, name, "Gene Expression"
//! ├── barcodes.tsv.gz    # one barcode per line
//! ├── meta.tsv           # observation metadata + barcode column
//! ├── umap.drc           # UMAP coordinates (when present)
//! └── pca.drc            # PCA coordinates (when present and enabled)
//! ```
//!
//! When the dataset carries a raw matrix/feature-table pair, the raw pair is
//! exported instead of the primary one. Dense matrices are converted to
//! compressed-row form before writing. Compressed artifacts are streamed
//! straight through a gzip encoder; no uncompressed copy touches the disk.
//!
//! Files are written one after another with no rollback: if an artifact
//! fails, the ones before it stay on disk. Existing files with the same
//! names are overwritten.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scexport::dataset::{Dataset, FeatureTable};
//! use scexport::export::{ExportConfig, Exporter};
//! use scexport::matrix::DenseMatrix;
//!
//! let x = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]])?;
//! let dataset = Dataset::new(x.into(), FeatureTable::new(["G1", "G2"]), ["AAA", "BBB"]);
//!
//! let exporter = Exporter::with_config(ExportConfig::default().with_include_pca(false));
//! let stats = exporter.export(&dataset, "exported")?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dataset::{validate_dataset, AnnotatedData};
use crate::matrix::DenseMatrix;

mod config;
mod error;
pub mod layout;
pub mod mtx;
mod stats;
pub mod tsv;


pub use config::{ExportConfig, MAX_COMPRESSION_LEVEL};
pub use error::ExportError;
pub use stats::ExportStats;

use layout::{BARCODES_FILE, FEATURES_FILE, MATRIX_FILE, META_FILE, PCA_FILE, UMAP_FILE};

/// Exports annotated datasets into Cell Ranger-style directories
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    /// Exporter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter with a custom configuration
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Write every applicable artifact for `data` into `outdir`.
    ///
    /// The directory (and its parents) is created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DatasetError`] before touching the filesystem if
    /// the dataset shapes disagree, and I/O or serialization errors as they
    /// occur.
    pub fn export<D, P>(&self, data: &D, outdir: P) -> Result<ExportStats, ExportError>
    where
        D: AnnotatedData + ?Sized,
        P: AsRef<Path>,
    {
        let outdir = outdir.as_ref();
        let config = &self.config;

        let mut embedding_keys = vec![config.umap_key.as_str()];
        if config.include_pca {
            embedding_keys.push(config.pca_key.as_str());
        }
        validate_dataset(data, &embedding_keys)?;

        fs::create_dir_all(outdir)?;
        info!("Exporting dataset to {}", outdir.display());

        let used_raw = data.raw().is_some();
        let (x, var) = data.counts();
        debug!(
            "Using {} matrix ({} x {}, {})",
            if used_raw { "raw" } else { "primary" },
            x.n_rows(),
            x.n_cols(),
            if x.is_sparse() { "sparse" } else { "dense" }
        );

        let mut files_written = Vec::new();
        let level = config.compression();

        // matrix.mtx.gz
        let csr = x.to_csr();
        let path = outdir.join(MATRIX_FILE);
        let mut gz = tsv::create_gz(&path, level)?;
        mtx::write_matrix_market(&mut gz, &csr)?;
        tsv::finish_gz(gz)?;
        debug!("Wrote {} entries to {}", csr.nnz(), path.display());
        files_written.push(path);

        // features.tsv.gz
        let path = outdir.join(FEATURES_FILE);
        let gz = tsv::write_features(tsv::create_gz(&path, level)?, var)?;
        tsv::finish_gz(gz)?;
        files_written.push(path);

        // barcodes.tsv.gz
        let path = outdir.join(BARCODES_FILE);
        let gz = tsv::write_barcodes(tsv::create_gz(&path, level)?, data.obs_names())?;
        tsv::finish_gz(gz)?;
        files_written.push(path);

        // meta.tsv
        let path = outdir.join(META_FILE);
        let out = tsv::write_metadata(tsv::create_plain(&path)?, data.obs(), data.obs_names())?;
        flush(out)?;
        files_written.push(path);

        if let Some(path) = write_drc(data, outdir, &config.umap_key, UMAP_FILE)? {
            files_written.push(path);
        }

        if config.include_pca {
            if let Some(path) = write_drc(data, outdir, &config.pca_key, PCA_FILE)? {
                files_written.push(path);
            }
        } else {
            debug!("PCA export disabled, skipping {}", PCA_FILE);
        }

        let mut total_size_bytes = 0;
        for path in &files_written {
            total_size_bytes += fs::metadata(path)?.len();
        }

        let stats = ExportStats {
            output_dir: outdir.to_path_buf(),
            n_obs: data.n_obs(),
            n_features: var.len(),
            nnz: csr.nnz(),
            used_raw,
            files_written,
            total_size_bytes,
        };

        info!("Export completed to {}", outdir.display());
        debug!("{}", stats);
        Ok(stats)
    }
}

/// Export with the default configuration, optionally skipping `pca.drc`
pub fn export<D, P>(data: &D, outdir: P, include_pca: bool) -> Result<ExportStats, ExportError>
where
    D: AnnotatedData + ?Sized,
    P: AsRef<Path>,
{
    let config = ExportConfig::default().with_include_pca(include_pca);
    Exporter::with_config(config).export(data, outdir)
}

fn write_drc<D>(
    data: &D,
    outdir: &Path,
    key: &str,
    file_name: &str,
) -> Result<Option<PathBuf>, ExportError>
where
    D: AnnotatedData + ?Sized,
{
    let embedding: &DenseMatrix = match data.embedding(key) {
        Some(embedding) => embedding,
        None => {
            debug!("No '{}' embedding, skipping {}", key, file_name);
            return Ok(None);
        }
    };

    let path = outdir.join(file_name);
    let out = tsv::write_embedding(tsv::create_plain(&path)?, embedding, data.obs_names())?;
    flush(out)?;
    debug!(
        "Wrote {} coordinates ({} dims) to {}",
        key,
        embedding.n_cols(),
        path.display()
    );
    Ok(Some(path))
}

fn flush<W: Write>(mut writer: W) -> std::io::Result<()> {
    writer.flush()
}
