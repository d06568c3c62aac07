use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use scexport::export::Exporter;
use scexport::ingest::DatasetLoader;

use super::ExportArgs;

/// Load TSV inputs and export them
pub fn run(
    counts: PathBuf,
    outdir: PathBuf,
    obs: Option<PathBuf>,
    raw_counts: Option<PathBuf>,
    umap: Option<PathBuf>,
    pca: Option<PathBuf>,
    export: ExportArgs,
) -> Result<()> {
    if !counts.exists() {
        anyhow::bail!("Counts file does not exist: {}", counts.display());
    }

    let config = export.resolve()?;

    info!("scexport - TSV to Cell Ranger folder");
    info!("====================================");
    info!("Counts: {}", counts.display());
    info!("Output: {}", outdir.display());
    info!("Compression level: {}", config.compression_level);
    info!("Include PCA: {}", config.include_pca);

    let mut loader = DatasetLoader::new(&counts);
    if let Some(path) = &obs {
        loader = loader.with_obs(path);
    }
    if let Some(path) = &raw_counts {
        loader = loader.with_raw_counts(path);
    }
    if let Some(path) = &umap {
        loader = loader.with_embedding(config.umap_key.clone(), path);
    }
    if let Some(path) = &pca {
        loader = loader.with_embedding(config.pca_key.clone(), path);
    }

    let dataset = loader.load().context("Failed to load input files")?;

    let stats = Exporter::with_config(config)
        .export(&dataset, &outdir)
        .context("Export failed")?;

    super::report(&stats);
    Ok(())
}
