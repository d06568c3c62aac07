//! # scexport
//!
//! Command-line front end for exporting annotated single-cell datasets to
//! Cell Ranger-style folders.
//!
//! ## Usage
//!
//! ```bash
//! # Export a dataset described by TSV files
//! scexport convert counts.tsv.gz exported/ --obs obs.tsv --umap umap.tsv --pca pca.tsv
//!
//! # Generate and export a synthetic dataset
//! scexport demo demo_export/ --cells 1000 --genes 500
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
