use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod demo;

pub use config::Config;

/// scexport - export annotated single-cell datasets to Cell Ranger-style folders
#[derive(Parser)]
#[command(name = "scexport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Export settings shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Do not write pca.drc even if a PCA embedding is present
    #[arg(long)]
    pub no_pca: bool,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Gzip level for the compressed files (0-9, default: 9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression_level: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset from TSV files and export it
    Convert {
        /// Dense cells x genes counts TSV (optionally .gz)
        #[arg(value_name = "COUNTS")]
        counts: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTDIR")]
        outdir: PathBuf,

        /// Observation metadata TSV, first column holds the barcodes
        #[arg(long, value_name = "FILE")]
        obs: Option<PathBuf>,

        /// Raw counts TSV; exported instead of COUNTS when given
        #[arg(long, value_name = "FILE")]
        raw_counts: Option<PathBuf>,

        /// UMAP coordinates TSV
        #[arg(long, value_name = "FILE")]
        umap: Option<PathBuf>,

        /// PCA coordinates TSV
        #[arg(long, value_name = "FILE")]
        pca: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Generate a synthetic dataset and export it
    Demo {
        /// Output directory
        #[arg(value_name = "OUTDIR", default_value = "demo_export")]
        outdir: PathBuf,

        /// Number of cells
        #[arg(long, default_value = "500")]
        cells: usize,

        /// Number of genes
        #[arg(long, default_value = "200")]
        genes: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        export: ExportArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            counts,
            outdir,
            obs,
            raw_counts,
            umap,
            pca,
            export,
        } => convert::run(counts, outdir, obs, raw_counts, umap, pca, export),
        Commands::Demo {
            outdir,
            cells,
            genes,
            seed,
            export,
        } => demo::run(outdir, cells, genes, seed, export),
    }
}

impl ExportArgs {
    /// Resolve defaults, then the config file, then explicit flags.
    pub fn resolve(&self) -> Result<scexport::export::ExportConfig> {
        let mut config = scexport::export::ExportConfig::default();
        if let Some(path) = &self.config {
            config = Config::from_file(path)?.apply(config);
        }
        if self.no_pca {
            config = config.with_include_pca(false);
        }
        if let Some(level) = self.compression_level {
            config = config.with_compression_level(level);
        }
        Ok(config)
    }
}

/// Print the completion notice and a short summary
pub fn report(stats: &scexport::export::ExportStats) {
    println!("Export completed to {}", stats.output_dir.display());
    for path in &stats.files_written {
        println!("  {}", path.display());
    }
    println!("{}", stats);
}
