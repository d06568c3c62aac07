use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use scexport::dataset::{ColumnValues, Dataset, FeatureTable, MetadataTable, RawData};
use scexport::export::Exporter;
use scexport::matrix::{csr_from_triplets, DenseMatrix};

use super::ExportArgs;

const N_CLUSTERS: usize = 4;
const N_PCS: usize = 10;

/// Generate a synthetic dataset and export it
pub fn run(
    outdir: PathBuf,
    cells: usize,
    genes: usize,
    seed: u64,
    export: ExportArgs,
) -> Result<()> {
    if cells == 0 || genes == 0 {
        anyhow::bail!("Demo needs at least one cell and one gene");
    }

    let config = export.resolve()?;

    info!("scexport - Synthetic Dataset Demo");
    info!("=================================");
    info!("Cells: {}, genes: {}, seed: {}", cells, genes, seed);

    let dataset = build_demo_dataset(cells, genes, seed, &config.umap_key, &config.pca_key)
        .context("Failed to build demo dataset")?;

    let stats = Exporter::with_config(config)
        .export(&dataset, &outdir)
        .context("Export failed")?;

    super::report(&stats);
    Ok(())
}

/// Raw integer counts for every gene, a log-normalized dense matrix over the
/// highly expressed half, cluster annotations and UMAP/PCA coordinates.
fn build_demo_dataset(
    cells: usize,
    genes: usize,
    seed: u64,
    umap_key: &str,
    pca_key: &str,
) -> Result<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);

    let barcodes: Vec<String> = (0..cells).map(|i| demo_barcode(&mut rng, i)).collect();
    let gene_ids: Vec<String> = (0..genes).map(|g| format!("ENSG{:011}", g + 1)).collect();
    let clusters: Vec<usize> = (0..cells).map(|_| rng.gen_range(0..N_CLUSTERS)).collect();

    // Each cluster over-expresses its own block of genes
    let mut triplets = Vec::new();
    for (cell, &cluster) in clusters.iter().enumerate() {
        for gene in 0..genes {
            let marker = gene % N_CLUSTERS == cluster;
            let (p, max_count) = if marker { (0.35, 20u32) } else { (0.08, 5u32) };
            if rng.gen_bool(p) {
                let count = rng.gen_range(1..max_count);
                triplets.push((cell, gene, f64::from(count)));
            }
        }
    }
    let raw_counts = csr_from_triplets(cells, genes, triplets)?;

    let totals: Vec<f64> = raw_counts
        .outer_iterator()
        .map(|row| row.data().iter().sum::<f64>())
        .collect();

    // Keep the first half of the genes as the "filtered" primary matrix
    let kept = (genes / 2).max(1);
    let mut normalized = vec![0.0; cells * kept];
    for (&value, (cell, gene)) in raw_counts.iter() {
        if gene < kept && totals[cell] > 0.0 {
            normalized[cell * kept + gene] = (value / totals[cell] * 1e4).ln_1p();
        }
    }
    let x = DenseMatrix::new(cells, kept, normalized)?;

    let n_genes: Vec<i64> = raw_counts
        .outer_iterator()
        .map(|row| row.nnz() as i64)
        .collect();
    let pct_mito: Vec<f64> = (0..cells).map(|_| rng.gen_range(0.0..15.0)).collect();
    let doublet: Vec<bool> = (0..cells).map(|_| rng.gen_bool(0.03)).collect();

    let obs = MetadataTable::new(cells)
        .with_column(
            "leiden",
            ColumnValues::Categorical {
                categories: (0..N_CLUSTERS).map(|c| c.to_string()).collect(),
                codes: clusters.iter().map(|&c| Some(c)).collect(),
            },
        )?
        .with_column("n_genes", ColumnValues::Integer(n_genes))?
        .with_column("total_counts", ColumnValues::Float(totals))?
        .with_column("pct_counts_mt", ColumnValues::Float(pct_mito))?
        .with_column("predicted_doublet", ColumnValues::Boolean(doublet))?;

    let umap = embedding(&mut rng, &clusters, 2, 6.0)?;
    let pca = embedding(&mut rng, &clusters, N_PCS.min(kept), 3.0)?;

    let var = FeatureTable::new(gene_ids[..kept].iter().cloned());
    let dataset = Dataset::new(x.into(), var, barcodes)
        .with_obs(obs)
        .with_raw(RawData::new(raw_counts.into(), FeatureTable::new(gene_ids)))
        .with_embedding(umap_key, umap)
        .with_embedding(pca_key, pca);

    Ok(dataset)
}

fn demo_barcode(rng: &mut StdRng, index: usize) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut barcode: String = (0..16).map(|_| BASES[rng.gen_range(0..4)]).collect();
    // Suffix keeps barcodes unique even if the random part repeats
    barcode.push_str(&format!("-{}", index + 1));
    barcode
}

/// Points scattered around one centroid per cluster
fn embedding(
    rng: &mut StdRng,
    clusters: &[usize],
    dims: usize,
    spread: f64,
) -> Result<DenseMatrix> {
    let centroids: Vec<Vec<f64>> = (0..N_CLUSTERS)
        .map(|_| (0..dims).map(|_| rng.gen_range(-spread..spread) * 2.0).collect())
        .collect();

    let mut data = Vec::with_capacity(clusters.len() * dims);
    for &cluster in clusters {
        for centroid in &centroids[cluster] {
            data.push(*centroid + rng.gen_range(-1.0..1.0));
        }
    }
    Ok(DenseMatrix::new(clusters.len(), dims, data)?)
}
