//! Integration tests for scexport
//!
//! These tests drive the full pipeline from TSV ingestion or in-memory
//! datasets to the exported directory, then read the artifacts back.

use flate2::read::GzDecoder;
use scexport::dataset::{ColumnValues, Dataset, FeatureTable, MetadataTable, RawData};
use scexport::export::{export, ExportConfig, ExportError, Exporter};
use scexport::ingest::DatasetLoader;
use scexport::matrix::{csr_from_triplets, DenseMatrix};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tempfile::tempdir;

fn gunzip(path: &Path) -> String {
    let mut out = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut out)
        .unwrap();
    out
}

/// Parse the entries of an exported Matrix Market file
fn mtx_entries(text: &str) -> (usize, usize, usize, Vec<(usize, usize, f64)>) {
    let mut lines = text.lines().filter(|l| !l.starts_with('%'));
    let dims: Vec<usize> = lines
        .next()
        .unwrap()
        .split(' ')
        .map(|v| v.parse().unwrap())
        .collect();
    let entries = lines
        .map(|l| {
            let parts: Vec<&str> = l.split(' ').collect();
            (
                parts[0].parse().unwrap(),
                parts[1].parse().unwrap(),
                parts[2].parse().unwrap(),
            )
        })
        .collect();
    (dims[0], dims[1], dims[2], entries)
}

fn scenario() -> Dataset {
    let x = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]]).unwrap();
    let obs = MetadataTable::new(3)
        .with_column("cluster", ColumnValues::Integer(vec![0, 1, 0]))
        .unwrap();
    Dataset::new(x.into(), FeatureTable::new(["G1", "G2"]), ["AAA", "BBB", "CCC"]).with_obs(obs)
}

/// The small three-cell example end to end
#[test]
fn test_scenario_export() {
    let dir = tempdir().unwrap();
    let outdir = dir.path().join("out");

    let stats = export(&scenario(), &outdir, true).unwrap();
    assert_eq!(stats.files_written.len(), 4);

    let mtx = gunzip(&outdir.join("matrix.mtx.gz"));
    assert!(mtx.starts_with("%%MatrixMarket matrix coordinate real general\n"));
    let (rows, cols, nnz, entries) = mtx_entries(&mtx);
    assert_eq!((rows, cols, nnz), (2, 3, 4));
    assert_eq!(
        entries,
        vec![(1, 1, 1.0), (2, 2, 2.0), (1, 3, 3.0), (2, 3, 3.0)]
    );

    assert_eq!(gunzip(&outdir.join("barcodes.tsv.gz")), "AAA\nBBB\nCCC\n");
    assert_eq!(
        gunzip(&outdir.join("features.tsv.gz")),
        "G1\tG1\tGene Expression\nG2\tG2\tGene Expression\n"
    );
    assert_eq!(
        fs::read_to_string(outdir.join("meta.tsv")).unwrap(),
        "cluster\tbarcode\n0\tAAA\n1\tBBB\n0\tCCC\n"
    );
    assert!(!outdir.join("umap.drc").exists());
    assert!(!outdir.join("pca.drc").exists());
}

/// Every dense value round-trips through the transposed coordinates
#[test]
fn test_matrix_values_round_trip() {
    let dir = tempdir().unwrap();
    let rows = [[0.0, 1.5, 0.0], [2.25, 0.0, -3.0]];
    let x = DenseMatrix::from_rows(&rows).unwrap();
    let dataset = Dataset::new(x.into(), FeatureTable::new(["A", "B", "C"]), ["c1", "c2"]);

    export(&dataset, dir.path(), true).unwrap();

    let (n_features, n_barcodes, nnz, entries) =
        mtx_entries(&gunzip(&dir.path().join("matrix.mtx.gz")));
    assert_eq!((n_features, n_barcodes, nnz), (3, 2, 3));

    let mut rebuilt = [[0.0; 3]; 2];
    for (feature, barcode, value) in entries {
        rebuilt[barcode - 1][feature - 1] = value;
    }
    assert_eq!(rebuilt, rows);
}

#[test]
fn test_raw_pair_exported_with_embeddings() {
    let dir = tempdir().unwrap();
    let raw_x = csr_from_triplets(3, 3, vec![(0, 2, 9.0), (2, 0, 1.0)]).unwrap();
    let dataset = scenario()
        .with_raw(RawData::new(raw_x.into(), FeatureTable::new(["R1", "R2", "R3"])))
        .with_embedding("X_umap", DenseMatrix::zeros(3, 2))
        .with_embedding("X_pca", DenseMatrix::zeros(3, 5));

    let stats = export(&dataset, dir.path(), true).unwrap();
    assert!(stats.used_raw);
    assert_eq!(stats.files_written.len(), 6);

    let (n_features, _, nnz, _) = mtx_entries(&gunzip(&dir.path().join("matrix.mtx.gz")));
    assert_eq!(n_features, 3);
    assert_eq!(nnz, 2);

    let pca = fs::read_to_string(dir.path().join("pca.drc")).unwrap();
    assert_eq!(pca.lines().next(), Some("\t0\t1\t2\t3\t4"));
    assert_eq!(pca.lines().count(), 4);
}

/// Read an exported matrix back with a standard Matrix Market reader
fn read_matrix(path: &Path) -> sprs::TriMat<f32> {
    let mut reader = BufReader::new(GzDecoder::new(File::open(path).unwrap()));
    sprs::io::read_matrix_market_from_bufread(&mut reader).unwrap()
}

#[test]
fn test_exported_matrix_readable_by_sprs() {
    let dir = tempdir().unwrap();
    let stats = export(&scenario(), dir.path(), true).unwrap();

    let counts = read_matrix(&dir.path().join("matrix.mtx.gz"));
    assert_eq!(counts.shape(), (stats.n_features, stats.n_obs));
    assert_eq!(counts.shape(), (2, 3));
    assert_eq!(counts.nnz(), 4);

    let csc = counts.to_csc::<usize>();
    assert_eq!(csc.get(0, 2), Some(&3.0));
    assert_eq!(csc.get(1, 0), None);
}

#[test]
fn test_raw_counts_readable_by_sprs() {
    let dir = tempdir().unwrap();
    let raw_x = csr_from_triplets(3, 4, vec![(0, 3, 2.0), (1, 1, 1.0), (1, 1, 4.0)]).unwrap();
    let dataset = scenario().with_raw(RawData::new(
        raw_x.into(),
        FeatureTable::new(["R1", "R2", "R3", "R4"]),
    ));

    let stats = export(&dataset, dir.path(), false).unwrap();
    assert!(stats.used_raw);

    let counts = read_matrix(&dir.path().join("matrix.mtx.gz"));
    assert_eq!(counts.shape(), (4, 3));
    assert_eq!(counts.nnz(), 2);
    assert_eq!(counts.to_csr::<usize>().get(1, 1), Some(&5.0));
}

#[test]
fn test_custom_config_keys_and_level() {
    let dir = tempdir().unwrap();
    let dataset = scenario()
        .with_embedding("umap_custom", DenseMatrix::zeros(3, 2))
        .with_embedding("X_pca", DenseMatrix::zeros(3, 2));
    let config = ExportConfig::default()
        .with_umap_key("umap_custom")
        .with_include_pca(false)
        .with_compression_level(1);

    let stats = Exporter::with_config(config).export(&dataset, dir.path()).unwrap();
    assert!(dir.path().join("umap.drc").exists());
    assert!(!dir.path().join("pca.drc").exists());
    assert_eq!(stats.files_written.len(), 5);
    assert_eq!(gunzip(&dir.path().join("barcodes.tsv.gz")), "AAA\nBBB\nCCC\n");
}

#[test]
fn test_misaligned_obs_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let outdir = dir.path().join("never");
    let dataset = scenario().with_embedding("X_umap", DenseMatrix::zeros(4, 2));

    let err = export(&dataset, &outdir, false).unwrap_err();
    assert!(matches!(err, ExportError::DatasetError(_)));
    assert!(!outdir.exists());
}

/// TSV inputs on disk through the loader and out again
#[test]
fn test_ingest_then_export() {
    let dir = tempdir().unwrap();
    let counts = dir.path().join("counts.tsv");
    fs::write(&counts, "\tG1\tG2\nAAA\t1\t0\nBBB\t0\t2\nCCC\t3\t3\n").unwrap();
    let obs = dir.path().join("obs.tsv");
    fs::write(
        &obs,
        "\tcell_type\tscore\nAAA\tB cell\t0.5\nBBB\tT cell\t\nCCC\tB cell\t1\n",
    )
    .unwrap();
    let umap = dir.path().join("umap.tsv");
    fs::write(&umap, "\t0\t1\nAAA\t0.5\t1\nBBB\t2\t-1\nCCC\t0\t0.25\n").unwrap();

    let dataset = DatasetLoader::new(&counts)
        .with_obs(&obs)
        .with_embedding("X_umap", &umap)
        .load()
        .unwrap();

    let outdir = dir.path().join("exported");
    let stats = export(&dataset, &outdir, true).unwrap();
    assert_eq!(stats.nnz, 4);

    assert_eq!(
        fs::read_to_string(outdir.join("meta.tsv")).unwrap(),
        "cell_type\tscore\tbarcode\nB cell\t0.5\tAAA\nT cell\t\tBBB\nB cell\t1.0\tCCC\n"
    );
    assert_eq!(
        fs::read_to_string(outdir.join("umap.drc")).unwrap(),
        "\t0\t1\nAAA\t0.5\t1.0\nBBB\t2.0\t-1.0\nCCC\t0.0\t0.25\n"
    );
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn barcodes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("CELL{}", i)).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Header dimensions and entry count match any sparse input
        #[test]
        fn test_header_matches_sparse_input(
            n_obs in 1usize..12,
            n_features in 1usize..12,
            raw in prop::collection::vec((0usize..12, 0usize..12, 1u32..50), 0..40),
        ) {
            let triplets: Vec<(usize, usize, f64)> = raw
                .into_iter()
                .map(|(r, c, v)| (r % n_obs, c % n_features, f64::from(v)))
                .collect();
            let x = csr_from_triplets(n_obs, n_features, triplets).unwrap();
            let expected_nnz = x.nnz();
            let var = FeatureTable::new((0..n_features).map(|g| format!("G{}", g)));
            let dataset = Dataset::new(x.into(), var, barcodes(n_obs));

            let dir = tempdir().unwrap();
            let stats = export(&dataset, dir.path(), true).unwrap();
            prop_assert_eq!(stats.nnz, expected_nnz);

            let (rows, cols, nnz, entries) = mtx_entries(&gunzip(&dir.path().join("matrix.mtx.gz")));
            prop_assert_eq!((rows, cols, nnz), (n_features, n_obs, expected_nnz));
            prop_assert_eq!(entries.len(), expected_nnz);
            for (feature, barcode, _) in entries {
                prop_assert!(feature >= 1 && feature <= n_features);
                prop_assert!(barcode >= 1 && barcode <= n_obs);
            }

            let barcode_lines = gunzip(&dir.path().join("barcodes.tsv.gz")).lines().count();
            prop_assert_eq!(barcode_lines, n_obs);
            let feature_lines = gunzip(&dir.path().join("features.tsv.gz")).lines().count();
            prop_assert_eq!(feature_lines, n_features);
        }

        /// meta.tsv always has one row per observation plus a header
        #[test]
        fn test_meta_row_count(values in prop::collection::vec(-1000i64..1000, 1..30)) {
            let n_obs = values.len();
            let obs = MetadataTable::new(n_obs)
                .with_column("value", ColumnValues::Integer(values))
                .unwrap();
            let dataset = Dataset::new(
                DenseMatrix::zeros(n_obs, 1).into(),
                FeatureTable::new(["G1"]),
                barcodes(n_obs),
            )
            .with_obs(obs);

            let dir = tempdir().unwrap();
            let stats = export(&dataset, dir.path(), true).unwrap();
            prop_assert_eq!(stats.nnz, 0);

            let meta = fs::read_to_string(dir.path().join("meta.tsv")).unwrap();
            prop_assert_eq!(meta.lines().count(), n_obs + 1);
            prop_assert!(meta.lines().skip(1).zip(barcodes(n_obs)).all(|(l, b)| l.ends_with(&b)));
        }
    }
}
