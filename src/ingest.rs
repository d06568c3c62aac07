//! TSV ingestion of annotated datasets.
//!
//! Builds a [`Dataset`] from plain or gzip-compressed tab-separated files:
//!
//! - **counts**: cells x genes. The header row holds an index label followed
//!   by the feature identifiers; each following row holds a barcode followed
//!   by one value per feature. Zeros are not stored.
//! - **obs** (optional): header row with an index label and column names,
//!   one row per barcode in the same order as the counts. Column types are
//!   inferred: integer, then float (empty cells become `NaN`), then boolean
//!   (`True`/`False`), otherwise text.
//! - **embeddings** (optional): header row plus one row per barcode with a
//!   leading barcode column, in counts order.
//! - **raw counts** (optional): same layout as counts, same barcodes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::{debug, info};

use crate::dataset::{
    Column, ColumnValues, Dataset, DatasetError, FeatureTable, MetadataTable, RawData,
};
use crate::matrix::{csr_from_parts, CsrMatrix, DenseMatrix, MatrixError};

/// Errors returned when input files cannot be turned into a dataset
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error opening or reading an input file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed TSV
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A numeric cell could not be parsed
    #[error("invalid value '{value}' in {source_name} at row {row}, column {column}")]
    InvalidValue {
        /// Input being read
        source_name: String,
        /// 1-based data row
        row: usize,
        /// 1-based column
        column: usize,
        /// Raw cell text
        value: String,
    },

    /// A file lists barcodes in a different order or count than the counts file
    #[error("barcode mismatch in {source_name} at row {row}: expected '{expected}', found '{found}'")]
    BarcodeMismatch {
        /// Input being read
        source_name: String,
        /// 1-based data row
        row: usize,
        /// Barcode from the counts file
        expected: String,
        /// Barcode found in this file
        found: String,
    },

    /// Contract violation with a human-readable message
    #[error("ingest contract violation: {0}")]
    ContractViolation(String),

    /// Dataset shape error
    #[error("dataset error: {0}")]
    DatasetError(#[from] DatasetError),

    /// Matrix construction error
    #[error("matrix error: {0}")]
    MatrixError(#[from] MatrixError),
}

impl IngestError {
    fn violation(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}

/// Counts matrix read from a TSV file
#[derive(Debug, Clone)]
pub struct CountsTable {
    /// Barcodes in row order
    pub barcodes: Vec<String>,
    /// Feature identifiers in column order
    pub features: FeatureTable,
    /// Stored nonzero values
    pub matrix: CsrMatrix,
}

/// Builder that loads a [`Dataset`] from TSV files
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    counts: PathBuf,
    obs: Option<PathBuf>,
    raw_counts: Option<PathBuf>,
    embeddings: Vec<(String, PathBuf)>,
}

impl DatasetLoader {
    /// Loader for the given counts file
    pub fn new<P: AsRef<Path>>(counts: P) -> Self {
        Self {
            counts: counts.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Read observation metadata from `path`
    pub fn with_obs<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.obs = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read a raw counts matrix from `path`
    pub fn with_raw_counts<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.raw_counts = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read an embedding stored under `key` from `path`
    pub fn with_embedding<P: AsRef<Path>>(mut self, key: impl Into<String>, path: P) -> Self {
        self.embeddings.push((key.into(), path.as_ref().to_path_buf()));
        self
    }

    /// Read every configured file and assemble the dataset
    pub fn load(&self) -> Result<Dataset, IngestError> {
        info!("Reading counts from {}", self.counts.display());
        let counts = read_counts(open_input(&self.counts)?, &display_name(&self.counts))?;
        debug!(
            "Counts: {} barcodes x {} features, {} nonzero",
            counts.barcodes.len(),
            counts.features.len(),
            counts.matrix.nnz()
        );

        let CountsTable {
            barcodes,
            features,
            matrix,
        } = counts;

        let obs = match &self.obs {
            Some(path) => {
                info!("Reading observation metadata from {}", path.display());
                read_obs(open_input(path)?, &display_name(path), &barcodes)?
            }
            None => MetadataTable::new(barcodes.len()),
        };

        let raw = match &self.raw_counts {
            Some(path) => {
                info!("Reading raw counts from {}", path.display());
                let name = display_name(path);
                let raw = read_counts(open_input(path)?, &name)?;
                check_barcodes(&name, &barcodes, &raw.barcodes)?;
                Some(RawData::new(raw.matrix.into(), raw.features))
            }
            None => None,
        };

        let mut dataset =
            Dataset::new(matrix.into(), features, barcodes.iter().cloned()).with_obs(obs);
        if let Some(raw) = raw {
            dataset = dataset.with_raw(raw);
        }

        for (key, path) in &self.embeddings {
            info!("Reading embedding '{}' from {}", key, path.display());
            let embedding = read_embedding(open_input(path)?, &display_name(path), &barcodes)?;
            dataset = dataset.with_embedding(key.clone(), embedding);
        }

        Ok(dataset)
    }
}

/// Open a file, transparently decompressing `.gz` inputs
pub fn open_input(path: &Path) -> Result<Box<dyn Read>, IngestError> {
    let file = BufReader::new(File::open(path)?);
    let gzipped = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if gzipped {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader)
}

fn parse_number(
    source_name: &str,
    row: usize,
    column: usize,
    value: &str,
) -> Result<f64, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| IngestError::InvalidValue {
        source_name: source_name.to_string(),
        row,
        column,
        value: value.to_string(),
    })
}

/// Read a dense cells x genes counts table
pub fn read_counts<R: Read>(reader: R, source_name: &str) -> Result<CountsTable, IngestError> {
    let mut tsv = tsv_reader(reader);

    let headers = tsv.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestError::violation(format!("{} has no header row", source_name)));
    }
    let features = FeatureTable::new(headers.iter().skip(1));
    let n_features = features.len();

    let mut barcodes = Vec::new();
    let mut indptr = vec![0usize];
    let mut indices = Vec::new();
    let mut data = Vec::new();

    for (i, record) in tsv.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let barcode = record.get(0).unwrap_or_default().to_string();
        for (offset, cell) in record.iter().skip(1).enumerate() {
            let value = parse_number(source_name, row, offset + 2, cell)?;
            if value != 0.0 {
                indices.push(offset);
                data.push(value);
            }
        }
        barcodes.push(barcode);
        indptr.push(indices.len());
    }

    let matrix = csr_from_parts(barcodes.len(), n_features, indptr, indices, data)?;
    Ok(CountsTable {
        barcodes,
        features,
        matrix,
    })
}

/// Read observation metadata aligned to `barcodes`
pub fn read_obs<R: Read>(
    reader: R,
    source_name: &str,
    barcodes: &[String],
) -> Result<MetadataTable, IngestError> {
    let mut tsv = tsv_reader(reader);
    let headers = tsv.headers()?.clone();
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(barcodes.len()); names.len()];
    let mut found = Vec::with_capacity(barcodes.len());
    for record in tsv.records() {
        let record = record?;
        found.push(record.get(0).unwrap_or_default().to_string());
        for (column, cell) in cells.iter_mut().zip(record.iter().skip(1)) {
            column.push(cell.to_string());
        }
    }
    check_barcodes(source_name, barcodes, &found)?;

    let mut table = MetadataTable::new(barcodes.len());
    for (name, values) in names.into_iter().zip(cells) {
        let values = infer_column(values);
        debug!("Column '{}' read as {}", name, values.type_name());
        table.push_column(Column::new(name, values))?;
    }
    Ok(table)
}

/// Read an embedding aligned to `barcodes`
pub fn read_embedding<R: Read>(
    reader: R,
    source_name: &str,
    barcodes: &[String],
) -> Result<DenseMatrix, IngestError> {
    let mut tsv = tsv_reader(reader);
    let n_dims = tsv.headers()?.len().saturating_sub(1);

    let mut found = Vec::with_capacity(barcodes.len());
    let mut data = Vec::with_capacity(barcodes.len() * n_dims);
    for (i, record) in tsv.records().enumerate() {
        let record = record?;
        found.push(record.get(0).unwrap_or_default().to_string());
        for (offset, cell) in record.iter().skip(1).enumerate() {
            data.push(parse_number(source_name, i + 1, offset + 2, cell)?);
        }
    }
    check_barcodes(source_name, barcodes, &found)?;

    Ok(DenseMatrix::new(found.len(), n_dims, data)?)
}

fn check_barcodes(
    source_name: &str,
    expected: &[String],
    found: &[String],
) -> Result<(), IngestError> {
    let mismatch = expected
        .iter()
        .zip(found)
        .enumerate()
        .find(|(_, (e, f))| e != f);
    if let Some((i, (e, f))) = mismatch {
        return Err(IngestError::BarcodeMismatch {
            source_name: source_name.to_string(),
            row: i + 1,
            expected: e.clone(),
            found: f.clone(),
        });
    }
    if expected.len() != found.len() {
        return Err(IngestError::violation(format!(
            "{} lists {} barcodes, expected {}",
            source_name,
            found.len(),
            expected.len()
        )));
    }
    Ok(())
}

/// Pick the narrowest column type that parses every cell
fn infer_column(values: Vec<String>) -> ColumnValues {
    if !values.is_empty() {
        let ints: Result<Vec<i64>, _> = values.iter().map(|v| v.trim().parse::<i64>()).collect();
        if let Ok(ints) = ints {
            return ColumnValues::Integer(ints);
        }
    }
    let floats: Option<Vec<f64>> = values
        .iter()
        .map(|v| {
            let v = v.trim();
            if v.is_empty() {
                Some(f64::NAN)
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();
    if let Some(floats) = floats {
        if values.iter().any(|v| !v.trim().is_empty()) {
            return ColumnValues::Float(floats);
        }
    }
    let bools: Option<Vec<bool>> = values
        .iter()
        .map(|v| match v.trim() {
            "True" | "true" | "TRUE" => Some(true),
            "False" | "false" | "FALSE" => Some(false),
            _ => None,
        })
        .collect();
    if let Some(bools) = bools {
        if !bools.is_empty() {
            return ColumnValues::Boolean(bools);
        }
    }
    ColumnValues::Text(values)
}
