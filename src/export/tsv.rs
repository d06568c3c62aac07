//! Tab-separated writers for the feature, barcode, metadata and embedding
//! artifacts.
//!
//! Cell values use the text conventions downstream readers of this layout
//! expect. Integral floats keep one decimal (`1.0`), exponents carry a sign
//! and at least two digits (`1e-05`, `1e+16`) and missing values are empty
//! fields. Booleans are `True`/`False`. Only fields containing a tab,
//! quote or line break are quoted.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use log::warn;

use crate::dataset::{ColumnValues, FeatureTable, MetadataTable};
use crate::matrix::DenseMatrix;

use super::error::ExportError;
use super::layout::{BARCODE_COLUMN, FEATURE_TYPE};

/// Buffered gzip stream over a newly created (or truncated) file
pub(crate) type GzFile = GzEncoder<BufWriter<File>>;

/// Create `path` and wrap it in a gzip encoder
pub(crate) fn create_gz(path: &Path, level: Compression) -> std::io::Result<GzFile> {
    let file = File::create(path)?;
    Ok(GzEncoder::new(BufWriter::new(file), level))
}

/// Write the gzip trailer and flush the file
pub(crate) fn finish_gz(encoder: GzFile) -> std::io::Result<()> {
    let mut inner = encoder.finish()?;
    inner.flush()
}

/// Create `path` for plain buffered writing
pub(crate) fn create_plain(path: &Path) -> std::io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn tsv_writer<W: Write>(writer: W, has_headers: bool) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer)
}

fn into_inner<W: Write>(writer: csv::Writer<W>) -> Result<W, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))
}

/// Format a float the way the metadata tables expect
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        // Debug keeps the trailing ".0" on integral values
        let text = format!("{:?}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        }
    }
}

/// Render the cell at `row` of a metadata column
pub fn cell_text(values: &ColumnValues, row: usize) -> Cow<'_, str> {
    match values {
        ColumnValues::Integer(v) => Cow::Owned(v[row].to_string()),
        ColumnValues::Float(v) => Cow::Owned(format_float(v[row])),
        ColumnValues::Text(v) => Cow::Borrowed(v[row].as_str()),
        ColumnValues::Boolean(v) => Cow::Borrowed(if v[row] { "True" } else { "False" }),
        ColumnValues::Categorical { categories, codes } => match codes[row] {
            Some(code) => Cow::Borrowed(categories[code].as_str()),
            None => Cow::Borrowed(""),
        },
    }
}

/// Feature table: `id<TAB>id<TAB>Gene Expression`, no header
pub fn write_features<W: Write>(writer: W, var: &FeatureTable) -> Result<W, ExportError> {
    let mut tsv = tsv_writer(writer, false);
    for id in var.ids() {
        tsv.write_record([id.as_str(), id.as_str(), FEATURE_TYPE])?;
    }
    into_inner(tsv)
}

/// One barcode per line, no header
pub fn write_barcodes<W: Write>(mut writer: W, obs_names: &[String]) -> Result<W, ExportError> {
    for barcode in obs_names {
        writeln!(writer, "{}", barcode)?;
    }
    Ok(writer)
}

/// Observation metadata with the barcodes as the last column.
///
/// An existing `barcode` column is overwritten in place rather than
/// duplicated.
pub fn write_metadata<W: Write>(
    writer: W,
    obs: &MetadataTable,
    obs_names: &[String],
) -> Result<W, ExportError> {
    let barcode_position = obs.column_names().position(|name| name == BARCODE_COLUMN);
    if barcode_position.is_some() {
        warn!(
            "Observation metadata already has a '{}' column; replacing its values with the observation identifiers",
            BARCODE_COLUMN
        );
    }

    let mut tsv = tsv_writer(writer, true);

    let mut header: Vec<&str> = obs.column_names().collect();
    if barcode_position.is_none() {
        header.push(BARCODE_COLUMN);
    }
    tsv.write_record(&header)?;

    let mut record: Vec<Cow<'_, str>> = Vec::with_capacity(header.len());
    for (row, barcode) in obs_names.iter().enumerate() {
        record.clear();
        for (position, column) in obs.columns().iter().enumerate() {
            if Some(position) == barcode_position {
                record.push(Cow::Borrowed(barcode.as_str()));
            } else {
                record.push(cell_text(&column.values, row));
            }
        }
        if barcode_position.is_none() {
            record.push(Cow::Borrowed(barcode.as_str()));
        }
        tsv.write_record(record.iter().map(|c| c.as_bytes()))?;
    }

    into_inner(tsv)
}

/// Embedding coordinates with a leading barcode index column.
///
/// The header row has an empty index label followed by the dimension
/// numbers `0..k`.
pub fn write_embedding<W: Write>(
    writer: W,
    embedding: &DenseMatrix,
    obs_names: &[String],
) -> Result<W, ExportError> {
    let mut tsv = tsv_writer(writer, true);

    let header: Vec<String> = std::iter::once(String::new())
        .chain((0..embedding.n_cols()).map(|d| d.to_string()))
        .collect();
    tsv.write_record(&header)?;

    for (barcode, coords) in obs_names.iter().zip(embedding.rows()) {
        let mut record = Vec::with_capacity(coords.len() + 1);
        record.push(barcode.clone());
        record.extend(coords.iter().map(|v| format_float(*v)));
        tsv.write_record(&record)?;
    }

    into_inner(tsv)
}
