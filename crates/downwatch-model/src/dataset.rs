//! CSV parsing into an in-memory feature table.
//!
//! Uploads are persisted byte-for-byte without inspection; all schema
//! checking happens here, at training time. Columns are located by header
//! name, so column order in the file does not matter.

use csv::ReaderBuilder;
use downwatch_core::{DownwatchError, Result, FEATURE_COLUMNS, LABEL_COLUMN};
use ndarray::{Array1, Array2};
use std::io::Read;
use std::path::Path;

/// The parsed training table: one feature row and one 0/1 label per record.
#[derive(Debug, Clone)]
pub struct DowntimeDataset {
    /// Shape `(n, 2)`, columns in [`FEATURE_COLUMNS`] order.
    pub features: Array2<f64>,
    /// One label per row.
    pub labels: Array1<i32>,
}

impl DowntimeDataset {
    /// Load the dataset from the fixed upload path.
    ///
    /// A missing file means no upload has happened yet and maps to
    /// [`DownwatchError::DatasetNotFound`]; any other I/O failure is
    /// propagated as-is.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DownwatchError::DatasetNotFound)
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_reader(file)
    }

    /// Parse CSV content with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`DownwatchError::Dataset`] when a required column is
    /// missing, a cell fails to parse, a label is not 0/1, or the table
    /// has no data rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DownwatchError::Dataset(format!("Failed to read CSV header: {}", e)))?
            .clone();

        let feature_indices: Vec<usize> = FEATURE_COLUMNS
            .iter()
            .map(|name| column_index(&headers, name))
            .collect::<Result<_>>()?;
        let label_index = column_index(&headers, LABEL_COLUMN)?;

        let mut flat_features = Vec::new();
        let mut labels = Vec::new();

        for (row, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| {
                DownwatchError::Dataset(format!("Failed to read CSV row {}: {}", row + 1, e))
            })?;

            for (&index, name) in feature_indices.iter().zip(FEATURE_COLUMNS.iter()) {
                flat_features.push(parse_numeric_cell(&record, index, name, row)?);
            }
            labels.push(parse_label_cell(&record, label_index, row)?);
        }

        if labels.is_empty() {
            return Err(DownwatchError::Dataset(
                "Dataset contains no data rows".to_string(),
            ));
        }

        let n = labels.len();
        let features = Array2::from_shape_vec((n, FEATURE_COLUMNS.len()), flat_features)
            .map_err(|e| DownwatchError::Dataset(format!("Malformed feature table: {}", e)))?;

        Ok(Self {
            features,
            labels: Array1::from(labels),
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Locate a column by header name.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| DownwatchError::Dataset(format!("Missing required column '{}'", name)))
}

/// Parse a feature cell as `f64`.
fn parse_numeric_cell(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64> {
    let raw = record.get(index).ok_or_else(|| {
        DownwatchError::Dataset(format!("Row {} is missing column '{}'", row + 1, column))
    })?;
    raw.parse::<f64>().map_err(|_| {
        DownwatchError::Dataset(format!(
            "Invalid value '{}' for column '{}' on row {}",
            raw,
            column,
            row + 1
        ))
    })
}

/// Parse a label cell; only 0 and 1 (or their float spellings) are valid.
fn parse_label_cell(record: &csv::StringRecord, index: usize, row: usize) -> Result<i32> {
    let value = parse_numeric_cell(record, index, LABEL_COLUMN, row)?;
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(DownwatchError::Dataset(format!(
            "Label '{}' on row {} is not binary (expected 0 or 1)",
            value,
            row + 1
        )))
    }
}
