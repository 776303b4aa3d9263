//! CSV-based row source.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ColumnRef, RawShipmentRow, RowSource, SourceError};

/// Column layout of a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub kind_column: ColumnRef,
    pub milestones_column: ColumnRef,
    /// Whether the first record is a header row.
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            kind_column: ColumnRef::Name("kind".to_string()),
            milestones_column: ColumnRef::Name("milestones".to_string()),
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// A row source that reads shipments from a CSV file.
///
/// Records too short to contain the kind column are skipped. An empty kind
/// cell is reported as `None`, an absent milestones cell as an empty payload.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    description: String,
    options: CsvOptions,
}

impl CsvSource {
    /// Create a new CSV source for the given path.
    pub fn new<P: AsRef<Path>>(path: P, options: CsvOptions) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("csv: {}", path.display());
        Self {
            path,
            description,
            options,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvSource {
    fn read_rows(&mut self) -> Result<Vec<RawShipmentRow>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let rows = read_csv(file, &self.options)?;
        debug!(source = %self.description, rows = rows.len(), "read shipment rows");
        Ok(rows)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Parse CSV data from any reader.
pub(crate) fn read_csv<R: Read>(
    input: R,
    options: &CsvOptions,
) -> Result<Vec<RawShipmentRow>, SourceError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(input);

    let headers = if options.has_headers {
        Some(reader.headers()?.clone())
    } else {
        None
    };
    let kind_idx = resolve_column(&options.kind_column, headers.as_ref())?;
    let milestones_idx = resolve_column(&options.milestones_column, headers.as_ref())?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;

        let Some(kind) = record.get(kind_idx) else {
            skipped += 1;
            continue;
        };
        let kind = (!kind.trim().is_empty()).then(|| kind.to_string());
        let milestones = record.get(milestones_idx).unwrap_or_default();

        rows.push(RawShipmentRow::new(kind, milestones));
    }

    if skipped > 0 {
        debug!(skipped, "skipped records without a kind column");
    }

    Ok(rows)
}

fn resolve_column(
    column: &ColumnRef,
    headers: Option<&::csv::StringRecord>,
) -> Result<usize, SourceError> {
    match (column, headers) {
        (ColumnRef::Index(index), _) => Ok(*index),
        (ColumnRef::Name(name), Some(headers)) => headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SourceError::MissingColumn(column.to_string())),
        (ColumnRef::Name(_), None) => Err(SourceError::MissingColumn(format!(
            "{} (named columns need a header row)",
            column
        ))),
    }
}
