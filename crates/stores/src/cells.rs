use std::path::Path;

use anyhow::{Context, Error};
use calamine::{Data, Range};
use screening::error::InputFormatError;
use screening::table::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileKind {
    Workbook,
    Delimited(u8),
    Json,
}

impl FileKind {
    pub(crate) fn from_path(path: &Path) -> Result<Self, InputFormatError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileKind::Workbook),
            "csv" => Ok(FileKind::Delimited(b',')),
            "tsv" => Ok(FileKind::Delimited(b'\t')),
            "json" => Ok(FileKind::Json),
            _ => Err(InputFormatError::UnsupportedExtension(extension)),
        }
    }
}

pub(crate) fn from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => CellValue::text(value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Numeric looking fields become numbers.
pub(crate) fn from_field(field: &str) -> CellValue {
    match CellValue::text(field) {
        CellValue::Text(text) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => CellValue::Number(value),
            _ => CellValue::Text(text),
        },
        other => other,
    }
}

/// Rows of the range, positioned absolutely so that the first row and column of the sheet are kept.
pub(crate) fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_column)) = range.start() else {
        return vec![];
    };

    let mut rows: Vec<Vec<CellValue>> = vec![vec![]; start_row as usize];
    for row in range.rows() {
        let cells = std::iter::repeat(CellValue::Empty)
            .take(start_column as usize)
            .chain(row.iter().map(from_data))
            .collect();
        rows.push(cells);
    }

    rows
}

pub(crate) fn read_delimited_rows(path: &Path, delimiter: u8) -> Result<Vec<Vec<CellValue>>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Error reading file. file: {}", path.display()))?;

    let mut rows = vec![];
    for result in csv_reader.records() {
        let record = result.with_context(|| format!("Reading record. file: {}", path.display()))?;
        rows.push(
            record
                .iter()
                .map(from_field)
                .collect(),
        );
    }

    Ok(rows)
}
