use std::fmt::{Display, Formatter};

use util::text::{format_number, strip_cell};

/// A raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Builds a text cell, the value is stripped and an empty result becomes [`CellValue::Empty`].
    pub fn text(value: &str) -> Self {
        match strip_cell(value) {
            "" => CellValue::Empty,
            stripped => CellValue::Text(stripped.to_string()),
        }
    }

    /// Only the numbers `0` and `1` are indicators, booleans are not.
    pub fn is_indicator(&self) -> bool {
        matches!(self, CellValue::Number(value) if *value == 0.0 || *value == 1.0)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(value) => *value != 0.0,
            CellValue::Text(value) => !value.is_empty(),
            CellValue::Bool(value) => *value,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.is_empty(),
            _ => false,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) => write!(f, "{}", format_number(*value)),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// A column-major table of cells, columns may have different lengths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
        }
    }

    /// Builds a table from row-major data, trailing empty cells are not stored.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0);

        let mut columns: Vec<Vec<CellValue>> = vec![vec![]; width];
        for (row_index, row) in rows.into_iter().enumerate() {
            for (column_index, cell) in row.into_iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let column = &mut columns[column_index];
                column.resize(row_index, CellValue::Empty);
                column.push(cell);
            }
        }

        Self::new(columns)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    pub fn columns(&self) -> &[Vec<CellValue>] {
        &self.columns
    }

    /// Cells outside the table are [`CellValue::Empty`].
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.columns
            .get(column)
            .and_then(|cells| cells.get(row))
            .unwrap_or(&EMPTY)
    }
}
