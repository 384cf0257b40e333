use std::path::Path;

use anyhow::{anyhow, Context, Error};
use calamine::{open_workbook_auto, Reader};
use screening::error::InputFormatError;
use screening::table::Table;
use tracing::{info, trace, Level};

use crate::cells::{range_to_rows, read_delimited_rows, FileKind};

/// Reads the first worksheet of a workbook, or a csv/tsv file, as a table.
#[tracing::instrument(level = Level::DEBUG)]
pub fn load_table(path: &Path) -> Result<Table, Error> {
    info!("Loading table. path: {}", path.display());

    let rows = match FileKind::from_path(path)? {
        FileKind::Workbook => {
            let mut workbook =
                open_workbook_auto(path).with_context(|| format!("Error opening workbook. file: {}", path.display()))?;

            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(|| anyhow!("Workbook has no worksheets. file: {}", path.display()))?
                .with_context(|| format!("Error reading worksheet. file: {}", path.display()))?;

            range_to_rows(&range)
        }
        FileKind::Delimited(delimiter) => read_delimited_rows(path, delimiter)?,
        FileKind::Json => {
            return Err(InputFormatError::UnsupportedExtension("json".to_string()).into());
        }
    };

    let table = Table::from_rows(rows);
    trace!("Loaded table. width: {}, height: {}", table.width(), table.height());

    Ok(table)
}
