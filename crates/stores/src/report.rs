use std::path::Path;

use anyhow::{Context, Error};
use csv::QuoteStyle;
use screening::report::ReportRow;
use tracing::{info, Level};

pub const NA_INDEX: &str = "<NA>";

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all(serialize = "PascalCase"))]
struct ReportRecord {
    group: String,
    clone: String,
    #[serde(rename = "KOs")]
    knockout: String,
    index: String,
    reads: String,
    indels: String,
    #[serde(rename = "%")]
    percentages: String,
    #[serde(rename = "%Total")]
    total: String,
    comment: String,
    emphasis: String,
}

impl From<&ReportRow> for ReportRecord {
    fn from(row: &ReportRow) -> Self {
        let emphasis = match (row.de_emphasized, row.wildtype) {
            (true, _) => "de-emphasized",
            (false, true) => "wildtype",
            (false, false) => "",
        };

        Self {
            group: row.group.clone().unwrap_or_default(),
            clone: row
                .clone_label
                .clone()
                .unwrap_or_default(),
            knockout: row.knockout.clone(),
            index: row
                .index
                .map(|index| index.to_string())
                .unwrap_or_else(|| NA_INDEX.to_string()),
            reads: row
                .reads
                .map(|reads| reads.to_string())
                .unwrap_or_default(),
            indels: row.indels.clone(),
            percentages: row.percentages.clone(),
            total: row
                .total
                .map(|total| total.to_string())
                .unwrap_or_default(),
            comment: row.comment.clone(),
            emphasis: emphasis.to_string(),
        }
    }
}

#[tracing::instrument(level = Level::DEBUG, skip(rows))]
pub fn store_report(path: &Path, rows: &[ReportRow]) -> Result<(), Error> {
    info!("Storing report. path: {}, rows: {}", path.display(), rows.len());

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("Error creating report. file: {}", path.display()))?;

    for row in rows {
        writer.serialize(ReportRecord::from(row))?;

        if row.last_of_group {
            writer.serialize(ReportRecord::default())?;
        }
    }

    writer.flush()?;

    Ok(())
}
