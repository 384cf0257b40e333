use itertools::Itertools;
use tracing::{debug, info};

use crate::error::LookupError;
use crate::project::ProjectState;
use crate::sequencing::WellIndex;

pub const NO_DATA_COMMENT: &str = "Insufficient data";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Include clones without a picked result in groups that are not split.
    pub everything: bool,
}

/// One knockout of one clone.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Only set on the first row of a clone.
    pub group: Option<String>,
    /// Only set on the first row of a clone.
    pub clone_label: Option<String>,
    pub knockout: String,
    /// `None` when the knockout has no data.
    pub index: Option<WellIndex>,
    pub reads: Option<u64>,
    /// Signed indels, e.g. `-1 / +3`.
    pub indels: String,
    /// Percentages of the indels, e.g. `60 / 25`.
    pub percentages: String,
    pub total: Option<i64>,
    pub comment: String,
    /// Rows without data, or not picked in a group that is not split.
    pub de_emphasized: bool,
    /// Picked rows commented as wild type.
    pub wildtype: bool,
    /// Last row of a group, followed by a blank row in exports.
    pub last_of_group: bool,
}

pub fn build_report(state: &ProjectState, config: &ReportConfig) -> Result<Vec<ReportRow>, LookupError> {
    let mut rows: Vec<ReportRow> = vec![];

    for (group, is_split) in state.clones_groups() {
        let mut clones = state.clones_get_group(&group)?;
        if !(is_split || config.everything) {
            clones.retain(|clone| clone.is_picked());
        }

        if clones.is_empty() {
            debug!("Skipping group without clones. group: {}", group);
            continue;
        }

        for clone in clones {
            let mut first_clone_row = true;
            for (knockout, result) in clone.knockouts {
                let group_label = first_clone_row.then(|| group.clone());
                let clone_label = first_clone_row.then(|| clone.label.clone());
                first_clone_row = false;

                let row = match result {
                    Some(result) => {
                        let indels = result
                            .peaks
                            .iter()
                            .map(|peak| format!("{:+}", peak.indel))
                            .join(" / ");
                        let percentages = result
                            .peaks
                            .iter()
                            .map(|peak| format!("{}", (peak.pct * 100.0) as i64))
                            .join(" / ");
                        let total: f64 = result
                            .peaks
                            .iter()
                            .map(|peak| peak.pct * 100.0)
                            .sum();

                        let de_emphasized = !(is_split || result.picked);
                        let wildtype = !de_emphasized && is_wildtype(&result.comment);

                        ReportRow {
                            group: group_label,
                            clone_label,
                            knockout,
                            index: Some(result.index),
                            reads: Some(result.reads),
                            indels,
                            percentages,
                            total: Some(total as i64),
                            comment: result.comment,
                            de_emphasized,
                            wildtype,
                            last_of_group: false,
                        }
                    }
                    None => ReportRow {
                        group: group_label,
                        clone_label,
                        knockout,
                        index: None,
                        reads: None,
                        indels: String::new(),
                        percentages: String::new(),
                        total: None,
                        comment: NO_DATA_COMMENT.to_string(),
                        de_emphasized: true,
                        wildtype: false,
                        last_of_group: false,
                    },
                };

                rows.push(row);
            }
        }

        if let Some(last) = rows.last_mut() {
            last.last_of_group = true;
        }
    }

    info!("Built report. rows: {}, everything: {}", rows.len(), config.everything);

    Ok(rows)
}

fn is_wildtype(comment: &str) -> bool {
    let comment = comment.to_lowercase();
    comment == "wt" || comment == "wildtype"
}
