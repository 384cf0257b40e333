use std::collections::BTreeMap;

use tracing::trace;
use util::label::label_to_key;

use crate::error::LookupError;
use crate::grouping::group_columns;
use crate::mapping::KoMapping;
use crate::sample_sheet::SampleSheet;
use crate::sequencing::{SequencingOutput, SequencingResult, WellIndex};

/// A clone of a group, with the sequencing result of each of its knockouts.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneRecord {
    pub label: String,
    pub comment: Option<String>,
    /// `None` when the knockout is unmapped or has no result for the well.
    pub knockouts: BTreeMap<String, Option<SequencingResult>>,
}

impl CloneRecord {
    pub fn is_picked(&self) -> bool {
        self.knockouts
            .values()
            .flatten()
            .any(|result| result.picked)
    }
}

/// Collects the clones of the display group, ordered by label (`A1`, `A2`, .., `A12`, `B1`).
pub fn aggregate(
    sheet: &SampleSheet,
    group: &str,
    mapping: &KoMapping,
    output: &SequencingOutput,
) -> Result<Vec<CloneRecord>, LookupError> {
    let columns = group_columns(sheet, group);
    if columns.is_empty() {
        return Err(LookupError::UnknownGroup(group.to_string()));
    }

    let mut clones: BTreeMap<String, CloneRecord> = BTreeMap::new();

    for column in columns {
        let knockout = column.knockout();
        let target = mapping
            .get(knockout)
            .cloned()
            .flatten();

        for (position, label) in column.cell_labels.iter().enumerate() {
            let Some(label) = label else {
                continue;
            };

            let result = target.as_deref().and_then(|target| {
                WellIndex::try_from(position + 1)
                    .ok()
                    .and_then(|index| output.result(target, index))
                    .cloned()
            });
            trace!(
                "Clone result. label: {}, knockout: {}, found: {}",
                label,
                knockout,
                result.is_some()
            );

            clones
                .entry(label.clone())
                .or_insert_with(|| CloneRecord {
                    label: label.clone(),
                    comment: None,
                    knockouts: BTreeMap::new(),
                })
                .knockouts
                .insert(knockout.to_string(), result);
        }
    }

    let mut clones: Vec<CloneRecord> = clones.into_values().collect();
    clones.sort_by_cached_key(|clone| label_to_key(&clone.label).ok());

    Ok(clones)
}
