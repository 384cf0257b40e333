use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::debug;
use util::label::clone_label;

use crate::error::LookupError;
use crate::sample_sheet::{Column, SampleSheet};

/// Assigns every column to the group named by its `key` header and relabels the clones.
///
/// A group whose member columns hold more than one distinct, non-zero number of clones is
/// automatically split. Split columns label clones by row number, other columns use clone labels.
pub fn group_by(sheet: &SampleSheet, key: &str) -> Result<SampleSheet, LookupError> {
    if !sheet.has_key(key) {
        return Err(LookupError::UnknownKey(key.to_string()));
    }

    let mut sheet = sheet.clone();
    sheet.group_by = key.to_string();

    let mut counts: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for column in sheet.columns.iter_mut() {
        column.group = column
            .headers
            .get(key)
            .cloned()
            .unwrap_or_default();

        counts
            .entry(column.group.clone())
            .or_default()
            .insert(column.occupied_count());
    }

    for column in sheet.columns.iter_mut() {
        let distinct = counts
            .get(&column.group)
            .map(|counts| counts.iter().filter(|count| **count != 0).count())
            .unwrap_or(0);

        column.split.auto = distinct > 1;
        column.cell_labels = relabel(&column.cell_labels, column.is_split());
    }

    debug!("Grouped sample sheet. key: {}, groups: {:?}", key, counts.keys());

    Ok(sheet)
}

fn relabel(cell_labels: &[Option<String>], is_split: bool) -> Vec<Option<String>> {
    let mut rank = 0;
    cell_labels
        .iter()
        .enumerate()
        .map(|(row, label)| {
            label.as_ref().map(|_| {
                let label = match is_split {
                    true => (row + 1).to_string(),
                    false => clone_label(rank),
                };
                rank += 1;
                label
            })
        })
        .collect()
}

/// Sets the user split flag on every column of the group, the clones of the group are relabelled.
pub fn set_user_split(sheet: &SampleSheet, group: &str, value: bool) -> Result<SampleSheet, LookupError> {
    if !sheet
        .columns
        .iter()
        .any(|column| column.group == group)
    {
        return Err(LookupError::UnknownGroup(group.to_string()));
    }

    let mut sheet = sheet.clone();
    for column in sheet
        .columns
        .iter_mut()
        .filter(|column| column.group == group)
    {
        column.split.user = value;
        column.cell_labels = relabel(&column.cell_labels, column.is_split());
    }

    Ok(sheet)
}

/// The display groups in column order, with their split state.
pub fn list_groups(sheet: &SampleSheet) -> Vec<(String, bool)> {
    sheet
        .columns
        .iter()
        .map(|column| (column.display_group(), column.is_split()))
        .unique_by(|(label, _)| label.clone())
        .collect()
}

pub fn group_columns<'a>(sheet: &'a SampleSheet, label: &str) -> Vec<&'a Column> {
    sheet
        .columns
        .iter()
        .filter(|column| column.display_group() == label)
        .collect()
}

/// Sorted, distinct knockout names.
pub fn knockout_names(sheet: &SampleSheet) -> Vec<String> {
    sheet
        .columns
        .iter()
        .map(|column| column.knockout().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn column_for_knockout<'a>(sheet: &'a SampleSheet, knockout: &str) -> Option<&'a [Option<String>]> {
    sheet
        .columns
        .iter()
        .find(|column| column.knockout() == knockout)
        .map(|column| column.cell_labels.as_slice())
}

#[cfg(test)]
pub(crate) mod test {
    use indexmap::IndexMap;

    use crate::grid::Rectangle;
    use crate::sample_sheet::{Column, SampleSheet, Split, ID_HEADER, KNOCKOUT_HEADER};

    /// Builds an ungrouped sheet from `(amplicon, knockout, cells)`, where cells is a pattern like `X.X`.
    pub fn build_sheet(columns: &[(&str, &str, &str)]) -> SampleSheet {
        let height = columns
            .iter()
            .map(|(_, _, cells)| cells.len())
            .max()
            .unwrap_or(0);

        let columns: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(offset, (amplicon, knockout, cells))| {
                let headers = IndexMap::from([
                    ("amplicon".to_string(), amplicon.to_string()),
                    (KNOCKOUT_HEADER.to_string(), knockout.to_string()),
                    (ID_HEADER.to_string(), format!("[{}] {}", offset + 2, knockout)),
                ]);
                Column {
                    index: offset + 2,
                    headers,
                    cell_labels: cells
                        .chars()
                        .map(|cell| (cell == 'X').then(|| "X".to_string()))
                        .collect(),
                    group: String::new(),
                    split: Split::default(),
                }
            })
            .collect();

        let width = columns.len();

        SampleSheet {
            headers: vec!["amplicon".to_string(), KNOCKOUT_HEADER.to_string()],
            rectangle: Rectangle {
                top: 2,
                left: 1,
                bottom: 2 + height,
                right: 1 + width,
            },
            columns,
            group_by: "amplicon".to_string(),
        }
    }
}
