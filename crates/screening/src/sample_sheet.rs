use indexmap::IndexMap;

use crate::grid::Rectangle;

pub const KNOCKOUT_HEADER: &str = "knockout";
pub const ID_HEADER: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Split {
    /// Set when the member columns of the group have differing numbers of clones.
    pub auto: bool,
    pub user: bool,
}

impl Split {
    pub fn is_split(&self) -> bool {
        self.auto || self.user
    }
}

/// A knockout column of the sample sheet.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Column {
    /// 1-based position in the table.
    pub index: usize,
    pub headers: IndexMap<String, String>,
    /// One slot per row of the located rectangle, `None` where no clone occupies the row.
    pub cell_labels: Vec<Option<String>>,
    pub group: String,
    pub split: Split,
}

impl Column {
    pub fn knockout(&self) -> &str {
        self.headers
            .get(KNOCKOUT_HEADER)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_split(&self) -> bool {
        self.split.is_split()
    }

    pub fn occupied_count(&self) -> usize {
        self.cell_labels
            .iter()
            .filter(|label| label.is_some())
            .count()
    }

    /// The group name shown to users, split groups are qualified by the knockout name.
    pub fn display_group(&self) -> String {
        let knockout = self.knockout();
        if self.is_split() && self.group != knockout {
            format!("{} ({})", knockout, self.group)
        } else {
            self.group.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampleSheet {
    /// Header keys above the knockout cells, the most specific key is last.
    pub headers: Vec<String>,
    pub rectangle: Rectangle,
    pub columns: Vec<Column>,
    pub group_by: String,
}

impl SampleSheet {
    pub fn has_key(&self, key: &str) -> bool {
        key == ID_HEADER
            || self
                .headers
                .iter()
                .any(|header| header == key)
    }
}
