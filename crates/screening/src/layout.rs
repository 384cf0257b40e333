use indexmap::IndexMap;
use tracing::{debug, info, Level};
use util::label::column_label;

use crate::error::LayoutError;
use crate::grid::{locate, Rectangle};
use crate::grouping::group_by;
use crate::sample_sheet::{Column, SampleSheet, Split, ID_HEADER, KNOCKOUT_HEADER};
use crate::table::Table;

/// Names of the header rows directly above the knockout cells, from the top down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    header_keys: Vec<String>,
}

impl LayoutConfig {
    pub fn new(header_keys: Vec<String>) -> Result<Self, LayoutError> {
        match header_keys.last() {
            Some(last) if last == KNOCKOUT_HEADER => Ok(Self {
                header_keys,
            }),
            _ => Err(LayoutError::InvalidHeaderKeys(header_keys)),
        }
    }

    pub fn header_keys(&self) -> &[String] {
        &self.header_keys
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_keys: ["extraction", "amplicon", KNOCKOUT_HEADER]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Locates the knockout cells in the table and assembles the sample sheet around them.
#[tracing::instrument(level = Level::DEBUG, skip(table))]
pub fn build_sample_sheet(table: &Table, config: &LayoutConfig) -> Result<SampleSheet, LayoutError> {
    let rectangle = locate(table)?;
    let sheet = assemble(table, rectangle, config)?;

    info!(
        "Assembled sample sheet. columns: {}, rows: {}, group_by: {}",
        sheet.columns.len(),
        rectangle.height(),
        sheet.group_by
    );

    Ok(sheet)
}

pub fn assemble(table: &Table, rectangle: Rectangle, config: &LayoutConfig) -> Result<SampleSheet, LayoutError> {
    let keys = config.header_keys();
    if rectangle.top < keys.len() {
        return Err(LayoutError::InsufficientHeaderRows {
            top: rectangle.top,
            required: keys.len(),
        });
    }

    let header_top = rectangle.top - keys.len();

    let mut columns: Vec<Column> = Vec::with_capacity(rectangle.width());
    for table_column in rectangle.left..rectangle.right {
        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (offset, key) in keys.iter().enumerate() {
            let mut value = table
                .cell(header_top + offset, table_column)
                .to_string();

            if value.is_empty() {
                if let Some(previous) = columns.last() {
                    // groupings propagate left to right
                    value = previous
                        .headers
                        .get(key)
                        .cloned()
                        .unwrap_or_default();
                }
            }

            headers.insert(key.clone(), value);
        }

        let index = table_column + 1;
        let id = format!(
            "[{}] {}",
            column_label(index),
            headers
                .get(KNOCKOUT_HEADER)
                .map(String::as_str)
                .unwrap_or_default()
        );
        headers.insert(ID_HEADER.to_string(), id);

        let cell_labels = (rectangle.top..rectangle.bottom)
            .map(|row| {
                table
                    .cell(row, table_column)
                    .is_truthy()
                    .then(|| (row - rectangle.top + 1).to_string())
            })
            .collect();

        let column = Column {
            index,
            headers,
            cell_labels,
            group: String::new(),
            split: Split::default(),
        };
        debug!("Assembled column. index: {}, headers: {:?}", column.index, column.headers);

        columns.push(column);
    }

    let sheet = SampleSheet {
        headers: keys.to_vec(),
        rectangle,
        columns,
        group_by: keys[0].clone(),
    };

    // grouping by a configured key cannot fail
    group_by(&sheet, &keys[0]).map_err(|_| LayoutError::InvalidHeaderKeys(keys.to_vec()))
}

#[cfg(test)]
mod layout_tests {
    use crate::table::CellValue;

    use super::*;

    fn n(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn t(value: &str) -> CellValue {
        CellValue::text(value)
    }

    const E: CellValue = CellValue::Empty;

    fn pooling_table() -> Table {
        Table::from_rows(vec![
            vec![t("Pool"), t("EX1"), E, E, t("EX2")],
            vec![E, t("AMP1"), E, t("AMP2"), E],
            vec![E, t("KO1"), t("KO2"), t("KO3"), n(42.0)],
            vec![t("plate"), n(1.0), n(1.0), n(0.0), n(1.0)],
            vec![E, n(0.0), n(1.0), n(1.0), n(1.0)],
            vec![E, n(1.0), n(0.0), n(1.0), n(0.0)],
        ])
    }

    #[test]
    fn builds_sample_sheet() {
        // given
        let table = pooling_table();

        // when
        let sheet = build_sample_sheet(&table, &LayoutConfig::default()).unwrap();

        // then
        assert_eq!(
            sheet.rectangle,
            Rectangle {
                top: 3,
                left: 1,
                bottom: 6,
                right: 5
            }
        );
        assert_eq!(sheet.headers, vec!["extraction", "amplicon", "knockout"]);
        assert_eq!(sheet.group_by, "extraction");
        assert_eq!(sheet.columns.len(), 4);

        // and headers propagate left to right
        let amplicons: Vec<&str> = sheet
            .columns
            .iter()
            .map(|column| column.headers["amplicon"].as_str())
            .collect();
        assert_eq!(amplicons, vec!["AMP1", "AMP1", "AMP2", "AMP2"]);

        let extractions: Vec<&str> = sheet
            .columns
            .iter()
            .map(|column| column.headers["extraction"].as_str())
            .collect();
        assert_eq!(extractions, vec!["EX1", "EX1", "EX1", "EX2"]);

        // and
        assert_eq!(sheet.columns[0].index, 2);
        assert_eq!(sheet.columns[0].headers["id"], "[B] KO1");
        assert_eq!(sheet.columns[3].headers["knockout"], "42");
        assert_eq!(sheet.columns[3].headers["id"], "[E] 42");
    }

    #[test]
    fn cell_labels_cover_every_row() {
        // given
        let table = pooling_table();

        // when
        let sheet = build_sample_sheet(&table, &LayoutConfig::default()).unwrap();

        // then
        for column in &sheet.columns {
            assert_eq!(column.cell_labels.len(), sheet.rectangle.height());
        }
        // EX1 holds columns with 2, 2 and 2 clones
        assert!(!sheet.columns[0].split.auto);
        assert_eq!(
            sheet.columns[0].cell_labels,
            vec![Some("A1".to_string()), None, Some("A2".to_string())]
        );
    }

    #[test]
    fn first_column_keeps_blank_headers() {
        // given
        let table = Table::from_rows(vec![
            vec![E, t("EX2")],
            vec![E, t("AMP2")],
            vec![t("KO1"), t("KO2")],
            vec![n(1.0), n(1.0)],
        ]);

        // when
        let sheet = build_sample_sheet(&table, &LayoutConfig::default()).unwrap();

        // then
        assert_eq!(sheet.columns[0].headers["extraction"], "");
        assert_eq!(sheet.columns[1].headers["extraction"], "EX2");
    }

    #[test]
    fn insufficient_header_rows() {
        // given
        let table = Table::from_rows(vec![vec![t("KO1")], vec![n(1.0)]]);

        // expect
        assert_eq!(
            build_sample_sheet(&table, &LayoutConfig::default()),
            Err(LayoutError::InsufficientHeaderRows {
                top: 1,
                required: 3
            })
        );
    }

    #[test]
    fn custom_header_keys() {
        // given
        let table = Table::from_rows(vec![vec![t("KO1")], vec![n(1.0)]]);
        let config = LayoutConfig::new(vec!["knockout".to_string()]).unwrap();

        // when
        let sheet = build_sample_sheet(&table, &config).unwrap();

        // then
        assert_eq!(sheet.group_by, "knockout");
        assert_eq!(sheet.columns[0].group, "KO1");
        assert_eq!(sheet.columns[0].headers["id"], "[A] KO1");
    }

    #[test]
    fn header_keys_must_end_with_knockout() {
        assert_eq!(
            LayoutConfig::new(vec!["knockout".to_string(), "amplicon".to_string()]),
            Err(LayoutError::InvalidHeaderKeys(vec![
                "knockout".to_string(),
                "amplicon".to_string()
            ]))
        );
        assert!(LayoutConfig::new(vec![]).is_err());
    }
}
