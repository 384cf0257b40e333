use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Error};
use calamine::{open_workbook_auto, Reader};
use regex::Regex;
use screening::error::InputFormatError;
use screening::sequencing::{Peak, SequencingOutput, SequencingResult, WellIndex};
use screening::table::CellValue;
use tracing::{debug, info, trace, Level};

use crate::cells::{range_to_rows, read_delimited_rows, FileKind};

static PEAK_COLUMN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^peak([0-9]+)$").unwrap());
static PEAK_INDEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([-+]?[0-9]+)( \(inframe\))?").unwrap());

const TARGET_COLUMN: &str = "Target";
const INDEX_COLUMN: &str = "Index/Well";
const READS_COLUMN: &str = "Reads";
const WT_COLUMN: &str = "WT";
const INDEL_COLUMN: &str = "Indel";

/// Loads sequencing output, structured JSON or tabular data from a workbook or csv/tsv file.
#[tracing::instrument(level = Level::DEBUG)]
pub fn load_sequencing_output(path: &Path) -> Result<SequencingOutput, Error> {
    info!("Loading sequencing output. path: {}", path.display());

    let mut output = SequencingOutput::default();

    let results = match FileKind::from_path(path)? {
        FileKind::Json => load_json(path)?,
        FileKind::Workbook => {
            let mut workbook =
                open_workbook_auto(path).with_context(|| format!("Error opening workbook. file: {}", path.display()))?;

            let mut results = vec![];
            for (name, range) in workbook.worksheets() {
                debug!("Reading worksheet. name: {}", name);
                let sheet_results = parse_tabular(&range_to_rows(&range))
                    .with_context(|| format!("Error reading worksheet. file: {}, worksheet: {}", path.display(), name))?;
                results.extend(sheet_results);
            }
            results
        }
        FileKind::Delimited(delimiter) => {
            let rows = read_delimited_rows(path, delimiter)?;
            parse_tabular(&rows)?
        }
    };

    for result in results {
        trace!("{:?}", result);
        output.insert(result);
    }

    info!(
        "Loaded sequencing output. targets: {}",
        output.targets.len()
    );

    Ok(output)
}

/// Parses a header row followed by one row per result, empty sheets have no results.
pub fn parse_tabular(rows: &[Vec<CellValue>]) -> Result<Vec<SequencingResult>, InputFormatError> {
    let Some((header, rows)) = rows.split_first() else {
        return Ok(vec![]);
    };

    let header: Vec<String> = header
        .iter()
        .map(ToString::to_string)
        .collect();

    let column = |name: &str| -> Result<usize, InputFormatError> {
        header
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| InputFormatError::MissingColumn(name.to_string()))
    };

    let target_column = column(TARGET_COLUMN)?;
    let index_column = column(INDEX_COLUMN)?;
    let reads_column = column(READS_COLUMN)?;
    let wt_column = column(WT_COLUMN)?;
    let indel_column = column(INDEL_COLUMN)?;

    let peak_columns: Vec<(usize, usize)> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| PEAK_COLUMN.is_match(name))
        .map(|(peak_column, name)| column(&format!("{}%", name)).map(|pct_column| (peak_column, pct_column)))
        .collect::<Result<_, _>>()?;

    let mut results = vec![];
    for (offset, cells) in rows.iter().enumerate() {
        let row = offset + 2;

        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        if cells.len() != header.len() {
            return Err(InputFormatError::RowLength {
                row,
                expected: header.len(),
                actual: cells.len(),
            });
        }

        let integer = |column: usize| -> Result<i64, InputFormatError> {
            parse_integer(&cells[column]).ok_or_else(|| InputFormatError::InvalidNumber {
                column: header[column].clone(),
                row,
                value: cells[column].to_string(),
            })
        };
        let count = |column: usize| -> Result<u64, InputFormatError> {
            let value = integer(column)?;
            u64::try_from(value).map_err(|_| InputFormatError::InvalidNumber {
                column: header[column].clone(),
                row,
                value: value.to_string(),
            })
        };

        let mut peaks = vec![];
        for (peak_column, pct_column) in peak_columns.iter().copied() {
            let value = cells[peak_column].to_string();
            if value.is_empty() {
                continue;
            }

            let malformed = || InputFormatError::MalformedPeak {
                column: header[peak_column].clone(),
                row,
                value: value.clone(),
            };
            let captures = PEAK_INDEL
                .captures(&value)
                .ok_or_else(malformed)?;
            let indel = captures[1]
                .parse::<i64>()
                .map_err(|_| malformed())?;

            let pct = parse_float(&cells[pct_column]).ok_or_else(|| InputFormatError::InvalidNumber {
                column: header[pct_column].clone(),
                row,
                value: cells[pct_column].to_string(),
            })?;

            peaks.push(Peak {
                indel,
                inframe: captures.get(2).is_some(),
                pct,
            });
        }

        let index = count(index_column)?;
        let index = WellIndex::try_from(index).map_err(|_| InputFormatError::InvalidNumber {
            column: header[index_column].clone(),
            row,
            value: index.to_string(),
        })?;

        results.push(SequencingResult::new(
            &cells[target_column].to_string(),
            index,
            count(reads_column)?,
            count(wt_column)?,
            count(indel_column)?,
            peaks,
        ));
    }

    Ok(results)
}

fn parse_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(value) => Some(*value),
        CellValue::Text(value) => value.parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_integer(cell: &CellValue) -> Option<i64> {
    parse_float(cell)
        .filter(|value| value.fract() == 0.0)
        .map(|value| value as i64)
}

#[derive(Debug, serde::Deserialize)]
struct AmpliconOutputRecord {
    samples: BTreeMap<String, SampleRecord>,
}

#[derive(Debug, serde::Deserialize)]
struct SampleRecord {
    targets: BTreeMap<String, TargetRecord>,
}

#[derive(Debug, serde::Deserialize)]
struct TargetRecord {
    reads: u64,
    reads_wildtype: u64,
    reads_mutant: u64,
    #[serde(default)]
    peaks: BTreeMap<String, f64>,
}

fn load_json(path: &Path) -> Result<Vec<SequencingResult>, Error> {
    let file = File::open(path).with_context(|| format!("Error reading sequencing output. file: {}", path.display()))?;
    let record: AmpliconOutputRecord = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Deserializing sequencing output. file: {}", path.display()))?;

    let mut results = vec![];
    for (sample, sample_record) in record.samples {
        let index = sample
            .trim()
            .parse::<WellIndex>()
            .map_err(|_| InputFormatError::InvalidNumber {
                column: "samples".to_string(),
                row: 0,
                value: sample.clone(),
            })?;

        for (target, target_record) in sample_record.targets {
            let peaks = target_record
                .peaks
                .iter()
                .map(|(indel, count)| -> Result<Peak, InputFormatError> {
                    let indel = indel
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| InputFormatError::MalformedPeak {
                            column: format!("samples.{}.targets.{}.peaks", sample, target),
                            row: 0,
                            value: indel.clone(),
                        })?;

                    let pct = match target_record.reads {
                        0 => 0.0,
                        reads => count / reads as f64,
                    };

                    Ok(Peak {
                        indel,
                        inframe: indel.abs() % 3 == 0,
                        pct,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            results.push(SequencingResult::new(
                &target,
                index,
                target_record.reads,
                target_record.reads_wildtype,
                target_record.reads_mutant,
                peaks,
            ));
        }
    }

    Ok(results)
}

#[cfg(test)]
mod sequencing_tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use indoc::indoc;
    use screening::sequencing::INFRAME_COMMENT;

    use super::*;

    fn t(value: &str) -> CellValue {
        CellValue::text(value)
    }

    fn n(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn header() -> Vec<CellValue> {
        ["Target", "Index/Well", "Reads", "WT", "Indel", "Peak1", "Peak1%", "peak2", "peak2%"]
            .map(t)
            .to_vec()
    }

    #[test]
    fn parses_tabular_rows() {
        // given
        let rows = vec![
            header(),
            vec![t("KO1"), n(3.0), n(200.0), n(20.0), n(180.0), n(-1.0), n(0.25), t("-3 (inframe)"), n(0.6)],
            vec![t("KO2"), n(1.0), n(10.0), n(10.0), n(0.0), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty],
        ];

        // when
        let results = parse_tabular(&rows).unwrap();

        // then
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            SequencingResult {
                index: 3,
                reads: 200,
                wt: 20,
                indel: 180,
                picked: false,
                peaks: vec![
                    Peak {
                        indel: -3,
                        inframe: true,
                        pct: 0.6
                    },
                    Peak {
                        indel: -1,
                        inframe: false,
                        pct: 0.25
                    },
                ],
                comment: INFRAME_COMMENT.to_string(),
                target: "KO1".to_string(),
            }
        );
        assert!(results[1].peaks.is_empty());
        assert_eq!(results[1].comment, "");
    }

    #[test]
    fn row_length_mismatch() {
        // given
        let rows = vec![header(), vec![t("KO1"), n(1.0)]];

        // expect
        assert_eq!(
            parse_tabular(&rows),
            Err(InputFormatError::RowLength {
                row: 2,
                expected: 9,
                actual: 2
            })
        );
    }

    #[test]
    fn malformed_peak() {
        // given
        let mut row = vec![t("KO1"), n(1.0), n(10.0), n(5.0), n(5.0), t("big"), n(0.5)];
        row.extend([CellValue::Empty, CellValue::Empty]);
        let rows = vec![header(), row];

        // expect
        assert_eq!(
            parse_tabular(&rows),
            Err(InputFormatError::MalformedPeak {
                column: "Peak1".to_string(),
                row: 2,
                value: "big".to_string()
            })
        );
    }

    #[test]
    fn missing_column() {
        // given
        let rows = vec![vec![t("Target"), t("Reads")]];

        // expect
        assert_eq!(
            parse_tabular(&rows),
            Err(InputFormatError::MissingColumn("Index/Well".to_string()))
        );
    }

    #[test]
    fn empty_sheet_has_no_results() {
        assert_eq!(parse_tabular(&[]), Ok(vec![]));
    }

    #[test]
    fn loads_csv_output() {
        // given
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.child("output.csv");
        file.write_str(indoc! {r#"
            Target,Index/Well,Reads,WT,Indel,Peak1,Peak1%
            KO1,1,100,40,60,+2,0.6
            KO1,2,50,50,0,,
            KO2,1,80,0,80,-6 (inframe),1.0
        "#})
            .unwrap();

        // when
        let output = load_sequencing_output(file.path()).unwrap();

        // then
        assert_eq!(output.target_names(), vec!["KO1", "KO2"]);
        assert_eq!(output.result("KO1", 1).unwrap().peaks[0].indel, 2);
        assert!(output.result("KO1", 2).unwrap().peaks.is_empty());
        assert_eq!(output.result("KO2", 1).unwrap().comment, INFRAME_COMMENT);
    }

    #[test]
    fn loads_json_output() {
        // given
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.child("output.json");
        file.write_str(indoc! {r#"
            {
                "samples": {
                    "7": {
                        "targets": {
                            "KO1": {
                                "reads": 200,
                                "reads_wildtype": 50,
                                "reads_mutant": 150,
                                "peaks": { "-1": 100, "3": 50 }
                            }
                        }
                    },
                    "8": {
                        "targets": {
                            "KO1": { "reads": 0, "reads_wildtype": 0, "reads_mutant": 0, "peaks": { "2": 0 } }
                        }
                    }
                }
            }
        "#})
            .unwrap();

        // when
        let output = load_sequencing_output(file.path()).unwrap();

        // then
        let result = output.result("KO1", 7).unwrap();
        assert_eq!((result.reads, result.wt, result.indel), (200, 50, 150));
        assert_eq!(
            result.peaks,
            vec![
                Peak {
                    indel: -1,
                    inframe: false,
                    pct: 0.5
                },
                Peak {
                    indel: 3,
                    inframe: true,
                    pct: 0.25
                },
            ]
        );
        assert_eq!(result.comment, INFRAME_COMMENT);

        // and zero reads do not divide by zero
        assert_eq!(output.result("KO1", 8).unwrap().peaks[0].pct, 0.0);
    }

    #[test]
    fn invalid_json_fails() {
        // given
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.child("output.json");
        file.write_str("{ \"samples\": [] }").unwrap();

        // expect
        assert!(load_sequencing_output(file.path()).is_err());
    }
}
