use std::path::PathBuf;

use thiserror::Error;

use crate::sequencing::WellIndex;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Could not locate knockouts, the table contains no 0 or 1 cells")]
    NotFound,
    #[error("Could not locate knockout names. top: {top}, required header rows: {required}")]
    InsufficientHeaderRows { top: usize, required: usize },
    #[error("Invalid header keys, the last key must be 'knockout'. keys: {0:?}")]
    InvalidHeaderKeys(Vec<String>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFormatError {
    #[error("Unsupported extension. extension: '{0}'")]
    UnsupportedExtension(String),
    #[error("Row contains the wrong number of columns. row: {row}, expected: {expected}, actual: {actual}")]
    RowLength { row: usize, expected: usize, actual: usize },
    #[error("Missing column. column: '{0}'")]
    MissingColumn(String),
    #[error("Invalid number. column: '{column}', row: {row}, value: '{value}'")]
    InvalidNumber { column: String, row: usize, value: String },
    #[error("Malformed peak. column: '{column}', row: {row}, value: '{value}'")]
    MalformedPeak { column: String, row: usize, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No sample sheet loaded")]
    NoSampleSheet,
    #[error("Unknown header key. key: '{0}'")]
    UnknownKey(String),
    #[error("Unknown group. group: '{0}'")]
    UnknownGroup(String),
    #[error("Unknown knockout. knockout: '{0}'")]
    UnknownKnockout(String),
    #[error("Unknown target. target: '{0}'")]
    UnknownTarget(String),
    #[error("Unknown well. target: '{target}', index: {index}")]
    UnknownWell { target: String, index: WellIndex },
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Project file error. path: {path:?}, cause: {cause}")]
    ProjectFile { path: PathBuf, cause: std::io::Error },
}
