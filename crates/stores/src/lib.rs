/// Stores are for loading/storing different kinds of data.
///
/// Currently, all stores are just simple files, spreadsheets, CSV and JSON.
pub mod report;
pub mod sequencing;
pub mod tables;

mod cells;
