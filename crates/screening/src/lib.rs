//! Clone screening.
//!
//! Locates the knockout layout of a pooling sample sheet, reconciles it with sequencing output
//! and aggregates the results per clone.

pub mod clones;
pub mod error;
pub mod file;
pub mod grid;
pub mod grouping;
pub mod history;
pub mod layout;
pub mod mapping;
pub mod project;
pub mod report;
pub mod sample_sheet;
pub mod sequencing;
pub mod table;
