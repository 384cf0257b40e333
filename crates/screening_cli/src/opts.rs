#![deny(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::args::SetOrClearOperationArg;
use screening::sequencing::WellIndex;

#[derive(Parser, Debug)]
#[command(name = "screening_cli")]
#[command(bin_name = "screening_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    #[command(subcommand)]
    pub(crate) command: ProjectCommand,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    /// Path
    #[arg(long, default_value = ".")]
    pub(crate) path: PathBuf,

    /// Project name
    #[arg(long, value_name = "PROJECT_NAME")]
    pub(crate) project: String,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ProjectCommand {
    /// Create a new project
    Create,
    /// Load a pooling sheet (xlsx, xls, ods, csv or tsv)
    LoadSampleSheet {
        /// The pooling sheet file
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Header rows above the grid, least specific first, the last one must be 'knockout'.
        /// e.g. 'extraction,amplicon,knockout'
        #[arg(long, num_args = 1.., value_delimiter = ',', value_name = "HEADER_KEYS")]
        headers: Option<Vec<String>>,
    },
    /// Load sequencing output (json, xlsx, xls, ods, csv or tsv)
    LoadSequencing {
        /// The sequencing output file
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Group the columns of the sample sheet by a header key
    GroupBy {
        /// Header key, e.g. 'amplicon'
        #[arg(long)]
        key: String,
    },
    /// Set or clear the user split of a group
    SetSplit {
        /// Group key, e.g. 'AMP1'
        #[arg(long)]
        group: String,

        /// Operation
        #[arg(long)]
        operation: SetOrClearOperationArg,
    },
    /// Map a knockout to a sequencing target, without a target the mapping is cleared
    Map {
        /// Knockout name
        #[arg(long)]
        knockout: String,

        /// Sequencing target name
        #[arg(long)]
        target: Option<String>,
    },
    /// Toggle the picked flag of a sequencing result
    TogglePicked {
        /// Sequencing target name
        #[arg(long)]
        target: String,

        /// Well index
        #[arg(long)]
        index: WellIndex,
    },
    /// Set or clear the picked flag of a sequencing result
    SetPicked {
        /// Sequencing target name
        #[arg(long)]
        target: String,

        /// Well index
        #[arg(long)]
        index: WellIndex,

        /// Operation
        #[arg(long)]
        operation: SetOrClearOperationArg,
    },
    /// Set the comment of a sequencing result
    SetComment {
        /// Sequencing target name
        #[arg(long)]
        target: String,

        /// Well index
        #[arg(long)]
        index: WellIndex,

        /// Comment, e.g. 'wt'
        #[arg(long)]
        comment: String,
    },
    /// List the groups of the sample sheet
    ListGroups,
    /// List the clones of a group
    ListClones {
        /// Group label, as listed by 'list-groups'
        #[arg(long)]
        group: String,
    },
    /// List the knockout to target mapping
    ListMapping,
    /// Export the clone report as CSV
    ExportReport {
        /// The report file
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Include clones without a picked result
        #[arg(long)]
        everything: bool,
    },
}
