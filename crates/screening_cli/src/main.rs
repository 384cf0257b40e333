use std::path::Path;

use clap::Parser;
use screening::layout::LayoutConfig;
use screening::project::{build_project_file_path, ProjectState};
use screening::report::{build_report, ReportConfig};
use screening::sequencing::SequencingResult;
use tracing::{debug, info};

use crate::opts::{Opts, ProjectCommand};

mod opts;

fn main() -> anyhow::Result<()> {
    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;

    let opts = Opts::parse_from(args);

    cli::tracing::configure_tracing(opts.trace.clone(), opts.verbose.clone())?;

    let path = build_project_file_path(&opts.project, &opts.path);

    let mut state = ProjectState::new();

    match opts.command {
        ProjectCommand::Create => {
            info!("Creating project. path: {:?}", path);
            state.save_state(&path)?;
            info!("Created project successfully");
        }
        command => {
            state.load_state(&path)?;

            apply(&mut state, command, &path)?;

            // Saving after any operation is implicit for the CLI.
            if !state.is_saved() {
                state.save_state(&path)?;
            }
        }
    }

    Ok(())
}

fn apply(state: &mut ProjectState, command: ProjectCommand, project_path: &Path) -> anyhow::Result<()> {
    debug!("Applying command. project: {:?}, command: {:?}", project_path, command);

    match command {
        ProjectCommand::Create => unreachable!(),
        ProjectCommand::LoadSampleSheet {
            file,
            headers,
        } => {
            let config = match headers {
                Some(headers) => LayoutConfig::new(headers)?,
                None => LayoutConfig::default(),
            };

            let table = stores::tables::load_table(&file)?;
            state.samplesheet_load(&table, &config)?;
        }
        ProjectCommand::LoadSequencing {
            file,
        } => {
            let output = stores::sequencing::load_sequencing_output(&file)?;
            state.miseq_load(output)?;
        }
        ProjectCommand::GroupBy {
            key,
        } => state.group_by(&key)?,
        ProjectCommand::SetSplit {
            group,
            operation,
        } => state.set_user_split(&group, operation.into())?,
        ProjectCommand::Map {
            knockout,
            target,
        } => state.mapping_set(&knockout, target.as_deref())?,
        ProjectCommand::TogglePicked {
            target,
            index,
        } => state.toggle_picked(&target, index)?,
        ProjectCommand::SetPicked {
            target,
            index,
            operation,
        } => state.set_picked(&target, index, operation.into())?,
        ProjectCommand::SetComment {
            target,
            index,
            comment,
        } => state.set_comment(&target, index, &comment)?,
        ProjectCommand::ListGroups => {
            for (group, is_split) in state.clones_groups() {
                match is_split {
                    true => println!("{} (split)", group),
                    false => println!("{}", group),
                }
            }
        }
        ProjectCommand::ListClones {
            group,
        } => {
            for clone in state.clones_get_group(&group)? {
                let knockouts: Vec<String> = clone
                    .knockouts
                    .iter()
                    .map(|(knockout, result)| format!("{}={}", knockout, describe_result(result.as_ref())))
                    .collect();

                println!("{}: {}", clone.label, knockouts.join(", "));
            }
        }
        ProjectCommand::ListMapping => {
            for (knockout, target) in state.mapping() {
                let default = state
                    .default_mapping()
                    .get(knockout)
                    .cloned()
                    .flatten();
                let marker = match *target == default {
                    true => "",
                    false => " (changed)",
                };

                println!(
                    "{} -> {}{}",
                    knockout,
                    target.as_deref().unwrap_or("<none>"),
                    marker
                );
            }
        }
        ProjectCommand::ExportReport {
            output,
            everything,
        } => {
            let rows = build_report(state, &ReportConfig {
                everything,
            })?;
            stores::report::store_report(&output, &rows)?;

            info!("Exported report. path: {:?}", output);
        }
    }

    Ok(())
}

fn describe_result(result: Option<&SequencingResult>) -> String {
    match result {
        Some(result) if result.picked => format!("{} (picked)", result.index),
        Some(result) => result.index.to_string(),
        None => stores::report::NA_INDEX.to_string(),
    }
}
