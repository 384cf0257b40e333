use std::path::{Path, PathBuf};

use tracing::{info, Level};

use crate::clones::{aggregate, CloneRecord};
use crate::error::{LookupError, StateError};
use crate::grouping::{column_for_knockout, group_by, knockout_names, list_groups, set_user_split};
use crate::history::HistoryStore;
use crate::layout::{build_sample_sheet, LayoutConfig};
use crate::mapping::{infer_default, knockout_for_target, KoMapping};
use crate::sample_sheet::SampleSheet;
use crate::sequencing::{self, SequencingOutput, WellIndex};
use crate::table::Table;
use crate::{file, mapping};

/// Everything the user works on, undo/redo and saving operate on whole snapshots.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub sample_sheet: Option<SampleSheet>,
    pub sequencing_output: SequencingOutput,
    pub ko_mapping: KoMapping,
    pub default_ko_mapping: KoMapping,
}

impl Snapshot {
    /// Recomputes the default mapping, user changes to the mapping are discarded.
    fn remap(mut self) -> Self {
        let knockouts = self
            .sample_sheet
            .as_ref()
            .map(knockout_names)
            .unwrap_or_default();

        self.default_ko_mapping = infer_default(&knockouts, &self.sequencing_output.target_names());
        self.ko_mapping = self.default_ko_mapping.clone();
        self
    }

    fn sample_sheet(&self) -> Result<&SampleSheet, LookupError> {
        self.sample_sheet
            .as_ref()
            .ok_or(LookupError::NoSampleSheet)
    }
}

pub fn build_project_file_path(name: &str, directory: &Path) -> PathBuf {
    let mut project_file_path: PathBuf = PathBuf::from(directory);
    project_file_path.push(format!("project-{}.screening.json", name));
    project_file_path
}

#[derive(Debug, Default)]
pub struct ProjectState {
    history: HistoryStore<Snapshot>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn samplesheet_load(&mut self, table: &Table, config: &LayoutConfig) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            let sample_sheet = build_sample_sheet(table, config)?;

            Ok::<_, StateError>(
                Snapshot {
                    sample_sheet: Some(sample_sheet),
                    ..snapshot.clone()
                }
                .remap(),
            )
        })?;

        info!("Loaded sample sheet. knockouts: {:?}", self.samplesheet_target_names());

        Ok(())
    }

    pub fn group_by(&mut self, key: &str) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            let sample_sheet = group_by(snapshot.sample_sheet()?, key)?;

            Ok::<_, LookupError>(Snapshot {
                sample_sheet: Some(sample_sheet),
                ..snapshot.clone()
            })
        })?;

        info!("Grouped sample sheet. key: {}", key);

        Ok(())
    }

    pub fn set_user_split(&mut self, group: &str, value: bool) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            let sample_sheet = set_user_split(snapshot.sample_sheet()?, group, value)?;

            Ok::<_, LookupError>(Snapshot {
                sample_sheet: Some(sample_sheet),
                ..snapshot.clone()
            })
        })?;

        info!("Set user split. group: {}, split: {}", group, value);

        Ok(())
    }

    pub fn miseq_load(&mut self, sequencing_output: SequencingOutput) -> Result<(), StateError> {
        let targets = sequencing_output.targets.len();

        self.history.apply(|snapshot| {
            Ok::<_, StateError>(
                Snapshot {
                    sequencing_output,
                    ..snapshot.clone()
                }
                .remap(),
            )
        })?;

        info!("Loaded sequencing output. targets: {}", targets);

        Ok(())
    }

    pub fn toggle_picked(&mut self, target: &str, index: WellIndex) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            Ok::<_, LookupError>(Snapshot {
                sequencing_output: sequencing::toggle_picked(&snapshot.sequencing_output, target, index)?,
                ..snapshot.clone()
            })
        })?;

        info!("Toggled picked. target: {}, index: {}", target, index);

        Ok(())
    }

    pub fn set_picked(&mut self, target: &str, index: WellIndex, picked: bool) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            Ok::<_, LookupError>(Snapshot {
                sequencing_output: sequencing::set_picked(&snapshot.sequencing_output, target, index, picked)?,
                ..snapshot.clone()
            })
        })?;

        Ok(())
    }

    pub fn set_comment(&mut self, target: &str, index: WellIndex, comment: &str) -> Result<(), StateError> {
        self.history.apply(|snapshot| {
            Ok::<_, LookupError>(Snapshot {
                sequencing_output: sequencing::set_comment(&snapshot.sequencing_output, target, index, comment)?,
                ..snapshot.clone()
            })
        })?;

        info!("Set comment. target: {}, index: {}, comment: '{}'", target, index, comment);

        Ok(())
    }

    /// Maps the knockout to the target, `None` clears the mapping.
    pub fn mapping_set(&mut self, knockout: &str, target: Option<&str>) -> Result<(), StateError> {
        let changed = self.history.apply(|snapshot| {
            if let Some(target) = target {
                if !snapshot
                    .sequencing_output
                    .has_target(target)
                {
                    return Err(LookupError::UnknownTarget(target.to_string()));
                }
            }

            Ok(Snapshot {
                ko_mapping: mapping::set(&snapshot.ko_mapping, knockout, target)?,
                ..snapshot.clone()
            })
        })?;

        if changed {
            info!("Mapped knockout. knockout: {}, target: {:?}", knockout, target);
        }

        Ok(())
    }

    /// Sorted, distinct knockout names of the sample sheet.
    pub fn samplesheet_target_names(&self) -> Vec<String> {
        self.snapshot()
            .sample_sheet
            .as_ref()
            .map(knockout_names)
            .unwrap_or_default()
    }

    pub fn miseq_target_names(&self) -> Vec<String> {
        self.snapshot()
            .sequencing_output
            .target_names()
    }

    /// The cell labels of the knockout mapped to the sequencing target, empty when unmapped.
    pub fn samplesheet_column(&self, target: &str) -> Vec<Option<String>> {
        let snapshot = self.snapshot();

        knockout_for_target(&snapshot.ko_mapping, target)
            .zip(snapshot.sample_sheet.as_ref())
            .and_then(|(knockout, sheet)| column_for_knockout(sheet, knockout))
            .map(<[Option<String>]>::to_vec)
            .unwrap_or_default()
    }

    pub fn mapping(&self) -> &KoMapping {
        &self.snapshot().ko_mapping
    }

    pub fn default_mapping(&self) -> &KoMapping {
        &self.snapshot().default_ko_mapping
    }

    pub fn clones_groups(&self) -> Vec<(String, bool)> {
        self.snapshot()
            .sample_sheet
            .as_ref()
            .map(list_groups)
            .unwrap_or_default()
    }

    pub fn clones_get_group(&self, group: &str) -> Result<Vec<CloneRecord>, LookupError> {
        let snapshot = self.snapshot();
        let sheet = snapshot
            .sample_sheet
            .as_ref()
            .ok_or_else(|| LookupError::UnknownGroup(group.to_string()))?;

        aggregate(sheet, group, &snapshot.ko_mapping, &snapshot.sequencing_output)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn is_saved(&self) -> bool {
        self.history.is_saved()
    }

    #[tracing::instrument(level = Level::DEBUG, skip(self))]
    pub fn save_state(&mut self, path: &Path) -> Result<(), StateError> {
        file::save(self.snapshot(), path).map_err(|cause| StateError::ProjectFile {
            path: path.to_path_buf(),
            cause,
        })?;
        self.history.mark_saved();

        info!("Saved project. path: {:?}", path);

        Ok(())
    }

    #[tracing::instrument(level = Level::DEBUG, skip(self))]
    pub fn load_state(&mut self, path: &Path) -> Result<(), StateError> {
        let snapshot: Snapshot = file::load(path).map_err(|cause| StateError::ProjectFile {
            path: path.to_path_buf(),
            cause,
        })?;
        self.history.install_loaded(snapshot);

        info!("Loaded project. path: {:?}", path);

        Ok(())
    }
}
