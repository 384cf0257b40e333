use std::collections::BTreeMap;

use serde_with::serde_as;
use tracing::debug;

use crate::error::LookupError;

/// 1-based well index of a sequenced sample.
pub type WellIndex = u32;

pub const INFRAME_COMMENT: &str = "In-frame";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Peak {
    pub indel: i64,
    pub inframe: bool,
    /// Fraction of the reads, `0.0..=1.0`.
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequencingResult {
    pub index: WellIndex,
    pub reads: u64,
    pub wt: u64,
    pub indel: u64,
    pub picked: bool,
    /// Ordered by `pct`, descending.
    pub peaks: Vec<Peak>,
    pub comment: String,
    pub target: String,
}

impl SequencingResult {
    /// Builds an unpicked result, peaks are sorted and in-frame results are commented.
    pub fn new(target: &str, index: WellIndex, reads: u64, wt: u64, indel: u64, mut peaks: Vec<Peak>) -> Self {
        peaks.sort_by(|a, b| b.pct.total_cmp(&a.pct));

        let comment = match peaks.iter().any(|peak| peak.inframe) {
            true => INFRAME_COMMENT.to_string(),
            false => String::new(),
        };

        Self {
            index,
            reads,
            wt,
            indel,
            picked: false,
            peaks,
            comment,
            target: target.to_string(),
        }
    }
}

/// Sequencing results by target name, then by well index.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequencingOutput {
    #[serde_as(as = "BTreeMap<_, Vec<(_, _)>>")]
    pub targets: BTreeMap<String, BTreeMap<WellIndex, SequencingResult>>,
}

impl SequencingOutput {
    /// Adds the result, replacing any result for the same target and well.
    pub fn insert(&mut self, result: SequencingResult) {
        self.targets
            .entry(result.target.clone())
            .or_default()
            .insert(result.index, result);
    }

    /// Sorted target names.
    pub fn target_names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    pub fn has_target(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    pub fn result(&self, target: &str, index: WellIndex) -> Option<&SequencingResult> {
        self.targets
            .get(target)
            .and_then(|wells| wells.get(&index))
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn result_mut(&mut self, target: &str, index: WellIndex) -> Result<&mut SequencingResult, LookupError> {
        let wells = self
            .targets
            .get_mut(target)
            .ok_or_else(|| LookupError::UnknownTarget(target.to_string()))?;

        wells
            .get_mut(&index)
            .ok_or_else(|| LookupError::UnknownWell {
                target: target.to_string(),
                index,
            })
    }
}

pub fn is_picked(output: &SequencingOutput, target: &str, index: WellIndex) -> Result<bool, LookupError> {
    output
        .result(target, index)
        .map(|result| result.picked)
        .ok_or_else(|| unknown(output, target, index))
}

pub fn toggle_picked(output: &SequencingOutput, target: &str, index: WellIndex) -> Result<SequencingOutput, LookupError> {
    let picked = is_picked(output, target, index)?;
    set_picked(output, target, index, !picked)
}

pub fn set_picked(
    output: &SequencingOutput,
    target: &str,
    index: WellIndex,
    picked: bool,
) -> Result<SequencingOutput, LookupError> {
    let mut output = output.clone();
    output.result_mut(target, index)?.picked = picked;

    debug!("Set picked. target: {}, index: {}, picked: {}", target, index, picked);

    Ok(output)
}

pub fn set_comment(
    output: &SequencingOutput,
    target: &str,
    index: WellIndex,
    comment: &str,
) -> Result<SequencingOutput, LookupError> {
    let mut output = output.clone();
    output.result_mut(target, index)?.comment = comment.to_string();

    debug!("Set comment. target: {}, index: {}, comment: '{}'", target, index, comment);

    Ok(output)
}

fn unknown(output: &SequencingOutput, target: &str, index: WellIndex) -> LookupError {
    match output.has_target(target) {
        true => LookupError::UnknownWell {
            target: target.to_string(),
            index,
        },
        false => LookupError::UnknownTarget(target.to_string()),
    }
}


#[cfg(test)]
mod sequencing_tests {
    use super::test::{build_output, build_result};
    use super::*;

    #[test]
    fn peaks_are_sorted_descending() {
        // when
        let result = build_result("KO1", 1, &[(-1, 0.1), (2, 0.6), (-4, 0.3)]);

        // then
        let indels: Vec<i64> = result
            .peaks
            .iter()
            .map(|peak| peak.indel)
            .collect();
        assert_eq!(indels, vec![2, -4, -1]);
        assert_eq!(result.comment, "");
    }

    #[test]
    fn inframe_results_are_commented() {
        // when
        let result = build_result("KO1", 1, &[(-1, 0.5), (-3, 0.4)]);

        // then
        assert_eq!(result.comment, INFRAME_COMMENT);
    }

    #[test]
    fn toggle_picked_returns_new_output() {
        // given
        let output = build_output(vec![build_result("KO1", 1, &[]), build_result("KO1", 2, &[])]);

        // when
        let toggled = toggle_picked(&output, "KO1", 2).unwrap();

        // then
        assert_eq!(is_picked(&toggled, "KO1", 2), Ok(true));
        assert_eq!(is_picked(&toggled, "KO1", 1), Ok(false));
        assert_eq!(is_picked(&output, "KO1", 2), Ok(false));

        // and toggling again restores the unpicked result
        assert_eq!(toggle_picked(&toggled, "KO1", 2).unwrap(), output);
    }

    #[test]
    fn set_comment_on_result() {
        // given
        let output = build_output(vec![build_result("KO1", 1, &[])]);

        // when
        let output = set_comment(&output, "KO1", 1, "wt").unwrap();

        // then
        assert_eq!(output.result("KO1", 1).unwrap().comment, "wt");
    }

    #[test]
    fn unknown_target_and_well() {
        // given
        let output = build_output(vec![build_result("KO1", 1, &[])]);

        // expect
        assert_eq!(
            toggle_picked(&output, "KO9", 1),
            Err(LookupError::UnknownTarget("KO9".to_string()))
        );
        assert_eq!(
            set_picked(&output, "KO1", 7, true),
            Err(LookupError::UnknownWell {
                target: "KO1".to_string(),
                index: 7
            })
        );
        assert_eq!(
            set_comment(&output, "KO1", 7, "x"),
            Err(LookupError::UnknownWell {
                target: "KO1".to_string(),
                index: 7
            })
        );
    }
}
