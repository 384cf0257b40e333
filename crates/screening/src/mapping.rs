use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::LookupError;

/// Sample sheet knockout name to sequencing target name, non-null targets are distinct.
pub type KoMapping = BTreeMap<String, Option<String>>;

/// Infers the default mapping.
///
/// Exact name matches are assigned first. Each remaining knockout then takes the shortest unused
/// target whose normalized name starts with the normalized knockout name.
pub fn infer_default(knockouts: &[String], targets: &[String]) -> KoMapping {
    let targets: BTreeSet<&str> = targets
        .iter()
        .map(String::as_str)
        .collect();

    let mut used: BTreeSet<&str> = BTreeSet::new();
    let mut mapping: KoMapping = knockouts
        .iter()
        .map(|knockout| (knockout.clone(), None))
        .collect();

    for (knockout, target) in mapping.iter_mut() {
        if let Some(exact) = targets.get(knockout.as_str()).copied() {
            used.insert(exact);
            *target = Some(exact.to_string());
        }
    }

    for (knockout, target) in mapping.iter_mut() {
        if target.is_some() {
            continue;
        }

        let normalized_knockout = normalize(knockout);
        let candidate = targets
            .iter()
            .filter(|candidate| !used.contains(*candidate))
            .filter(|candidate| normalize(candidate).starts_with(&normalized_knockout))
            .min_by_key(|candidate| (candidate.chars().count(), **candidate))
            .copied();

        if let Some(candidate) = candidate {
            trace!("Prefix match. knockout: {}, target: {}", knockout, candidate);
            used.insert(candidate);
            *target = Some(candidate.to_string());
        }
    }

    debug!("Inferred default mapping. mapping: {:?}", mapping);

    mapping
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Maps the knockout to the target, any other knockout holding the target is cleared.
pub fn set(mapping: &KoMapping, knockout: &str, target: Option<&str>) -> Result<KoMapping, LookupError> {
    let current = mapping
        .get(knockout)
        .ok_or_else(|| LookupError::UnknownKnockout(knockout.to_string()))?;

    if current.as_deref() == target {
        return Ok(mapping.clone());
    }

    let mut mapping: KoMapping = mapping
        .iter()
        .map(|(key, value)| match (value.as_deref(), target) {
            (Some(value), Some(target)) if value == target => (key.clone(), None),
            _ => (key.clone(), value.clone()),
        })
        .collect();

    mapping.insert(knockout.to_string(), target.map(str::to_string));

    Ok(mapping)
}

pub fn knockout_for_target<'a>(mapping: &'a KoMapping, target: &str) -> Option<&'a str> {
    mapping
        .iter()
        .find(|(_, value)| value.as_deref() == Some(target))
        .map(|(key, _)| key.as_str())
}
