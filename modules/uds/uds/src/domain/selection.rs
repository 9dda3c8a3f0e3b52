//! Choosing one node definition out of several candidates.

use rand::seq::IndexedRandom;
use uds_sdk::{NodeDefinition, UdsError};

/// Picks one definition when no backend was preselected.
pub trait DefinitionSelector: Send + Sync {
    fn choose<'a>(&self, candidates: &'a [NodeDefinition]) -> Option<&'a NodeDefinition>;
}

/// Uniformly random choice.
///
/// Placeholder policy until a scheduler decides placement upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl DefinitionSelector for RandomSelector {
    fn choose<'a>(&self, candidates: &'a [NodeDefinition]) -> Option<&'a NodeDefinition> {
        candidates.choose(&mut rand::rng())
    }
}

/// Always the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSelector;

impl DefinitionSelector for FirstSelector {
    fn choose<'a>(&self, candidates: &'a [NodeDefinition]) -> Option<&'a NodeDefinition> {
        candidates.first()
    }
}

/// Applies the selection rules to `candidates`.
///
/// With `preselected_backend_id`, the first candidate of that backend is
/// returned and there is no fallback to other backends.
///
/// # Errors
/// `NoDefinitions` for an empty candidate list, `NoMatchingDefinition` when no
/// candidate belongs to the preselected backend.
pub fn select_definition(
    node_type: &str,
    candidates: &[NodeDefinition],
    preselected_backend_id: Option<&str>,
    selector: &dyn DefinitionSelector,
) -> Result<NodeDefinition, UdsError> {
    if candidates.is_empty() {
        return Err(UdsError::NoDefinitions {
            node_type: node_type.to_owned(),
        });
    }
    let chosen = match preselected_backend_id {
        Some(backend_id) => candidates
            .iter()
            .find(|c| c.backend_id == backend_id)
            .ok_or_else(|| UdsError::NoMatchingDefinition {
                node_type: node_type.to_owned(),
                backend_id: backend_id.to_owned(),
            })?,
        None => selector
            .choose(candidates)
            .ok_or_else(|| UdsError::NoDefinitions {
                node_type: node_type.to_owned(),
            })?,
    };
    Ok(chosen.clone())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidates(ids: &[&str]) -> Vec<NodeDefinition> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| NodeDefinition::new(*id).with_attribute("rank", i))
            .collect()
    }

    #[test]
    fn preselected_backend_is_deterministic() {
        let defs = candidates(&["A", "B"]);
        for _ in 0..50 {
            let chosen = select_definition("web", &defs, Some("B"), &RandomSelector).unwrap();
            assert_eq!(chosen.backend_id, "B");
        }
    }

    #[test]
    fn preselected_backend_without_match_fails() {
        let defs = candidates(&["A", "B"]);
        let err = select_definition("web", &defs, Some("C"), &RandomSelector).unwrap_err();
        assert!(matches!(err, UdsError::NoMatchingDefinition { ref backend_id, .. } if backend_id == "C"));
    }

    #[test]
    fn empty_candidates_fail() {
        let err = select_definition("web", &[], None, &RandomSelector).unwrap_err();
        assert!(matches!(err, UdsError::NoDefinitions { .. }));
    }

    #[test]
    fn first_selector_is_stable() {
        let defs = candidates(&["A", "B", "C"]);
        let chosen = select_definition("web", &defs, None, &FirstSelector).unwrap();
        assert_eq!(chosen, defs[0]);
    }

    proptest! {
        #[test]
        fn random_choice_stays_within_candidates(
            ids in proptest::collection::vec("[a-z]{1,6}", 1..8),
            trials in 1usize..40,
        ) {
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let defs = candidates(&refs);
            for _ in 0..trials {
                let chosen = select_definition("web", &defs, None, &RandomSelector).unwrap();
                prop_assert!(defs.contains(&chosen));
            }
        }
    }
}
