use crate::pipeline::{Action, Stage};
use crate::rule::{ActionRule, ConstraintMap, StageRule};
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Subset containment
// ---------------------------------------------------------------------------

/// Every (key, value) pair of `rule` is present with an equal value in
/// `target`. Extra target keys never cause a mismatch.
pub fn is_submap(rule: &ConstraintMap, target: &ConstraintMap) -> bool {
    rule.iter().all(|(key, value)| target.get(key) == Some(value))
}

/// Exact name equality plus containment on both constraint maps. All string
/// comparisons are case-sensitive.
fn action_satisfies(rule: &ActionRule, action: &Action) -> bool {
    action.name == rule.name
        && is_submap(&rule.action_type_id, &action.action_type_id)
        && is_submap(&rule.configuration, &action.configuration)
}

// ---------------------------------------------------------------------------
// StageMatcher
// ---------------------------------------------------------------------------

/// Whether one stage rule is satisfied by the pipeline's stages.
///
/// The first stage whose name matches is the one examined. A matched stage
/// with no required actions passes on presence alone. Otherwise each required
/// action name gets a flag that starts false and flips to true once any
/// action in the stage satisfies it; the flag never reverts, so a later
/// non-matching action with the same target name cannot undo an earlier
/// match. A matched stage with zero actions cannot satisfy required actions.
pub fn match_stage(stage_rule: &StageRule, stages: &[Stage]) -> bool {
    let Some(stage) = stages.iter().find(|s| s.name == stage_rule.name) else {
        debug!(stage = %stage_rule.name, "no pipeline stage with matching name");
        return false;
    };

    if stage_rule.actions.is_empty() {
        debug!(stage = %stage_rule.name, "stage rule has no actions, presence satisfies");
        return true;
    }

    let mut satisfied: BTreeMap<&str, bool> = stage_rule
        .actions
        .iter()
        .map(|a| (a.name.as_str(), false))
        .collect();

    for action in &stage.actions {
        for required in &stage_rule.actions {
            if action_satisfies(required, action) {
                satisfied.insert(required.name.as_str(), true);
            }
        }
    }

    debug!(stage = %stage_rule.name, ?satisfied, "stage scan complete");
    satisfied.values().all(|v| *v)
}

// ---------------------------------------------------------------------------
// ActionMatcher
// ---------------------------------------------------------------------------

/// Whether any action anywhere in the pipeline satisfies the action rule.
/// Stage order is irrelevant; the scan short-circuits on the first match.
pub fn match_action(action_rule: &ActionRule, stages: &[Stage]) -> bool {
    stages
        .iter()
        .flat_map(|stage| stage.actions.iter())
        .any(|action| action_satisfies(action_rule, action))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
