use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value constraints a rule places on an action's `ActionTypeId` or
/// `Configuration` block. Values stay structural (`serde_json::Value`) so a
/// numeric `Version: 1` and the string `"1"` compare as distinct, the same
/// way the backing store records them.
pub type ConstraintMap = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// PatternType
// ---------------------------------------------------------------------------

/// Rule category. Only `All` is evaluated today; every other value is
/// reserved and the evaluator skips the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternType {
    All,
    #[serde(other)]
    Reserved,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::All => f.write_str("All"),
            PatternType::Reserved => f.write_str("Reserved"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One governance rule as stored in the rule store. Field names follow the
/// store's wire shape (`RuleNumber`, `PatternType`, `Contents`). Immutable
/// for the lifetime of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    pub rule_number: String,
    pub pattern_type: PatternType,
    pub contents: RuleContents,
}

impl Rule {
    /// A well-formed rule populates exactly one of `stages` / `actions`.
    /// Malformed rules fail closed in the evaluator.
    pub fn is_malformed(&self) -> bool {
        self.contents.stages.is_empty() && self.contents.actions.is_empty()
    }
}

/// Either a set of stage requirements or a set of cross-cutting action
/// requirements. Stage order in `stages` is the order the pipeline must
/// honor when more than one stage is named.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleContents {
    #[serde(default)]
    pub stages: Vec<StageRule>,
    #[serde(default)]
    pub actions: Vec<ActionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageRule {
    pub name: String,
    /// Empty means stage presence alone satisfies the rule.
    #[serde(default)]
    pub actions: Vec<ActionRule>,
}

/// Partial action shape. Extra record fields the store carries (RunOrder,
/// InputArtifacts) are ignored on deserialization and never matched on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionRule {
    pub name: String,
    #[serde(default)]
    pub action_type_id: ConstraintMap,
    #[serde(default)]
    pub configuration: ConstraintMap,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
