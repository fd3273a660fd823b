use crate::rule::ConstraintMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Parsed structural view of a deployment pipeline: ordered stages containing
/// ordered actions. Built once per evaluation run by the template source and
/// treated as an immutable snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pipeline {
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Full action shape as declared in the template. Unlike a rule's
/// `ActionRule`, these maps are complete; the matcher treats them as the
/// superset side of the containment test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub action_type_id: ConstraintMap,
    #[serde(default)]
    pub configuration: ConstraintMap,
}
