use crate::pipeline::Stage;
use crate::rule::StageRule;
use tracing::debug;

/// Whether the pipeline declares the rule's stages in the required relative
/// order. The pipeline's stage-name sequence is projected down to only the
/// names the rule mentions; the projection must equal the rule's sequence
/// exactly, in length and order. Stages the rule does not name are ignored.
pub fn stage_order_holds(rule_stages: &[StageRule], pipeline_stages: &[Stage]) -> bool {
    let required: Vec<&str> = rule_stages.iter().map(|s| s.name.as_str()).collect();
    let projected: Vec<&str> = pipeline_stages
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| required.contains(name))
        .collect();

    debug!(?required, ?projected, "stage order check");
    required == projected
}
