use crate::error::{GovError, Result};
use crate::pipeline::Pipeline;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, warn};

const PIPELINE_RESOURCE_TYPE: &str = "AWS::CodePipeline::Pipeline";

/// Extract the pipeline structure from a CloudFormation template document
/// (YAML or JSON). The first resource of type `AWS::CodePipeline::Pipeline`
/// supplies the stages; a template with no such resource yields an empty
/// `Pipeline`, which the evaluator reports as the no-pipeline sentinel.
pub fn extract_pipeline(document: &str) -> Result<Pipeline> {
    let doc: Value = serde_yaml::from_str(document)?;
    let doc = resolve_tags(doc);

    let Some(resources) = doc.get("Resources").and_then(Value::as_mapping) else {
        return Err(GovError::MalformedTemplate(
            "missing Resources section".to_string(),
        ));
    };

    for (name, resource) in resources {
        if resource.get("Type").and_then(Value::as_str) != Some(PIPELINE_RESOURCE_TYPE) {
            continue;
        }
        debug!(resource = ?name, "found pipeline resource");
        let Some(properties) = resource.get("Properties") else {
            continue;
        };
        let pipeline: Pipeline = serde_yaml::from_value(properties.clone())?;
        return Ok(pipeline);
    }

    warn!("no CodePipeline resource in template");
    Ok(Pipeline::default())
}

/// Read and extract a pipeline from a template file on disk.
pub fn load_template(path: &Path) -> Result<Pipeline> {
    let raw = std::fs::read_to_string(path)?;
    extract_pipeline(&raw)
}

/// CloudFormation intrinsic short tags (`!Sub`, `!Ref`, `!GetAtt`, ...) hold
/// values resolved only at deploy time; the matcher has nothing to compare
/// them against, so tagged nodes normalize to null.
fn resolve_tags(value: Value) -> Value {
    match value {
        Value::Tagged(_) => Value::Null,
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (resolve_tags(k), resolve_tags(v)))
                .collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(resolve_tags).collect())
        }
        other => other,
    }
}
