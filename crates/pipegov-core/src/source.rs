use crate::error::{GovError, Result};
use crate::pipeline::Pipeline;
use crate::rule::Rule;
use crate::template;
use std::path::PathBuf;
use tracing::debug;

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Supplies the ordered rule list. Implementations own connection,
/// pagination, and retry against whatever backs the rule store; the
/// evaluator only sees fully materialized rules.
pub trait RuleSource {
    fn fetch_rules(&self) -> Result<Vec<Rule>>;
}

/// Supplies the parsed pipeline. Implementations own document retrieval and
/// parsing; an unparseable document surfaces here as an error, never inside
/// the evaluator.
pub trait TemplateSource {
    fn load_pipeline(&self) -> Result<Pipeline>;
}

/// Consumes the derived outcome. Implementations own how and where the
/// result is recorded; the core never prints.
pub trait ReportSink {
    fn report_outcome(&mut self, success: bool, message: &str);
}

// ---------------------------------------------------------------------------
// File-backed implementations
// ---------------------------------------------------------------------------

/// Reads a YAML or JSON document containing a list of rules.
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RuleSource for FileRuleSource {
    fn fetch_rules(&self) -> Result<Vec<Rule>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            GovError::RuleFileUnreadable(format!("{}: {e}", self.path.display()))
        })?;
        let rules: Vec<Rule> = serde_yaml::from_str(&raw)?;
        debug!(count = rules.len(), path = %self.path.display(), "loaded rules");
        Ok(rules)
    }
}

/// Extracts the pipeline from a CloudFormation template file.
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for FileTemplateSource {
    fn load_pipeline(&self) -> Result<Pipeline> {
        template::load_template(&self.path)
    }
}
