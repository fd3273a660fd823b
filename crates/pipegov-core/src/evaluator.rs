use crate::matcher::{match_action, match_stage};
use crate::order::stage_order_holds;
use crate::pipeline::Pipeline;
use crate::rule::{PatternType, Rule};
use serde::Serialize;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// MatchResult
// ---------------------------------------------------------------------------

/// Outcome of one rule against the pipeline. Carries the rule itself so a
/// failing result can be reported with the shape that was violated.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub rule_number: String,
    pub passed: bool,
    pub rule: Rule,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Result of a full evaluation run. The two sentinel outcomes bypass per-rule
/// results entirely: no rules to evaluate, or no pipeline structure to
/// evaluate them against.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    NoRulesAvailable,
    NoPipelineFound,
    Completed { results: Vec<MatchResult> },
}

impl Evaluation {
    /// The single success boolean a report sink consumes: true iff the run
    /// completed and no rule failed. Either sentinel counts as failure.
    pub fn passed(&self) -> bool {
        match self {
            Evaluation::Completed { results } => results.iter().all(|r| r.passed),
            Evaluation::NoRulesAvailable | Evaluation::NoPipelineFound => false,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Evaluation::NoRulesAvailable => "no governance rules available".to_string(),
            Evaluation::NoPipelineFound => {
                "no pipeline stages found to scan against".to_string()
            }
            Evaluation::Completed { results } => {
                let failed: Vec<&str> = results
                    .iter()
                    .filter(|r| !r.passed)
                    .map(|r| r.rule_number.as_str())
                    .collect();
                if failed.is_empty() {
                    format!("{} rule(s) passed", results.len())
                } else {
                    format!("rule(s) failed: {}", failed.join(", "))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Runs the rule list against a parsed pipeline. Pure over its inputs: no
/// side effects beyond tracing, deterministic for identical inputs, results
/// in rule-list order.
pub struct Evaluator {
    rules: Vec<Rule>,
}

impl Evaluator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, pipeline: &Pipeline) -> Evaluation {
        if self.rules.is_empty() {
            warn!("rule source returned no rules");
            return Evaluation::NoRulesAvailable;
        }
        if pipeline.stages.is_empty() {
            warn!("pipeline has no stages to scan");
            return Evaluation::NoPipelineFound;
        }

        let mut results = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if rule.pattern_type != PatternType::All {
                debug!(rule = %rule.rule_number, pattern = %rule.pattern_type, "skipping reserved pattern type");
                continue;
            }
            let passed = check_rule(rule, pipeline);
            info!(rule = %rule.rule_number, passed, "rule evaluated");
            results.push(MatchResult {
                rule_number: rule.rule_number.clone(),
                passed,
                rule: rule.clone(),
            });
        }
        Evaluation::Completed { results }
    }
}

/// One rule's PASS/FAIL: every stage-rule (plus relative order when more
/// than one stage is named) or every action-rule must hold. A rule naming
/// neither stages nor actions is malformed and fails closed so the rest of
/// the rule set still produces results.
fn check_rule(rule: &Rule, pipeline: &Pipeline) -> bool {
    if rule.is_malformed() {
        warn!(rule = %rule.rule_number, "malformed rule: neither stages nor actions, failing closed");
        return false;
    }
    let contents = &rule.contents;
    if !contents.stages.is_empty() {
        let order_ok = contents.stages.len() <= 1
            || stage_order_holds(&contents.stages, &pipeline.stages);
        let stages_ok = contents
            .stages
            .iter()
            .all(|stage_rule| match_stage(stage_rule, &pipeline.stages));
        order_ok && stages_ok
    } else {
        contents
            .actions
            .iter()
            .all(|action_rule| match_action(action_rule, &pipeline.stages))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Action, Stage};
    use crate::rule::{ActionRule, ConstraintMap, RuleContents, StageRule};
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> ConstraintMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn pass_pipeline() -> Pipeline {
        Pipeline::new(vec![
            Stage {
                name: "BuildAndPackage".to_string(),
                actions: vec![
                    Action {
                        name: "Scan-CodePipeline".to_string(),
                        action_type_id: map(&[
                            ("Category", "Invoke"),
                            ("Owner", "AWS"),
                            ("Provider", "Lambda"),
                            ("Version", "1"),
                        ]),
                        configuration: map(&[("FunctionName", "ScanCodePipeline")]),
                    },
                    Action {
                        name: "Update-CodePipeline".to_string(),
                        action_type_id: map(&[
                            ("Category", "Deploy"),
                            ("Owner", "AWS"),
                            ("Provider", "CloudFormation"),
                            ("Version", "1"),
                        ]),
                        configuration: map(&[("ActionMode", "CREATE_UPDATE")]),
                    },
                ],
            },
            Stage {
                name: "Test".to_string(),
                actions: vec![],
            },
            Stage {
                name: "Prod".to_string(),
                actions: vec![],
            },
        ])
    }

    fn stage_rule(number: &str, stages: Vec<StageRule>) -> Rule {
        Rule {
            rule_number: number.to_string(),
            pattern_type: PatternType::All,
            contents: RuleContents {
                stages,
                actions: vec![],
            },
        }
    }

    fn action_rule(number: &str, actions: Vec<ActionRule>) -> Rule {
        Rule {
            rule_number: number.to_string(),
            pattern_type: PatternType::All,
            contents: RuleContents {
                stages: vec![],
                actions,
            },
        }
    }

    fn named_stage(name: &str) -> StageRule {
        StageRule {
            name: name.to_string(),
            actions: vec![],
        }
    }

    #[test]
    fn empty_rule_list_yields_no_rules_sentinel() {
        let eval = Evaluator::new(vec![]).evaluate(&pass_pipeline());
        assert!(matches!(eval, Evaluation::NoRulesAvailable));
        assert!(!eval.passed());
    }

    #[test]
    fn empty_pipeline_yields_no_pipeline_sentinel() {
        let rules = vec![stage_rule("001", vec![named_stage("Test")])];
        let eval = Evaluator::new(rules).evaluate(&Pipeline::default());
        assert!(matches!(eval, Evaluation::NoPipelineFound));
        assert!(!eval.passed());
    }

    #[test]
    fn stage_presence_rule_passes() {
        let rules = vec![stage_rule("003", vec![named_stage("Test")])];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        assert!(eval.passed());
    }

    #[test]
    fn stage_order_rule_passes_when_ordered() {
        let rules = vec![stage_rule(
            "002",
            vec![named_stage("Test"), named_stage("Prod")],
        )];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        assert!(eval.passed());
    }

    #[test]
    fn stage_order_rule_fails_when_misordered() {
        let rules = vec![stage_rule(
            "002",
            vec![named_stage("Test"), named_stage("Prod")],
        )];
        let mut pipeline = pass_pipeline();
        pipeline.stages.swap(1, 2); // Prod before Test
        let eval = Evaluator::new(rules).evaluate(&pipeline);
        assert!(!eval.passed());
        let Evaluation::Completed { results } = eval else {
            panic!("expected completed evaluation");
        };
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].rule_number, "002");
    }

    #[test]
    fn two_action_stage_rule_passes_then_fails_without_scan_action() {
        let rules = vec![stage_rule(
            "001",
            vec![StageRule {
                name: "BuildAndPackage".to_string(),
                actions: vec![
                    ActionRule {
                        name: "Scan-CodePipeline".to_string(),
                        action_type_id: map(&[("Provider", "Lambda")]),
                        configuration: map(&[("FunctionName", "ScanCodePipeline")]),
                    },
                    ActionRule {
                        name: "Update-CodePipeline".to_string(),
                        action_type_id: map(&[("Provider", "CloudFormation")]),
                        configuration: map(&[("ActionMode", "CREATE_UPDATE")]),
                    },
                ],
            }],
        )];

        let eval = Evaluator::new(rules.clone()).evaluate(&pass_pipeline());
        assert!(eval.passed());

        let mut missing = pass_pipeline();
        missing.stages[0]
            .actions
            .retain(|a| a.name != "Scan-CodePipeline");
        let eval = Evaluator::new(rules).evaluate(&missing);
        assert!(!eval.passed());
    }

    #[test]
    fn action_rule_matches_anywhere_with_extra_config_keys() {
        let mut pipeline = pass_pipeline();
        pipeline.stages[0].actions[0]
            .configuration
            .insert("Timeout".to_string(), json!(30));

        let rules = vec![action_rule(
            "004",
            vec![ActionRule {
                name: "Scan-CodePipeline".to_string(),
                action_type_id: map(&[("Provider", "Lambda")]),
                configuration: map(&[("FunctionName", "ScanCodePipeline")]),
            }],
        )];
        let eval = Evaluator::new(rules).evaluate(&pipeline);
        assert!(eval.passed());
    }

    #[test]
    fn action_rule_fails_when_absent_everywhere() {
        let rules = vec![action_rule(
            "004",
            vec![ActionRule {
                name: "Missing-Action".to_string(),
                action_type_id: ConstraintMap::new(),
                configuration: ConstraintMap::new(),
            }],
        )];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        assert!(!eval.passed());
    }

    #[test]
    fn reserved_pattern_types_are_skipped() {
        let mut skipped = stage_rule("005", vec![named_stage("Nonexistent")]);
        skipped.pattern_type = PatternType::Reserved;
        let rules = vec![skipped, stage_rule("003", vec![named_stage("Test")])];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        let Evaluation::Completed { results } = &eval else {
            panic!("expected completed evaluation");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_number, "003");
        assert!(eval.passed());
    }

    #[test]
    fn malformed_rule_fails_closed_and_evaluation_continues() {
        let malformed = Rule {
            rule_number: "bad".to_string(),
            pattern_type: PatternType::All,
            contents: RuleContents::default(),
        };
        let rules = vec![malformed, stage_rule("003", vec![named_stage("Test")])];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        let Evaluation::Completed { results } = &eval else {
            panic!("expected completed evaluation");
        };
        assert_eq!(results.len(), 2);
        assert!(!results[0].passed);
        assert!(results[1].passed);
        assert!(!eval.passed());
    }

    #[test]
    fn every_stage_rule_must_hold_not_just_the_last() {
        // Rule names two stages: the first is absent, the last passes. The
        // rule must fail even though the final stage-rule holds.
        let rules = vec![stage_rule(
            "006",
            vec![named_stage("Nonexistent"), named_stage("Prod")],
        )];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        assert!(!eval.passed());
    }

    #[test]
    fn results_preserve_rule_order() {
        let rules = vec![
            stage_rule("001", vec![named_stage("Test")]),
            stage_rule("002", vec![named_stage("Prod")]),
            stage_rule("003", vec![named_stage("BuildAndPackage")]),
        ];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        let Evaluation::Completed { results } = eval else {
            panic!("expected completed evaluation");
        };
        let order: Vec<&str> = results.iter().map(|r| r.rule_number.as_str()).collect();
        assert_eq!(order, ["001", "002", "003"]);
    }

    #[test]
    fn failing_result_carries_offending_rule() {
        let rules = vec![stage_rule("007", vec![named_stage("Nonexistent")])];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        let Evaluation::Completed { results } = eval else {
            panic!("expected completed evaluation");
        };
        assert_eq!(results[0].rule.contents.stages[0].name, "Nonexistent");
    }

    #[test]
    fn summary_names_failed_rules() {
        let rules = vec![
            stage_rule("001", vec![named_stage("Test")]),
            stage_rule("002", vec![named_stage("Nonexistent")]),
        ];
        let eval = Evaluator::new(rules).evaluate(&pass_pipeline());
        assert!(eval.summary().contains("002"));
    }
}
