mod output;

use clap::{Parser, Subcommand};
use output::ConsoleReport;
use pipegov_core::evaluator::{Evaluation, Evaluator};
use pipegov_core::source::{
    FileRuleSource, FileTemplateSource, ReportSink, RuleSource, TemplateSource,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "pipegov",
    about = "Scan a CodePipeline CloudFormation template against governance rules",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a pipeline template against a rule file
    Scan {
        /// Governance rule file (YAML or JSON list of rules)
        #[arg(long, env = "PIPEGOV_RULES")]
        rules: PathBuf,

        /// CloudFormation template containing the pipeline
        #[arg(long)]
        template: PathBuf,
    },

    /// List the rules in a rule file
    Rules {
        /// Governance rule file (YAML or JSON list of rules)
        #[arg(long, env = "PIPEGOV_RULES")]
        rules: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Scan { rules, template } => cmd_scan(rules, template, cli.json),
        Commands::Rules { rules } => cmd_rules(rules, cli.json).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Load rules and template, evaluate, report. Returns the overall pass/fail
/// that becomes the process exit code.
fn cmd_scan(rules: &Path, template: &Path, json: bool) -> anyhow::Result<bool> {
    let rules = FileRuleSource::new(rules).fetch_rules()?;
    let pipeline = FileTemplateSource::new(template).load_pipeline()?;

    let evaluation = Evaluator::new(rules).evaluate(&pipeline);
    let success = evaluation.passed();

    if json {
        output::print_json(&evaluation)?;
        return Ok(success);
    }

    if let Evaluation::Completed { results } = &evaluation {
        output::print_results(results);
    }

    ConsoleReport.report_outcome(success, &evaluation.summary());
    Ok(success)
}

fn cmd_rules(rules: &Path, json: bool) -> anyhow::Result<()> {
    let rules = FileRuleSource::new(rules).fetch_rules()?;

    if json {
        output::print_json(&rules)?;
        return Ok(());
    }

    output::print_rules(&rules);
    Ok(())
}
