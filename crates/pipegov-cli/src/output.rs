use pipegov_core::evaluator::MatchResult;
use pipegov_core::rule::Rule;
use pipegov_core::source::ReportSink;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Per-rule PASS/FAIL table for a completed scan.
pub fn print_results(results: &[MatchResult]) {
    let rows: Vec<[String; 3]> = results
        .iter()
        .map(|r| {
            [
                r.rule_number.clone(),
                r.rule.pattern_type.to_string(),
                if r.passed { "PASS" } else { "FAIL" }.to_string(),
            ]
        })
        .collect();
    print_rows(["RULE", "PATTERN", "RESULT"], &rows);
}

/// Rule inventory listing: number, pattern type, and whether the rule shapes
/// stages or actions.
pub fn print_rules(rules: &[Rule]) {
    let rows: Vec<[String; 3]> = rules
        .iter()
        .map(|r| {
            let shape = if r.is_malformed() {
                "malformed".to_string()
            } else if !r.contents.stages.is_empty() {
                format!("{} stage(s)", r.contents.stages.len())
            } else {
                format!("{} action(s)", r.contents.actions.len())
            };
            [r.rule_number.clone(), r.pattern_type.to_string(), shape]
        })
        .collect();
    print_rows(["RULE", "PATTERN", "SHAPE"], &rows);
}

/// Both tables share the same three-column shape; pad each column to its
/// widest cell.
fn print_rows(headers: [&str; 3], rows: &[[String; 3]]) {
    if rows.is_empty() {
        return;
    }
    let mut widths = headers.map(str::len);
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }
    let render = |cells: [&str; 3]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", render(headers));
    let sep = widths.map(|w| "-".repeat(w));
    println!("{}", render([&sep[0], &sep[1], &sep[2]]));
    for row in rows {
        println!("{}", render([&row[0], &row[1], &row[2]]));
    }
}

/// Writes the scan outcome to stdout.
pub struct ConsoleReport;

impl ReportSink for ConsoleReport {
    fn report_outcome(&mut self, success: bool, message: &str) {
        if success {
            println!("PASS: {message}");
        } else {
            println!("FAIL: {message}");
        }
    }
}
