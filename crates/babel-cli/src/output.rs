//! Output formatting utilities

use crate::error::CliResult;
use crate::report::{Outcome, ValidationReport};
use babel_assertions::TestStatus;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored listing with a summary table
    #[default]
    Table,
    /// Plain text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Text => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&data)?),
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

fn outcome_icon(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Passed => "✓".green(),
        Outcome::Failed => "✗".red(),
        Outcome::Errored => "!".red().bold(),
        Outcome::Skipped => "○".dimmed(),
        Outcome::ExpectedFailure => "x".yellow(),
        Outcome::UnexpectedPass => "X".yellow().bold(),
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Passed")]
    passed: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Errored")]
    errored: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "XFail")]
    expected_failures: usize,
    #[tabled(rename = "XPass")]
    unexpected_passes: usize,
}

fn summary_rows(report: &ValidationReport) -> Vec<SummaryRow> {
    let mut rows: BTreeMap<&str, SummaryRow> = BTreeMap::new();
    for entry in &report.entries {
        let row = rows.entry(entry.target.as_str()).or_insert_with(|| SummaryRow {
            target: entry.target.clone(),
            passed: 0,
            failed: 0,
            errored: 0,
            skipped: 0,
            expected_failures: 0,
            unexpected_passes: 0,
        });
        match entry.outcome {
            Outcome::Passed => row.passed += 1,
            Outcome::Failed => row.failed += 1,
            Outcome::Errored => row.errored += 1,
            Outcome::Skipped => row.skipped += 1,
            Outcome::ExpectedFailure => row.expected_failures += 1,
            Outcome::UnexpectedPass => row.unexpected_passes += 1,
        }
    }
    rows.into_values().collect()
}

fn print_table(report: &ValidationReport) {
    for entry in &report.entries {
        println!(
            "{} [{}] {} {}",
            outcome_icon(entry.outcome),
            entry.target.cyan(),
            entry.name,
            format!("({})", entry.outcome).dimmed()
        );
        for case in &entry.cases {
            if case.case != entry.name {
                println!("    {}", case.case);
            }
            if let Some(error) = &case.error {
                println!("      {} {}", "Error:".red(), error);
            }
            for result in &case.results {
                let status = match result.status {
                    TestStatus::Passed => "✓".green(),
                    TestStatus::Failed => "✗".red(),
                    TestStatus::Skipped => "○".dimmed(),
                };
                println!("      {} {}", status, result.message.dimmed());
            }
        }
        if let Some(note) = &entry.note {
            print_warning(note);
        }
    }

    println!();
    let rows = summary_rows(report);
    if rows.is_empty() {
        println!("{}", "No test cases found".dimmed());
    } else {
        println!("{}", Table::new(rows));
    }

    if report.is_success() {
        print_success(&format!("All checks passed in {}ms", report.duration_ms));
    } else {
        print_error(&format!(
            "{} failed, {} errored",
            report.summary.failed, report.summary.errored
        ));
    }
}

/// Print a validation report in the specified format
pub fn print_report(report: &ValidationReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => print_table(report),
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Yaml => print!("{}", report.to_yaml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CaseReport, Expectation, ReportEntry};
    use babel_assertions::TestResult;

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn test_summary_rows_per_target() {
        let mut report = ValidationReport::new(Vec::new());
        for (target, result) in [
            ("dev", TestResult::passed("ok")),
            ("prod", TestResult::failed("no")),
            ("dev", TestResult::failed("no")),
        ] {
            report.push(ReportEntry::new(
                target,
                "case",
                Expectation::Pass,
                vec![CaseReport {
                    case: "case".into(),
                    results: vec![result],
                    error: None,
                }],
            ));
        }

        let rows = summary_rows(&report);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].target.as_str(), rows[0].passed, rows[0].failed), ("dev", 1, 1));
        assert_eq!((rows[1].target.as_str(), rows[1].failed), ("prod", 1));
    }
}
