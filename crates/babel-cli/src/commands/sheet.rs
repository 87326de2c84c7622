//! Curated test rows from the Google Sheet

use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};
use crate::report::Expectation;
use crate::runner::Planned;
use babel_assertions::TestCase;
use babel_sources::sheet::{GOOGLE_SHEETS_URL, TESTS_SHEET};
use babel_sources::{categories, GoogleSheet, SourceResult, TestRow, DEFAULT_SHEET_ID};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

/// Which service the rows are tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Service {
    Nodenorm,
    Nameres,
    #[default]
    Both,
}

impl Service {
    fn nodenorm(self) -> bool {
        matches!(self, Service::Nodenorm | Service::Both)
    }

    fn nameres(self) -> bool {
        matches!(self, Service::Nameres | Service::Both)
    }
}

/// Arguments for `sheet`
#[derive(Debug, Args)]
pub struct SheetArgs {
    /// Google Sheet holding the test rows
    #[arg(long, default_value = DEFAULT_SHEET_ID)]
    pub sheet_id: String,

    /// Tab within the sheet
    #[arg(long, default_value = TESTS_SHEET)]
    pub tab: String,

    /// Only test rows in this category. Repeatable.
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Service to test
    #[arg(long, value_enum, default_value = "both")]
    pub service: Service,

    /// List categories and their row counts instead of testing
    #[arg(long)]
    pub list_categories: bool,

    /// Google Sheets base URL
    #[arg(long, default_value = GOOGLE_SHEETS_URL, hide = true)]
    pub sheet_url: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Rows")]
    pub rows: usize,
}

fn sheet_entry(name: String, expect_pass: bool, cases: SourceResult<Vec<TestCase>>) -> Option<Planned> {
    if matches!(&cases, Ok(cases) if cases.is_empty()) {
        return None;
    }
    Some(Planned {
        name,
        expectation: if expect_pass {
            Expectation::Pass
        } else {
            Expectation::Fail
        },
        is_issue: false,
        strict: true,
        cases: cases.map_err(|e| e.to_string()),
    })
}

/// Rows marked as not passing must keep failing until the sheet is updated.
pub fn plan_row(row: &TestRow, service: Service) -> Vec<Planned> {
    let mut planned = Vec::new();
    if service.nodenorm() {
        planned.extend(sheet_entry(
            format!("{} NodeNorm", row.id),
            row.expect_pass_in_nodenorm,
            row.nodenorm_cases(),
        ));
    }
    if service.nameres() {
        planned.extend(sheet_entry(
            format!("{} NameRes", row.id),
            row.expect_pass_in_nameres,
            Ok(row.nameres_cases()),
        ));
    }
    planned
}

/// Plan every row in the selected categories. No categories selects all rows.
pub fn plan(rows: &[TestRow], selected: &[String], service: Service) -> Vec<Planned> {
    rows.iter()
        .filter(|row| selected.is_empty() || selected.iter().any(|c| c == &row.category))
        .flat_map(|row| plan_row(row, service))
        .collect()
}

pub async fn load(args: &SheetArgs) -> CliResult<Vec<TestRow>> {
    let sheet = GoogleSheet::new(&args.sheet_id)?
        .with_base_url(&args.sheet_url)
        .with_sheet_name(&args.tab);
    Ok(sheet.test_rows().await?)
}

pub fn list_categories(rows: &[TestRow], format: OutputFormat) -> CliResult<bool> {
    let data: Vec<CategoryRow> = categories(rows)
        .into_iter()
        .map(|(category, rows)| CategoryRow { category, rows })
        .collect();
    print_output(data, format)?;
    Ok(true)
}

pub fn planned_for(args: &SheetArgs, rows: &[TestRow]) -> Vec<Planned> {
    let planned = plan(rows, &args.categories, args.service);
    info!(rows = rows.len(), planned = planned.len(), "Planned Google Sheet tests");
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_sources::parse_test_rows;

    const CSV: &str = "\
Category,Passes in NodeNorm,Passes in NameRes,Flags,Query Label,Query ID,Preferred ID,Biolink Classes
Unit Tests,y,n,,diabetes,DOID:9351,MONDO:0005015,biolink:Disease
Drugs,y,y,negative,,NOTAREALPREFIX:1,,
Drugs,n,n,,,,,
";

    fn rows() -> Vec<TestRow> {
        parse_test_rows(CSV, TESTS_SHEET).unwrap()
    }

    #[test]
    fn test_plan_row_per_service() {
        let rows = rows();
        let planned = plan_row(&rows[0], Service::Both);
        assert_eq!(planned.len(), 2);

        assert_eq!(planned[0].name, "Tests:row=2 NodeNorm");
        assert_eq!(planned[0].expectation, Expectation::Pass);
        assert_eq!(planned[0].cases.as_ref().unwrap().len(), 2);

        assert_eq!(planned[1].name, "Tests:row=2 NameRes");
        assert_eq!(planned[1].expectation, Expectation::Fail);
        assert!(planned.iter().all(|p| p.strict && !p.is_issue));
    }

    #[test]
    fn test_rows_without_cases_are_not_planned() {
        let rows = rows();
        // Negative rows have nothing to search for.
        let planned = plan_row(&rows[1], Service::Both);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].name, "Tests:row=3 NodeNorm");

        assert!(plan_row(&rows[2], Service::Both).is_empty());
    }

    #[test]
    fn test_category_and_service_filters() {
        let rows = rows();
        assert_eq!(plan(&rows, &[], Service::Both).len(), 3);
        assert_eq!(plan(&rows, &["Drugs".to_string()], Service::Both).len(), 1);
        assert_eq!(plan(&rows, &["Unit Tests".to_string()], Service::Nameres).len(), 1);
        assert!(plan(&rows, &["Chemicals".to_string()], Service::Both).is_empty());
    }

    #[test]
    fn test_bad_conflation_is_errored_not_dropped() {
        let rows = parse_test_rows(
            "Category,Passes in NodeNorm,Query ID,Preferred ID,Conflations\n\
             Genes,y,NCBIGene:1756,NCBIGene:1756,cell_tissue\n",
            TESTS_SHEET,
        )
        .unwrap();
        let planned = plan_row(&rows[0], Service::Nodenorm);
        assert_eq!(planned.len(), 1);
        assert!(planned[0].cases.as_ref().unwrap_err().contains("unknown conflations"));
    }
}
