//! Curated test rows kept in a Google Sheet.
//!
//! The sheet is downloaded through its CSV export. Each row names a query
//! identifier and the clique it should normalize to, and is turned into
//! ordinary test cases for NodeNorm and NameRes.

use crate::error::{SourceError, SourceResult};
use babel_assertions::TestCase;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

pub const GOOGLE_SHEETS_URL: &str = "https://docs.google.com/spreadsheets/d";

/// The shared Babel test sheet.
pub const DEFAULT_SHEET_ID: &str = "11zebx8Qs1Tc3ShQR9nh4HRW8QSoo8k65w_xIaftN0no";

/// Tab holding the test rows.
pub const TESTS_SHEET: &str = "Tests";

const FLAG_NEGATIVE: &str = "negative";
const CONFLATION_GENE_PROTEIN: &str = "gene_protein";
const CONFLATION_DRUG_CHEMICAL: &str = "drug_chemical";

/// A row exactly as exported; every column is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SheetRecord {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Passes in NodeNorm")]
    passes_in_nodenorm: String,
    #[serde(rename = "Passes in NameRes")]
    passes_in_nameres: String,
    #[serde(rename = "Flags")]
    flags: String,
    #[serde(rename = "Query Label")]
    query_label: String,
    #[serde(rename = "Query ID")]
    query_id: String,
    #[serde(rename = "Preferred ID")]
    preferred_id: String,
    #[serde(rename = "Additional IDs")]
    additional_ids: String,
    #[serde(rename = "Preferred Label")]
    preferred_label: String,
    #[serde(rename = "Additional Labels")]
    additional_labels: String,
    #[serde(rename = "Conflations")]
    conflations: String,
    #[serde(rename = "Biolink Classes")]
    biolink_classes: String,
    #[serde(rename = "Prefixes")]
    prefixes: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Source URL")]
    source_url: String,
    #[serde(rename = "Notes")]
    notes: String,
}

impl SheetRecord {
    fn is_blank(&self) -> bool {
        [
            &self.category,
            &self.passes_in_nodenorm,
            &self.passes_in_nameres,
            &self.flags,
            &self.query_label,
            &self.query_id,
            &self.preferred_id,
            &self.additional_ids,
            &self.preferred_label,
            &self.additional_labels,
            &self.conflations,
            &self.biolink_classes,
            &self.prefixes,
            &self.source,
            &self.source_url,
            &self.notes,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }

    fn into_test_row(self, id: String) -> TestRow {
        TestRow {
            id,
            category: self.category,
            expect_pass_in_nodenorm: is_yes(&self.passes_in_nodenorm),
            expect_pass_in_nameres: is_yes(&self.passes_in_nameres),
            flags: split_list(&self.flags),
            query_label: self.query_label,
            query_id: self.query_id,
            preferred_id: self.preferred_id,
            additional_ids: split_list(&self.additional_ids),
            preferred_label: self.preferred_label,
            additional_labels: split_list(&self.additional_labels),
            conflations: split_list(&self.conflations),
            biolink_classes: split_list(&self.biolink_classes),
            prefixes: split_list(&self.prefixes),
            source: self.source,
            source_url: self.source_url,
            notes: self.notes,
        }
    }
}

fn is_yes(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("y")
}

/// `a|b|c`, ignoring blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// One test row from the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRow {
    /// `Tests:row=7`, using the spreadsheet's own row number.
    pub id: String,
    pub category: String,
    pub expect_pass_in_nodenorm: bool,
    pub expect_pass_in_nameres: bool,
    pub flags: Vec<String>,
    pub query_label: String,
    pub query_id: String,
    pub preferred_id: String,
    pub additional_ids: Vec<String>,
    pub preferred_label: String,
    pub additional_labels: Vec<String>,
    pub conflations: Vec<String>,
    /// Biolink types; a leading `!` marks a type the clique must not have.
    pub biolink_classes: Vec<String>,
    pub prefixes: Vec<String>,
    pub source: String,
    pub source_url: String,
    pub notes: String,
}

impl TestRow {
    /// Rows flagged `negative` must not resolve at all.
    pub fn is_negative(&self) -> bool {
        self.flags.iter().any(|f| f.eq_ignore_ascii_case(FLAG_NEGATIVE))
    }

    /// Preferred ID first, then the query ID and additional IDs.
    pub fn query_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        push_unique(&mut ids, self.preferred_id.trim());
        push_unique(&mut ids, self.query_id.trim());
        for id in &self.additional_ids {
            push_unique(&mut ids, id);
        }
        ids
    }

    /// Labels that should find the preferred ID in NameRes.
    pub fn query_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        push_unique(&mut labels, self.query_label.trim());
        for label in &self.additional_labels {
            push_unique(&mut labels, label);
        }
        labels
    }

    fn is_conflated(&self) -> SourceResult<bool> {
        let unknown: Vec<&str> = self
            .conflations
            .iter()
            .map(String::as_str)
            .filter(|c| *c != CONFLATION_GENE_PROTEIN && *c != CONFLATION_DRUG_CHEMICAL)
            .collect();
        if !unknown.is_empty() {
            return Err(SourceError::InvalidRow {
                row: self.id.clone(),
                message: format!("unknown conflations: {}", unknown.join(", ")),
            });
        }
        Ok(!self.conflations.is_empty())
    }

    /// Test cases for NodeNorm.
    ///
    /// Every query ID must resolve together with the preferred ID and carry
    /// each listed Biolink type. Conflated rows only check that each ID
    /// resolves, since the assertions normalize without conflation.
    pub fn nodenorm_cases(&self) -> SourceResult<Vec<TestCase>> {
        let ids = self.query_ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        if self.is_negative() {
            return Ok(vec![
                TestCase::new("DoesNotResolve", vec![ids]).with_source(&self.id)
            ]);
        }

        if self.is_conflated()? {
            debug!(row = %self.id, conflations = ?self.conflations, "Only checking that conflated IDs resolve");
            return Ok(vec![TestCase::new("Resolves", vec![ids]).with_source(&self.id)]);
        }

        let mut cases = Vec::new();
        if self.preferred_id.trim().is_empty() || ids.len() == 1 {
            cases.push(TestCase::new("Resolves", vec![ids.clone()]).with_source(&self.id));
        } else {
            cases.push(TestCase::new("ResolvesWith", vec![ids.clone()]).with_source(&self.id));
        }

        let (excluded, required): (Vec<&String>, Vec<&String>) = self
            .biolink_classes
            .iter()
            .partition(|class| class.starts_with('!'));
        if !excluded.is_empty() {
            debug!(row = %self.id, ?excluded, "Excluded Biolink classes are not checked");
        }
        if !required.is_empty() {
            let param_sets = required
                .into_iter()
                .map(|class| {
                    let mut params = vec![class.clone()];
                    params.extend(ids.iter().cloned());
                    params
                })
                .collect();
            cases.push(TestCase::new("ResolvesWithType", param_sets).with_source(&self.id));
        }

        Ok(cases)
    }

    /// Test cases for NameRes: each label must find the preferred ID.
    pub fn nameres_cases(&self) -> Vec<TestCase> {
        let preferred = self.preferred_id.trim();
        if self.is_negative() || preferred.is_empty() {
            return Vec::new();
        }

        let param_sets: Vec<Vec<String>> = self
            .query_labels()
            .into_iter()
            .map(|label| vec![label, preferred.to_string()])
            .collect();
        if param_sets.is_empty() {
            return Vec::new();
        }
        vec![TestCase::new("SearchByName", param_sets).with_source(&self.id)]
    }
}

/// Parse a CSV export into test rows, skipping blank rows.
///
/// Row numbers count the header as row 1, matching the spreadsheet, and
/// blank rows still take up a number.
pub fn parse_test_rows(csv_text: &str, prefix: &str) -> SourceResult<Vec<TestRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<SheetRecord>().enumerate() {
        let record = record.map_err(|error| SourceError::InvalidCsv {
            origin: prefix.to_string(),
            error,
        })?;
        if record.is_blank() {
            continue;
        }
        rows.push(record.into_test_row(format!("{}:row={}", prefix, index + 2)));
    }

    debug!(prefix, count = rows.len(), "Parsed test rows");
    Ok(rows)
}

/// Number of rows in each category.
pub fn categories(rows: &[TestRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Read-only client for a sheet's CSV export.
pub struct GoogleSheet {
    client: Client,
    base_url: String,
    sheet_id: String,
    sheet_name: String,
}

impl GoogleSheet {
    pub fn new(sheet_id: &str) -> SourceResult<Self> {
        let client = Client::builder()
            .user_agent("babel-validate")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: GOOGLE_SHEETS_URL.to_string(),
            sheet_id: sheet_id.to_string(),
            sheet_name: TESTS_SHEET.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_sheet_name(mut self, sheet_name: &str) -> Self {
        self.sheet_name = sheet_name.to_string();
        self
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    /// The tab as CSV text.
    pub async fn fetch_csv(&self) -> SourceResult<String> {
        let url = format!("{}/{}/gviz/tq", self.base_url, self.sheet_id);
        info!(sheet = %self.sheet_id, tab = %self.sheet_name, "Downloading test rows from Google Sheet");

        let response = self
            .client
            .get(&url)
            .query(&[("tqx", "out:csv"), ("sheet", self.sheet_name.as_str())])
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, url, "Google Sheet request failed");
            Err(SourceError::Sheet {
                status: status.as_u16(),
                url,
                message,
            })
        }
    }

    pub async fn test_rows(&self) -> SourceResult<Vec<TestRow>> {
        let csv_text = self.fetch_csv().await?;
        let rows = parse_test_rows(&csv_text, &self.sheet_name)?;
        info!(sheet = %self.sheet_id, count = rows.len(), "Loaded test rows");
        Ok(rows)
    }
}
