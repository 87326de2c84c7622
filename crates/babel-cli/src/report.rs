//! Validation reporting

use babel_assertions::{TestResult, TestStatus};
use babel_sources::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the results of an entry are expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Closed issues and ad hoc test cases.
    Pass,
    /// Open issues: the bug is presumably still there.
    Fail,
}

/// How an entry turned out, relative to its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    /// A backend call failed or a declaration could not be evaluated.
    Errored,
    /// Nothing decisive was produced.
    Skipped,
    /// Failed as expected.
    ExpectedFailure,
    /// Expected to fail, but every result passed.
    UnexpectedPass,
}

impl Outcome {
    /// Classify non-errored results. Skipped results never decide the outcome.
    pub fn classify(expectation: Expectation, results: &[TestResult]) -> Self {
        let mut decisive = results.iter().filter(|r| r.status != TestStatus::Skipped);
        let Some(first) = decisive.next() else {
            return Outcome::Skipped;
        };
        let failed = first.is_failed() || decisive.any(TestResult::is_failed);

        match (expectation, failed) {
            (Expectation::Pass, false) => Outcome::Passed,
            (Expectation::Pass, true) => Outcome::Failed,
            (Expectation::Fail, true) => Outcome::ExpectedFailure,
            (Expectation::Fail, false) => Outcome::UnexpectedPass,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Outcome::Passed => "✓",
            Outcome::Failed => "✗",
            Outcome::Errored => "!",
            Outcome::Skipped => "○",
            Outcome::ExpectedFailure => "x",
            Outcome::UnexpectedPass => "X",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Errored => "errored",
            Outcome::Skipped => "skipped",
            Outcome::ExpectedFailure => "expected failure",
            Outcome::UnexpectedPass => "unexpected pass",
        };
        write!(f, "{}", s)
    }
}

/// Results of one test case on one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub case: String,
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One issue, or one ad hoc test case, evaluated on one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub target: String,
    pub name: String,
    pub expectation: Expectation,
    pub outcome: Outcome,
    pub cases: Vec<CaseReport>,
    /// An unexpected pass counts as a failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReportEntry {
    /// Build an entry, deciding its outcome from the case reports.
    pub fn new(
        target: impl Into<String>,
        name: impl Into<String>,
        expectation: Expectation,
        cases: Vec<CaseReport>,
    ) -> Self {
        let name = name.into();
        let outcome = if cases.iter().any(|c| c.error.is_some()) {
            Outcome::Errored
        } else {
            let results: Vec<TestResult> =
                cases.iter().flat_map(|c| c.results.iter().cloned()).collect();
            Outcome::classify(expectation, &results)
        };

        Self {
            target: target.into(),
            name,
            expectation,
            outcome,
            cases,
            strict: false,
            note: None,
        }
    }

    /// Hold the entry to its expectation in both directions.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        if strict && self.outcome == Outcome::UnexpectedPass {
            self.note = Some(format!(
                "{} is expected to fail but passed; update its expectation",
                self.name
            ));
        }
        self
    }

    /// Point out issues whose state no longer matches their tests.
    pub fn with_issue_note(mut self) -> Self {
        self.note = match (self.expectation, self.outcome) {
            (Expectation::Fail, Outcome::UnexpectedPass) => Some(format!(
                "{} is still open but all of its tests pass; consider closing it",
                self.name
            )),
            (Expectation::Pass, Outcome::Failed) => Some(format!(
                "{} is closed but its tests fail; consider reopening it",
                self.name
            )),
            _ => None,
        };
        self
    }

    /// Failures count against the run only when they were not expected.
    pub fn is_failure(&self) -> bool {
        match self.outcome {
            Outcome::Failed => true,
            Outcome::Errored => self.expectation == Expectation::Pass,
            Outcome::UnexpectedPass => self.strict,
            _ => false,
        }
    }
}

/// Target a report was produced against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub name: String,
    pub nodenorm_url: String,
    pub nameres_url: String,
}

impl TargetInfo {
    pub fn new(name: &str, target: &Target) -> Self {
        Self {
            name: name.to_string(),
            nodenorm_url: target.nodenorm_url.clone(),
            nameres_url: target.nameres_url.clone(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub unexpected_passes: usize,
    pub success: bool,
}

/// Complete validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub targets: Vec<TargetInfo>,
    pub entries: Vec<ReportEntry>,
    pub summary: ReportSummary,
}

impl ValidationReport {
    pub fn new(targets: Vec<TargetInfo>) -> Self {
        Self {
            timestamp: Utc::now(),
            duration_ms: 0,
            targets,
            entries: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Compute the summary.
    pub fn finalize(&mut self, duration_ms: u64) {
        let mut summary = ReportSummary {
            total: self.entries.len(),
            ..Default::default()
        };

        for entry in &self.entries {
            match entry.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed => summary.failed += 1,
                Outcome::Errored => summary.errored += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::ExpectedFailure => summary.expected_failures += 1,
                Outcome::UnexpectedPass => summary.unexpected_passes += 1,
            }
        }
        summary.success = !self.entries.iter().any(ReportEntry::is_failure);

        self.duration_ms = duration_ms;
        self.summary = summary;
    }

    pub fn is_success(&self) -> bool {
        self.summary.success
    }

    /// Generate a text report
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Babel Validation Report\n");
        output.push_str(&format!(
            "Timestamp: {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Duration: {}ms\n", self.duration_ms));
        for target in &self.targets {
            output.push_str(&format!(
                "Target {}: NodeNorm {}, NameRes {}\n",
                target.name, target.nodenorm_url, target.nameres_url
            ));
        }
        output.push('\n');

        for entry in &self.entries {
            output.push_str(&format!(
                "{} [{}] {} ({})\n",
                entry.outcome.icon(),
                entry.target,
                entry.name,
                entry.outcome
            ));
            for case in &entry.cases {
                if case.case != entry.name {
                    output.push_str(&format!("    {}\n", case.case));
                }
                if let Some(error) = &case.error {
                    output.push_str(&format!("      Error: {}\n", error));
                }
                for result in &case.results {
                    output.push_str(&format!("      {}\n", result));
                }
            }
            if let Some(note) = &entry.note {
                output.push_str(&format!("    Note: {}\n", note));
            }
        }

        let s = &self.summary;
        output.push_str(&format!(
            "\nTotal: {}  Passed: {}  Failed: {}  Errored: {}  Skipped: {}  Expected failures: {}  Unexpected passes: {}\n",
            s.total, s.passed, s.failed, s.errored, s.skipped, s.expected_failures, s.unexpected_passes
        ));
        output.push_str(if s.success {
            "Result: ✓ PASSED\n"
        } else {
            "Result: ✗ FAILED\n"
        });

        output
    }

    /// Generate JSON report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Generate YAML report
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
