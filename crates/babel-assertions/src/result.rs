//! Test results produced by assertion handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Test status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
            TestStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of checking one identifier or one parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub status: TestStatus,
    pub message: String,
}

impl TestResult {
    /// Create a passed test result
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Passed,
            message: message.into(),
        }
    }

    /// Create a failed test result
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            message: message.into(),
        }
    }

    /// Create a skipped test result
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TestStatus::Failed
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

/// Collects the results a handler produces for one evaluation.
#[derive(Debug, Default)]
pub struct ResultSink {
    results: Vec<TestResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.push(TestResult::passed(message));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.push(TestResult::failed(message));
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Hand the results over, substituting a failure if nothing was produced.
    pub fn finish(mut self, label: &str) -> Vec<TestResult> {
        if self.results.is_empty() {
            self.fail(format!("No test results returned in {}", label));
        }
        self.results
    }
}
