//! Test cases: an assertion name plus its parameter sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The literal arguments for one instantiation of an assertion.
pub type ParamSet = Vec<String>;

/// One discovered test declaration.
///
/// All parameter sets must hold for the test case to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Assertion name as written; matched case-insensitively.
    pub assertion: String,

    pub param_sets: Vec<ParamSet>,

    /// Where the declaration came from, e.g. `NCATSTranslator/Babel#123`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TestCase {
    pub fn new(assertion: impl Into<String>, param_sets: Vec<ParamSet>) -> Self {
        Self {
            assertion: assertion.into(),
            param_sets,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Human-readable label handed to handlers for their messages.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}: ", source)?;
        }
        let params = serde_json::to_string(&self.param_sets).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{}({} param sets: {})",
            self.assertion,
            self.param_sets.len(),
            params
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_source() {
        let case = TestCase::new(
            "ResolvesWith",
            vec![vec!["MONDO:0005015".into(), "DOID:9351".into()]],
        )
        .with_source("NCATSTranslator/Babel#12");
        assert_eq!(
            case.label(),
            r#"NCATSTranslator/Babel#12: ResolvesWith(1 param sets: [["MONDO:0005015","DOID:9351"]])"#
        );
    }

    #[test]
    fn test_label_without_source() {
        let case = TestCase::new("needed", vec![]);
        assert_eq!(case.label(), "needed(0 param sets: [])");
    }
}
