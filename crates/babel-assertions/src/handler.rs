//! The assertion handler contract.
//!
//! A handler evaluates parameter sets against NodeNorm, NameRes, or both,
//! depending on its [`AppliesTo`] capability. Handlers push results into a
//! [`ResultSink`]; the [`evaluate_nodenorm`] and [`evaluate_nameres`]
//! wrappers enforce the rules every handler shares:
//!
//! - a handler that does not cover a service produces nothing for it
//! - an empty parameter list produces exactly one failure
//! - a handler that produces nothing is reported as one failure

use crate::case::ParamSet;
use crate::error::AssertionResult;
use crate::result::{ResultSink, TestResult};
use async_trait::async_trait;
use babel_services::{NameResClient, NodeNormClient};
use serde::Serialize;
use std::fmt;

/// Which services an assertion is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppliesTo {
    NodeNorm,
    NameRes,
    Both,
}

impl AppliesTo {
    pub fn covers_nodenorm(self) -> bool {
        matches!(self, AppliesTo::NodeNorm | AppliesTo::Both)
    }

    pub fn covers_nameres(self) -> bool {
        matches!(self, AppliesTo::NameRes | AppliesTo::Both)
    }
}

impl fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliesTo::NodeNorm => write!(f, "NodeNorm"),
            AppliesTo::NameRes => write!(f, "NameRes"),
            AppliesTo::Both => write!(f, "NodeNorm and NameRes"),
        }
    }
}

/// Static documentation for one assertion type.
#[derive(Debug, Clone, Copy)]
pub struct HandlerDoc {
    /// Lowercase registry name.
    pub name: &'static str,
    /// CamelCase name used in issue bodies and docs.
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: &'static str,
    pub wiki_examples: &'static [&'static str],
    /// YAML list items shown under `babel_tests: <DisplayName>:`.
    pub yaml_params: &'static str,
}

/// An assertion type that can be embedded in an issue body.
#[async_trait]
pub trait AssertionHandler: Send + Sync {
    fn doc(&self) -> &'static HandlerDoc;

    fn applies_to(&self) -> AppliesTo;

    fn name(&self) -> &'static str {
        self.doc().name
    }

    /// Whether an empty parameter list is a failure before the handler runs.
    fn requires_parameters(&self) -> bool {
        true
    }

    async fn test_with_nodenorm(
        &self,
        _param_sets: &[ParamSet],
        _nodenorm: &NodeNormClient,
        _label: &str,
        _sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        Ok(())
    }

    async fn test_with_nameres(
        &self,
        _param_sets: &[ParamSet],
        _nodenorm: &NodeNormClient,
        _nameres: &NameResClient,
        _pass_if_found_in_top: usize,
        _label: &str,
        _sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        Ok(())
    }
}

fn missing_parameters(label: &str) -> Vec<TestResult> {
    vec![TestResult::failed(format!("No parameters provided in {}", label))]
}

/// Evaluate `handler` against NodeNorm under the shared contract.
pub async fn evaluate_nodenorm(
    handler: &dyn AssertionHandler,
    param_sets: &[ParamSet],
    nodenorm: &NodeNormClient,
    label: &str,
) -> AssertionResult<Vec<TestResult>> {
    if !handler.applies_to().covers_nodenorm() {
        return Ok(Vec::new());
    }
    if handler.requires_parameters() && param_sets.is_empty() {
        return Ok(missing_parameters(label));
    }

    let mut sink = ResultSink::new();
    handler
        .test_with_nodenorm(param_sets, nodenorm, label, &mut sink)
        .await?;
    Ok(sink.finish(label))
}

/// Evaluate `handler` against NameRes under the shared contract.
pub async fn evaluate_nameres(
    handler: &dyn AssertionHandler,
    param_sets: &[ParamSet],
    nodenorm: &NodeNormClient,
    nameres: &NameResClient,
    pass_if_found_in_top: usize,
    label: &str,
) -> AssertionResult<Vec<TestResult>> {
    if !handler.applies_to().covers_nameres() {
        return Ok(Vec::new());
    }
    if handler.requires_parameters() && param_sets.is_empty() {
        return Ok(missing_parameters(label));
    }

    let mut sink = ResultSink::new();
    handler
        .test_with_nameres(
            param_sets,
            nodenorm,
            nameres,
            pass_if_found_in_top,
            label,
            &mut sink,
        )
        .await?;
    Ok(sink.finish(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{nameres_client, nodenorm_client, StaticNameRes, StaticNodeNorm};
    use std::sync::Arc;

    static SILENT_DOC: HandlerDoc = HandlerDoc {
        name: "silent",
        display_name: "Silent",
        description: "Produces nothing.",
        parameters: "",
        wiki_examples: &[],
        yaml_params: "",
    };

    /// Handler that never pushes a result.
    struct Silent;

    #[async_trait]
    impl AssertionHandler for Silent {
        fn doc(&self) -> &'static HandlerDoc {
            &SILENT_DOC
        }

        fn applies_to(&self) -> AppliesTo {
            AppliesTo::NodeNorm
        }

        async fn test_with_nodenorm(
            &self,
            _param_sets: &[ParamSet],
            _nodenorm: &NodeNormClient,
            _label: &str,
            _sink: &mut ResultSink,
        ) -> AssertionResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_applies_to_coverage() {
        assert!(AppliesTo::NodeNorm.covers_nodenorm());
        assert!(!AppliesTo::NodeNorm.covers_nameres());
        assert!(AppliesTo::NameRes.covers_nameres());
        assert!(!AppliesTo::NameRes.covers_nodenorm());
        assert!(AppliesTo::Both.covers_nodenorm() && AppliesTo::Both.covers_nameres());
    }

    #[tokio::test]
    async fn test_silent_handler_reports_failure() {
        let nodenorm = nodenorm_client(Arc::new(StaticNodeNorm::new()));
        let params = vec![vec!["MONDO:0005015".to_string()]];
        let results = evaluate_nodenorm(&Silent, &params, &nodenorm, "case")
            .await
            .unwrap();
        assert_eq!(results, vec![TestResult::failed("No test results returned in case")]);
    }

    #[tokio::test]
    async fn test_empty_param_sets_fail_once() {
        let nodenorm = nodenorm_client(Arc::new(StaticNodeNorm::new()));
        let results = evaluate_nodenorm(&Silent, &[], &nodenorm, "case").await.unwrap();
        assert_eq!(results, vec![TestResult::failed("No parameters provided in case")]);
    }

    #[tokio::test]
    async fn test_uncovered_service_yields_nothing() {
        let backend = Arc::new(StaticNodeNorm::new());
        let nodenorm = nodenorm_client(backend.clone());
        let nameres = nameres_client(Arc::new(StaticNameRes::new()));
        let params = vec![vec!["x".to_string()]];
        let results = evaluate_nameres(&Silent, &params, &nodenorm, &nameres, 5, "case")
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(backend.calls().is_empty());
    }
}
