//! Evaluation driver: dispatches test cases to their handlers.

use crate::case::TestCase;
use crate::error::{AssertionError, AssertionResult};
use crate::handler::{self, AssertionHandler};
use crate::registry::AssertionRegistry;
use crate::result::TestResult;
use babel_services::{NameResClient, NodeNormClient};
use std::sync::Arc;
use tracing::debug;

/// How far down the NameRes ranking an expected CURIE may appear by default.
pub const DEFAULT_PASS_IF_FOUND_IN_TOP: usize = 5;

/// Runs test cases against NodeNorm and NameRes.
#[derive(Clone)]
pub struct Evaluator {
    registry: AssertionRegistry,
    pass_if_found_in_top: usize,
}

impl Evaluator {
    pub fn new(registry: AssertionRegistry) -> Self {
        Self {
            registry,
            pass_if_found_in_top: DEFAULT_PASS_IF_FOUND_IN_TOP,
        }
    }

    pub fn with_pass_if_found_in_top(mut self, top: usize) -> Self {
        self.pass_if_found_in_top = top;
        self
    }

    pub fn registry(&self) -> &AssertionRegistry {
        &self.registry
    }

    pub fn pass_if_found_in_top(&self) -> usize {
        self.pass_if_found_in_top
    }

    /// Resolve the handler for `case`, before any network call is made.
    pub fn handler_for(&self, case: &TestCase) -> AssertionResult<&Arc<dyn AssertionHandler>> {
        self.registry
            .get(&case.assertion)
            .ok_or_else(|| AssertionError::UnknownAssertion {
                assertion: case.assertion.clone(),
                label: case.label(),
            })
    }

    pub async fn evaluate_nodenorm(
        &self,
        case: &TestCase,
        nodenorm: &NodeNormClient,
    ) -> AssertionResult<Vec<TestResult>> {
        let handler = self.handler_for(case)?;
        debug!(assertion = handler.name(), case = %case, "Evaluating against {}", nodenorm);
        handler::evaluate_nodenorm(handler.as_ref(), &case.param_sets, nodenorm, &case.label())
            .await
    }

    pub async fn evaluate_nameres(
        &self,
        case: &TestCase,
        nodenorm: &NodeNormClient,
        nameres: &NameResClient,
    ) -> AssertionResult<Vec<TestResult>> {
        let handler = self.handler_for(case)?;
        debug!(assertion = handler.name(), case = %case, "Evaluating against {}", nameres);
        handler::evaluate_nameres(
            handler.as_ref(),
            &case.param_sets,
            nodenorm,
            nameres,
            self.pass_if_found_in_top,
            &case.label(),
        )
        .await
    }

    /// NodeNorm results followed by NameRes results.
    pub async fn evaluate(
        &self,
        case: &TestCase,
        nodenorm: &NodeNormClient,
        nameres: &NameResClient,
    ) -> AssertionResult<Vec<TestResult>> {
        let mut results = self.evaluate_nodenorm(case, nodenorm).await?;
        results.extend(self.evaluate_nameres(case, nodenorm, nameres).await?);
        Ok(results)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(AssertionRegistry::builtin())
    }
}
