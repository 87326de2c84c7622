//! Assertions that apply to both services.

use crate::case::ParamSet;
use crate::error::AssertionResult;
use crate::handler::{AppliesTo, AssertionHandler, HandlerDoc};
use crate::result::ResultSink;
use async_trait::async_trait;
use babel_services::{NameResClient, NodeNormClient};

const NEEDED_MESSAGE: &str = "Test needed for issue";

static NEEDED_DOC: HandlerDoc = HandlerDoc {
    name: "needed",
    display_name: "Needed",
    description: "Marks an issue as needing a test. Always fails, once for each service, until \
                  it is replaced by a real assertion.",
    parameters: "None.",
    wiki_examples: &["{{BabelTest|Needed|diabetes should resolve to MONDO:0005015}}"],
    yaml_params: "    - []",
};

/// Placeholder that reminds maintainers an issue still lacks a real test.
pub struct Needed;

#[async_trait]
impl AssertionHandler for Needed {
    fn doc(&self) -> &'static HandlerDoc {
        &NEEDED_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::Both
    }

    fn requires_parameters(&self) -> bool {
        false
    }

    async fn test_with_nodenorm(
        &self,
        _param_sets: &[ParamSet],
        _nodenorm: &NodeNormClient,
        _label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        sink.fail(NEEDED_MESSAGE);
        Ok(())
    }

    async fn test_with_nameres(
        &self,
        _param_sets: &[ParamSet],
        _nodenorm: &NodeNormClient,
        _nameres: &NameResClient,
        _pass_if_found_in_top: usize,
        _label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        sink.fail(NEEDED_MESSAGE);
        Ok(())
    }
}
