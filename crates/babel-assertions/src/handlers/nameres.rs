//! Assertions evaluated against NameRes.

use crate::case::ParamSet;
use crate::error::AssertionResult;
use crate::handler::{AppliesTo, AssertionHandler, HandlerDoc};
use crate::result::ResultSink;
use async_trait::async_trait;
use babel_services::{LookupOptions, NameResClient, NodeNormClient, NormalizeOptions};

static SEARCH_BY_NAME_DOC: HandlerDoc = HandlerDoc {
    name: "searchbyname",
    display_name: "SearchByName",
    description: "Search NameRes for a name and check that the expected CURIE appears within the top N results. \
                  The expected CURIE is normalized through NodeNorm (with drug/chemical conflation) before \
                  comparison.",
    parameters: "A search query followed by the expected CURIE.",
    wiki_examples: &["{{BabelTest|SearchByName|diabetes|MONDO:0005015}}"],
    yaml_params: "    - [diabetes, MONDO:0005015]",
};

/// The expected CURIE must rank near the top when searching by name.
pub struct SearchByName;

#[async_trait]
impl AssertionHandler for SearchByName {
    fn doc(&self) -> &'static HandlerDoc {
        &SEARCH_BY_NAME_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::NameRes
    }

    async fn test_with_nameres(
        &self,
        param_sets: &[ParamSet],
        nodenorm: &NodeNormClient,
        nameres: &NameResClient,
        pass_if_found_in_top: usize,
        label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        let normalize = NormalizeOptions::with_drug_chemical_conflation();
        let limit = u32::try_from(pass_if_found_in_top.saturating_mul(2)).unwrap_or(u32::MAX);
        let search = LookupOptions::exact(limit);

        for params in param_sets {
            let [query, expected_curie, ..] = params.as_slice() else {
                sink.fail(format!(
                    "Two parameters expected for SearchByName in {}, but params = {:?}",
                    label, params
                ));
                continue;
            };

            let Some(expected) = nodenorm.lookup_one(expected_curie, &normalize).await? else {
                sink.fail(format!(
                    "Unable to normalize CURIE {} in {}",
                    expected_curie, label
                ));
                continue;
            };
            let expected_id = expected.identifier();
            let expected_desc = format!(
                "Expected CURIE {}, normalized to {} '{}'",
                expected_curie,
                expected_id,
                expected.label()
            );

            let results = nameres.lookup(query, &search).await?;
            if results.is_empty() {
                sink.fail(format!(
                    "No results found for '{}' on NameRes {} ({})",
                    query, nameres, expected_desc
                ));
                continue;
            }

            let Some(found_index) = results.iter().position(|r| r.curie == expected_id) else {
                sink.fail(format!(
                    "{} not found when searching for '{}' in NameRes {}: {}",
                    expected_desc,
                    query,
                    nameres,
                    serde_json::to_string_pretty(&results).unwrap_or_default()
                ));
                continue;
            };

            // Inclusive: index == top still passes.
            if found_index <= pass_if_found_in_top {
                sink.pass(format!(
                    "{} found at index {} on NameRes {}",
                    expected_desc,
                    found_index + 1,
                    nameres
                ));
            } else {
                sink.fail(format!(
                    "{} found at index {} which is greater than {} on NameRes {}",
                    expected_desc,
                    found_index + 1,
                    pass_if_found_in_top,
                    nameres
                ));
            }
        }

        Ok(())
    }
}
