//! Assertions evaluated against NodeNorm.

use crate::case::ParamSet;
use crate::error::AssertionResult;
use crate::handler::{AppliesTo, AssertionHandler, HandlerDoc};
use crate::result::ResultSink;
use async_trait::async_trait;
use babel_services::{NodeNormClient, NormalizedNode};

/// Fill the cache for every CURIE in every parameter set with one batch.
async fn warm_cache(nodenorm: &NodeNormClient, param_sets: &[ParamSet]) -> AssertionResult<()> {
    let curies: Vec<&str> = param_sets.iter().flatten().map(String::as_str).collect();
    if !curies.is_empty() {
        nodenorm.normalize_curies(&curies).await?;
    }
    Ok(())
}

fn pretty(node: &NormalizedNode) -> String {
    serde_json::to_string_pretty(node).unwrap_or_else(|_| node.summary())
}

static RESOLVES_DOC: HandlerDoc = HandlerDoc {
    name: "resolves",
    display_name: "Resolves",
    description: "Each CURIE in each param_set must resolve to a non-null result in NodeNorm.",
    parameters: "One or more CURIEs.",
    wiki_examples: &["{{BabelTest|Resolves|MONDO:0005015}}"],
    yaml_params: "    - MONDO:0005015\n    - [DOID:9351, CHEBI:15365]",
};

/// Every CURIE must resolve.
pub struct Resolves;

#[async_trait]
impl AssertionHandler for Resolves {
    fn doc(&self) -> &'static HandlerDoc {
        &RESOLVES_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::NodeNorm
    }

    async fn test_with_nodenorm(
        &self,
        param_sets: &[ParamSet],
        nodenorm: &NodeNormClient,
        label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        warm_cache(nodenorm, param_sets).await?;

        for (index, curies) in param_sets.iter().enumerate() {
            if curies.is_empty() {
                sink.fail(format!(
                    "No parameters provided in paramset {} in {}",
                    index, label
                ));
                continue;
            }

            for curie in curies {
                match nodenorm.normalize_curie(curie).await? {
                    Some(node) => sink.pass(format!(
                        "Resolved {} to {} with NodeNormalization service {}",
                        curie,
                        node.summary(),
                        nodenorm
                    )),
                    None => sink.fail(format!(
                        "Could not resolve {} with NodeNormalization service {}",
                        curie, nodenorm
                    )),
                }
            }
        }

        Ok(())
    }
}

static DOES_NOT_RESOLVE_DOC: HandlerDoc = HandlerDoc {
    name: "doesnotresolve",
    display_name: "DoesNotResolve",
    description: "Each CURIE in each param_set must fail to resolve (return null) in NodeNorm.",
    parameters: "One or more CURIEs.",
    wiki_examples: &["{{BabelTest|DoesNotResolve|NOTAREALPREFIX:12345}}"],
    yaml_params: "    - NOTAREALPREFIX:12345",
};

/// Every CURIE must fail to resolve.
pub struct DoesNotResolve;

#[async_trait]
impl AssertionHandler for DoesNotResolve {
    fn doc(&self) -> &'static HandlerDoc {
        &DOES_NOT_RESOLVE_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::NodeNorm
    }

    async fn test_with_nodenorm(
        &self,
        param_sets: &[ParamSet],
        nodenorm: &NodeNormClient,
        label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        warm_cache(nodenorm, param_sets).await?;

        for (index, curies) in param_sets.iter().enumerate() {
            if curies.is_empty() {
                sink.fail(format!(
                    "No parameters provided in paramset {} in {}",
                    index, label
                ));
                continue;
            }

            for curie in curies {
                match nodenorm.normalize_curie(curie).await? {
                    None => sink.pass(format!(
                        "Could not resolve {} with NodeNormalization service {} as expected",
                        curie, nodenorm
                    )),
                    Some(node) => sink.fail(format!(
                        "Resolved {} to {} with NodeNormalization service {}, but expected not to resolve",
                        curie,
                        node.summary(),
                        nodenorm
                    )),
                }
            }
        }

        Ok(())
    }
}

static RESOLVES_WITH_DOC: HandlerDoc = HandlerDoc {
    name: "resolveswith",
    display_name: "ResolvesWith",
    description: "All CURIEs within each param_set must resolve to the identical normalized result. \
                  Use this to assert that two identifiers are equivalent.",
    parameters: "Two or more CURIEs that should be equivalent.",
    wiki_examples: &["{{BabelTest|ResolvesWith|MONDO:0005015|DOID:9351}}"],
    yaml_params: "    - [MONDO:0005015, DOID:9351]",
};

/// All CURIEs in a set must resolve to the same record.
pub struct ResolvesWith;

#[async_trait]
impl AssertionHandler for ResolvesWith {
    fn doc(&self) -> &'static HandlerDoc {
        &RESOLVES_WITH_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::NodeNorm
    }

    async fn test_with_nodenorm(
        &self,
        param_sets: &[ParamSet],
        nodenorm: &NodeNormClient,
        label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        warm_cache(nodenorm, param_sets).await?;

        for (index, curies) in param_sets.iter().enumerate() {
            if curies.is_empty() {
                sink.fail(format!(
                    "No parameters provided in paramset {} in {}",
                    index, label
                ));
                continue;
            }

            let results = nodenorm.normalize_curies(curies).await?;
            let resolved = |curie: &String| results.get(curie).and_then(Option::as_ref);

            // The first CURIE that resolves is the reference for the rest.
            let Some(expected) = curies.iter().find_map(resolved) else {
                sink.fail(format!(
                    "None of the CURIEs {:?} could be resolved on {}",
                    curies, nodenorm
                ));
                continue;
            };

            for curie in curies {
                match resolved(curie) {
                    None => sink.fail(format!(
                        "CURIE {} could not be resolved, and so is not equal to the expected result {} on {}",
                        curie,
                        pretty(expected),
                        nodenorm
                    )),
                    Some(node) if node == expected => sink.pass(format!(
                        "Resolved {} to the expected result {} on {}",
                        curie,
                        pretty(expected),
                        nodenorm
                    )),
                    Some(node) => sink.fail(format!(
                        "Resolved {} to {}, but expected {} on {}",
                        curie,
                        node.summary(),
                        expected.summary(),
                        nodenorm
                    )),
                }
            }
        }

        Ok(())
    }
}

static RESOLVES_WITH_TYPE_DOC: HandlerDoc = HandlerDoc {
    name: "resolveswithtype",
    display_name: "ResolvesWithType",
    description: "Each param_set must have at least two elements: the first is the expected Biolink type \
                  (e.g. 'biolink:Gene'), and the remainder are CURIEs that must resolve with that type.",
    parameters: "A Biolink type followed by one or more CURIEs.",
    wiki_examples: &["{{BabelTest|ResolvesWithType|biolink:Gene|NCBIGene:1756}}"],
    yaml_params: "    - [biolink:Gene, NCBIGene:1756, HGNC:2928]",
};

/// Every CURIE must resolve to a record carrying the expected Biolink type.
pub struct ResolvesWithType;

#[async_trait]
impl AssertionHandler for ResolvesWithType {
    fn doc(&self) -> &'static HandlerDoc {
        &RESOLVES_WITH_TYPE_DOC
    }

    fn applies_to(&self) -> AppliesTo {
        AppliesTo::NodeNorm
    }

    async fn test_with_nodenorm(
        &self,
        param_sets: &[ParamSet],
        nodenorm: &NodeNormClient,
        label: &str,
        sink: &mut ResultSink,
    ) -> AssertionResult<()> {
        for (index, params) in param_sets.iter().enumerate() {
            let [expected_type, curies @ ..] = params.as_slice() else {
                sink.fail(format!(
                    "Too few parameters provided in param set {} in {}: {:?}",
                    index, label, params
                ));
                continue;
            };
            if curies.is_empty() {
                sink.fail(format!(
                    "Too few parameters provided in param set {} in {}: {:?}",
                    index, label, params
                ));
                continue;
            }

            let results = nodenorm.normalize_curies(curies).await?;
            for curie in curies {
                match results.get(curie).and_then(Option::as_ref) {
                    None => sink.fail(format!(
                        "CURIE {} could not be resolved on {}, so it cannot have expected Biolink type {}",
                        curie, nodenorm, expected_type
                    )),
                    Some(node) if node.has_type(expected_type) => sink.pass(format!(
                        "Biolink types {:?} for CURIE {} includes expected Biolink type {}",
                        node.types, curie, expected_type
                    )),
                    Some(node) => sink.fail(format!(
                        "Biolink types {:?} for CURIE {} does not include expected Biolink type {}",
                        node.types, curie, expected_type
                    )),
                }
            }
        }

        Ok(())
    }
}
