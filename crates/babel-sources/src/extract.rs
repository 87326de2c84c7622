//! Test declarations embedded in issue bodies.
//!
//! Two forms are recognised. The wiki form declares one test case with one
//! parameter set per occurrence:
//!
//! ```text
//! {{BabelTest|ResolvesWith|MONDO:0005015|DOID:9351}}
//! ```
//!
//! The YAML form declares any number of assertions, each with a list of
//! parameter sets; a bare scalar is a one-element parameter set:
//!
//! ````text
//! ```yaml
//! babel_tests:
//!   Resolves:
//!     - MONDO:0005015
//!   ResolvesWith:
//!     - [MONDO:0005015, DOID:9351]
//! ```
//! ````
//!
//! Wiki declarations come first, in document order, followed by the
//! assertions of each YAML block in the order they are written.

use crate::error::{SourceError, SourceResult};
use babel_assertions::{ParamSet, TestCase};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;
use tracing::{debug, info};

static WIKI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{BabelTest\|.*?\}\}").expect("wiki pattern is valid"));

static YAML_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```yaml\s+babel_tests:\s+.*?\s+```").expect("yaml pattern is valid")
});

/// Whether `body` contains any test declaration, without parsing it.
pub fn has_test_declarations(body: &str) -> bool {
    WIKI_PATTERN.is_match(body) || YAML_PATTERN.is_match(body)
}

/// Extract every test case declared in `body`, tagging each with `origin`.
pub fn extract_test_cases(body: &str, origin: &str) -> SourceResult<Vec<TestCase>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut cases = Vec::new();

    for found in WIKI_PATTERN.find_iter(body) {
        info!(origin, declaration = found.as_str(), "Found BabelTest");
        cases.push(parse_wiki(found.as_str(), origin)?);
    }

    for found in YAML_PATTERN.find_iter(body) {
        info!(origin, "Found BabelTest YAML block");
        cases.extend(parse_yaml_block(found.as_str(), origin)?);
    }

    debug!(origin, count = cases.len(), "Extracted test cases");
    Ok(cases)
}

fn parse_wiki(declaration: &str, origin: &str) -> SourceResult<TestCase> {
    let inner = declaration
        .strip_prefix("{{BabelTest|")
        .unwrap_or(declaration);
    let inner = inner.strip_suffix("}}").unwrap_or(inner);

    let mut parts = inner.split('|').map(str::to_string);
    let assertion = parts.next().unwrap_or_default();
    let params: ParamSet = parts.collect();
    if params.is_empty() {
        return Err(SourceError::InvalidDeclaration {
            origin: origin.to_string(),
            message: format!("too few parameters in {}", declaration),
        });
    }

    Ok(TestCase::new(assertion, vec![params]).with_source(origin))
}

fn parse_yaml_block(block: &str, origin: &str) -> SourceResult<Vec<TestCase>> {
    let yaml = block.strip_prefix("```yaml").unwrap_or(block);
    let yaml = yaml.strip_suffix("```").unwrap_or(yaml);

    let document: Value = serde_yaml::from_str(yaml).map_err(|error| SourceError::InvalidYaml {
        origin: origin.to_string(),
        error,
    })?;

    let invalid = |message: String| SourceError::InvalidDeclaration {
        origin: origin.to_string(),
        message,
    };

    let tests = match document.get("babel_tests") {
        Some(Value::Mapping(tests)) => tests,
        Some(other) => {
            return Err(invalid(format!(
                "babel_tests must be a mapping of assertion names, found {}",
                describe(other)
            )))
        }
        None => return Err(invalid("missing babel_tests mapping".to_string())),
    };

    let mut cases = Vec::with_capacity(tests.len());
    for (name, entries) in tests {
        let assertion = scalar_to_string(name)
            .ok_or_else(|| invalid(format!("assertion name must be a string, found {}", describe(name))))?;

        let param_sets = match entries {
            Value::Null => Vec::new(),
            Value::Sequence(entries) => entries
                .iter()
                .map(|entry| param_set(entry).ok_or_else(|| {
                    invalid(format!(
                        "unknown parameter set type {} for {}",
                        describe(entry),
                        assertion
                    ))
                }))
                .collect::<SourceResult<Vec<_>>>()?,
            other => {
                return Err(invalid(format!(
                    "parameter sets for {} must be a list, found {}",
                    assertion,
                    describe(other)
                )))
            }
        };

        cases.push(TestCase::new(assertion, param_sets).with_source(origin));
    }

    Ok(cases)
}

/// A scalar becomes a one-element set; a list of scalars becomes a set.
fn param_set(entry: &Value) -> Option<ParamSet> {
    match entry {
        Value::Sequence(items) => items.iter().map(scalar_to_string).collect(),
        scalar => scalar_to_string(scalar).map(|s| vec![s]),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
