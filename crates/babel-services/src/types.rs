//! Wire types for the NodeNorm and NameRes services.
//!
//! Only the fields the assertions read are typed; everything else the
//! services return is kept verbatim in `extra`, so two records compare equal
//! only when the whole upstream record matches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One identifier inside a normalized clique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIdentifier {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A NodeNorm result for one queried CURIE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    /// The canonical (preferred) identifier of the clique.
    pub id: NodeIdentifier,

    #[serde(default)]
    pub equivalent_identifiers: Vec<NodeIdentifier>,

    /// Biolink types, most specific first.
    #[serde(rename = "type", default)]
    pub types: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedNode {
    pub fn identifier(&self) -> &str {
        &self.id.identifier
    }

    pub fn label(&self) -> &str {
        self.id.label.as_deref().unwrap_or("")
    }

    /// Most specific Biolink type, or an empty string if NodeNorm sent none.
    pub fn primary_type(&self) -> &str {
        self.types.first().map(String::as_str).unwrap_or("")
    }

    pub fn has_type(&self, biolink_type: &str) -> bool {
        self.types.iter().any(|t| t == biolink_type)
    }

    /// `"ID (type, "label")"`, the form used in assertion messages.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, \"{}\")",
            self.identifier(),
            self.primary_type(),
            self.label()
        )
    }
}

/// One ranked hit from NameRes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub curie: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flags sent along with a NodeNorm `get_normalized_nodes` request.
///
/// Unset flags are left out of the request body so the service default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeOptions {
    /// Gene/protein conflation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_chemical_conflate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_types: Option<bool>,
}

impl NormalizeOptions {
    pub fn with_drug_chemical_conflation() -> Self {
        Self {
            drug_chemical_conflate: Some(true),
            ..Default::default()
        }
    }
}

/// Parameters sent along with a NameRes lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOptions {
    pub autocomplete: bool,

    pub limit: u32,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub biolink_types: Vec<String>,

    /// Pipe-separated prefixes, e.g. `"MONDO|HP"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_prefixes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_prefixes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_taxa: Option<String>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            autocomplete: false,
            limit: 10,
            biolink_types: Vec::new(),
            only_prefixes: None,
            exclude_prefixes: None,
            only_taxa: None,
        }
    }
}

impl LookupOptions {
    pub fn exact(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_json() -> Value {
        serde_json::json!({
            "id": {"identifier": "MONDO:0005015", "label": "diabetes mellitus"},
            "equivalent_identifiers": [
                {"identifier": "MONDO:0005015", "label": "diabetes mellitus"},
                {"identifier": "DOID:9351", "label": "diabetes mellitus"}
            ],
            "type": ["biolink:Disease", "biolink:DiseaseOrPhenotypicFeature"],
            "information_content": 74.9
        })
    }

    #[test]
    fn test_normalized_node_accessors() {
        let node: NormalizedNode = serde_json::from_value(node_json()).unwrap();
        assert_eq!(node.identifier(), "MONDO:0005015");
        assert_eq!(node.label(), "diabetes mellitus");
        assert_eq!(node.primary_type(), "biolink:Disease");
        assert!(node.has_type("biolink:DiseaseOrPhenotypicFeature"));
        assert!(!node.has_type("biolink:Gene"));
        assert_eq!(
            node.summary(),
            "MONDO:0005015 (biolink:Disease, \"diabetes mellitus\")"
        );
    }

    #[test]
    fn test_untyped_fields_take_part_in_equality() {
        let a: NormalizedNode = serde_json::from_value(node_json()).unwrap();
        let mut other = node_json();
        other["information_content"] = serde_json::json!(12.0);
        let b: NormalizedNode = serde_json::from_value(other).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_normalize_options_omit_unset_flags() {
        let body = serde_json::to_value(NormalizeOptions::with_drug_chemical_conflation()).unwrap();
        assert_eq!(body, serde_json::json!({"drug_chemical_conflate": true}));
    }

    #[test]
    fn test_lookup_options_body() {
        let body = serde_json::to_value(LookupOptions::exact(10)).unwrap();
        assert_eq!(body, serde_json::json!({"autocomplete": false, "limit": 10}));
    }
}
