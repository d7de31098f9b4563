//! Dialect detection.
//!
//! Classifies a raw document by the shape of its top-level keys. Detection
//! is total: anything unrecognized is `Generic`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::value::is_truthy;

/// The closed set of ontology document dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatTag {
    AgentRegistry,
    RegistryEntry,
    UniRegistry,
    PfOntology,
    PfOntologyKeyed,
    #[serde(rename = "jsonld-definedterm")]
    JsonLdDefinedTerm,
    #[serde(rename = "jsonld")]
    JsonLd,
    Generic,
}

impl FormatTag {
    pub const ALL: [FormatTag; 8] = [
        FormatTag::AgentRegistry,
        FormatTag::RegistryEntry,
        FormatTag::UniRegistry,
        FormatTag::PfOntology,
        FormatTag::PfOntologyKeyed,
        FormatTag::JsonLdDefinedTerm,
        FormatTag::JsonLd,
        FormatTag::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::AgentRegistry => "agent-registry",
            FormatTag::RegistryEntry => "registry-entry",
            FormatTag::UniRegistry => "uni-registry",
            FormatTag::PfOntology => "pf-ontology",
            FormatTag::PfOntologyKeyed => "pf-ontology-keyed",
            FormatTag::JsonLdDefinedTerm => "jsonld-definedterm",
            FormatTag::JsonLd => "jsonld",
            FormatTag::Generic => "generic",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `doc`. First match wins, in this order:
///
/// | Precedence | Shape | Tag |
/// |---|---|---|
/// | 1 | `agents` is an array | `agent-registry` |
/// | 2 | `registryEntry` present | `registry-entry` |
/// | 3 | `ontologyDefinition` present | `uni-registry` |
/// | 4 | `entities` is an array | `pf-ontology` |
/// | 5 | `entities` is a non-array object | `pf-ontology-keyed` |
/// | 6 | `hasDefinedTerm` is an array | `jsonld-definedterm` |
/// | 7 | `classes` or `@graph` present | `jsonld` |
/// | 8 | anything else | `generic` |
pub fn detect_format(doc: &Value) -> FormatTag {
    let present = |key: &str| doc.get(key).is_some_and(is_truthy);

    if doc.get("agents").is_some_and(Value::is_array) {
        return FormatTag::AgentRegistry;
    }
    if present("registryEntry") {
        return FormatTag::RegistryEntry;
    }
    if present("ontologyDefinition") {
        return FormatTag::UniRegistry;
    }
    match doc.get("entities") {
        Some(Value::Array(_)) => return FormatTag::PfOntology,
        Some(Value::Object(_)) => return FormatTag::PfOntologyKeyed,
        _ => {}
    }
    if doc.get("hasDefinedTerm").is_some_and(Value::is_array) {
        return FormatTag::JsonLdDefinedTerm;
    }
    if present("classes") || present("@graph") {
        return FormatTag::JsonLd;
    }
    FormatTag::Generic
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_precedence_order() {
        // agents beats everything else present
        let doc = json!({"agents": [], "registryEntry": {}, "entities": []});
        assert_eq!(detect_format(&doc), FormatTag::AgentRegistry);

        let doc = json!({"registryEntry": {}, "ontologyDefinition": {}});
        assert_eq!(detect_format(&doc), FormatTag::RegistryEntry);

        let doc = json!({"ontologyDefinition": {}, "entities": []});
        assert_eq!(detect_format(&doc), FormatTag::UniRegistry);
    }

    #[test]
    fn test_entities_shape() {
        assert_eq!(detect_format(&json!({"entities": []})), FormatTag::PfOntology);
        assert_eq!(detect_format(&json!({"entities": {"A": {}}})), FormatTag::PfOntologyKeyed);
        // a scalar entities field matches neither shape
        assert_eq!(detect_format(&json!({"entities": 3})), FormatTag::Generic);
    }

    #[test]
    fn test_jsonld_variants() {
        assert_eq!(detect_format(&json!({"hasDefinedTerm": []})), FormatTag::JsonLdDefinedTerm);
        assert_eq!(detect_format(&json!({"@graph": []})), FormatTag::JsonLd);
        assert_eq!(detect_format(&json!({"classes": [{}]})), FormatTag::JsonLd);
        // hasDefinedTerm must be an array
        assert_eq!(detect_format(&json!({"hasDefinedTerm": {}, "@graph": []})), FormatTag::JsonLd);
    }

    #[test]
    fn test_fallback_is_total() {
        assert_eq!(detect_format(&json!({})), FormatTag::Generic);
        assert_eq!(detect_format(&json!([1, 2])), FormatTag::Generic);
        assert_eq!(detect_format(&json!(null)), FormatTag::Generic);
        assert_eq!(detect_format(&json!({"agents": "x"})), FormatTag::Generic);
    }

    #[test]
    fn test_wire_names() {
        for tag in FormatTag::ALL {
            let json = serde_json::to_value(tag).unwrap();
            assert_eq!(json, json!(tag.as_str()));
        }
    }
}
