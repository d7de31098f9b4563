//! # Graph Normalizer
//!
//! Turns a raw JSON ontology document of any known dialect into a
//! [`NormalizedGraph`]. Never fails: malformed or missing fields are skipped,
//! and the worst case is a graph with zero nodes.
//!
//! ```text
//! raw JSON ─► detect_format ─► dialect builder ─► GraphBuilder::finish
//!                                                   (stub repair pass)
//! ```

mod shared;
mod agent_registry;
mod registry_entry;
mod uni_registry;
mod pf_ontology;
mod defined_term;
mod jsonld;
mod generic;

use serde_json::Value;
use tracing::debug;

use crate::format::{detect_format, FormatTag};
use crate::model::value::first_text;
use crate::model::{GraphBuilder, NormalizedGraph};

/// A dialect builder walks one document shape into the shared builder.
type DialectBuilder = fn(&Value, &str, &mut GraphBuilder);

/// Dispatch table: one builder per dialect.
fn dialect_builder(format: FormatTag) -> DialectBuilder {
    match format {
        FormatTag::AgentRegistry => agent_registry::build,
        FormatTag::RegistryEntry => registry_entry::build,
        FormatTag::UniRegistry => uni_registry::build,
        FormatTag::PfOntology => pf_ontology::build_array,
        FormatTag::PfOntologyKeyed => pf_ontology::build_keyed,
        FormatTag::JsonLdDefinedTerm => defined_term::build,
        FormatTag::JsonLd => jsonld::build,
        FormatTag::Generic => generic::build,
    }
}

/// Normalize `doc` into a graph. `source` names the document when it does
/// not name itself.
pub fn parse_ontology(doc: &Value, source: &str) -> NormalizedGraph {
    let format = detect_format(doc);
    parse_as(doc, source, format)
}

/// Normalize `doc` with an explicit dialect, bypassing detection.
pub fn parse_as(doc: &Value, source: &str, format: FormatTag) -> NormalizedGraph {
    let mut builder = GraphBuilder::new(format.as_str());
    dialect_builder(format)(doc, source, &mut builder);

    let name = first_text(doc, &["name", "ontologyName"]).unwrap_or_else(|| source.to_owned());
    let graph = builder.finish(name);

    debug!(
        format = %format,
        source,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        stubs = graph.diagnostics.stub_nodes.len(),
        "parsed ontology"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_precedence() {
        let g = parse_ontology(&json!({"name": "N", "ontologyName": "O"}), "src");
        assert_eq!(g.name, "N");
        let g = parse_ontology(&json!({"ontologyName": "O"}), "src");
        assert_eq!(g.name, "O");
        let g = parse_ontology(&json!({}), "src");
        assert_eq!(g.name, "src");
    }

    #[test]
    fn test_non_object_documents_never_panic() {
        for doc in [json!(null), json!(42), json!("text"), json!([1, {"a": 1}])] {
            let g = parse_ontology(&doc, "odd");
            assert_eq!(g.diagnostics.format, "generic");
            assert!(g.contains("root"));
        }
    }

    #[test]
    fn test_parse_as_overrides_detection() {
        let doc = json!({"entities": [{"@id": "A"}]});
        let g = parse_as(&doc, "src", FormatTag::Generic);
        assert_eq!(g.diagnostics.format, "generic");
    }
}
