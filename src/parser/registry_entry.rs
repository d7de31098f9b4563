//! `registry-entry`: a unified-registry entry whose `summary` lists entities
//! and relationships.

use serde_json::Value;

use crate::model::property_map::properties_of;
use crate::model::value::{array, first_text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

const ROOT: &str = "root";

pub(super) fn build(doc: &Value, source: &str, b: &mut GraphBuilder) {
    let Some(entry) = doc.get("registryEntry") else {
        return;
    };
    let name = first_text(entry, &["name", "ontologyName"]).unwrap_or_else(|| source.to_owned());
    let description = text_or_empty(entry, &["description", "summary"]);
    b.add_simple(ROOT, &name, EntityType::Core, &description);

    let Some(summary) = entry.get("summary") else {
        return;
    };

    for ent in array(summary, "entities") {
        let Some(id) = first_text(ent, &["id", "name"]) else {
            continue;
        };
        let label = first_text(ent, &["name"]).unwrap_or_else(|| id.clone());
        let entity_type = first_text(ent, &["entityType"]).unwrap_or_else(|| "class".into());
        let description = text_or_empty(ent, &["description"]);
        b.add_node(&id, &label, entity_type, &description, properties_of(ent));
        b.add_edge(ROOT, &id, "contains", EdgeType::Relationship);
    }

    for rel in array(summary, "relationships") {
        if let (Some(source), Some(target)) =
            (first_text(rel, &["source"]), first_text(rel, &["target"]))
        {
            let label = text_or_empty(rel, &["label", "name"]);
            b.add_edge(&source, &target, &label, EdgeType::Relationship);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::EntityType;
    use crate::parse_ontology;
    use serde_json::json;

    #[test]
    fn test_summary_entities_hang_off_root() {
        let doc = json!({
            "registryEntry": {
                "name": "VSOM Ontology",
                "description": "Strategy",
                "summary": {
                    "entities": [{"id": "Vision", "description": "Why"}, {"name": "Strategy"}],
                    "relationships": [
                        {"source": "Vision", "target": "Strategy", "label": "informs"},
                        {"source": "Vision"}
                    ]
                }
            }
        });
        let g = parse_ontology(&doc, "vsom");

        let root = g.node("root").unwrap();
        assert_eq!(root.label, "VSOM Ontology");
        assert_eq!(root.entity_type, EntityType::Core);
        assert_eq!(g.node("Vision").unwrap().entity_type, EntityType::Class);
        assert!(g.contains("Strategy"));

        assert_eq!(g.edges.iter().filter(|e| e.label == "contains").count(), 2);
        assert!(g.edges.iter().any(|e| e.label == "informs"));
        // relationship without a target is skipped
        assert_eq!(g.edges.len(), 3);
    }

    #[test]
    fn test_root_named_from_source_when_entry_is_anonymous() {
        let g = parse_ontology(&json!({"registryEntry": {"status": "draft"}}), "fallback");
        assert_eq!(g.node("root").unwrap().label, "fallback");
        assert_eq!(g.nodes.len(), 1);
    }
}
