//! `jsonld`: plain class lists under `classes` or `@graph`.

use serde_json::Value;

use crate::model::property_map::properties_of;
use crate::model::value::{first_field, first_text, ref_id, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

fn first_array<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    first_field(value, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(super) fn build(doc: &Value, _source: &str, b: &mut GraphBuilder) {
    for cls in first_array(doc, &["classes", "@graph"]) {
        let Some(id) = first_text(cls, &["@id", "id", "name"]) else {
            continue;
        };
        let label = first_text(cls, &["rdfs:label", "label", "name"]).unwrap_or_else(|| id.clone());
        let description = text_or_empty(cls, &["rdfs:comment", "description"]);
        let entity_type = first_text(cls, &["entityType", "type"]).unwrap_or_else(|| "class".into());
        let properties = match cls.get("properties") {
            Some(props @ Value::Object(_)) => properties_of(props),
            _ => properties_of(cls),
        };
        b.add_node(&id, &label, entity_type, &description, properties);

        let parent = first_field(cls, &["rdfs:subClassOf", "subClassOf", "parentClass"]).and_then(ref_id);
        if let Some(parent) = parent {
            b.add_simple(&parent, &parent, EntityType::Class, "");
            b.add_edge(&id, &parent, "subClassOf", EdgeType::Inheritance);
        }
    }

    // endpoints here are left to the stub repair pass
    for rel in first_array(doc, &["relationships", "properties"]) {
        let source = first_text(rel, &["source", "domain", "from"]);
        let target = first_text(rel, &["target", "range", "to"]);
        if let (Some(s), Some(t)) = (source, target) {
            let label = text_or_empty(rel, &["label", "name", "rdfs:label"]);
            b.add_edge(&s, &t, &label, EdgeType::Relationship);
        }
    }
}
