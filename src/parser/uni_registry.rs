//! `uni-registry`: `{ registryMetadata, ontologyDefinition: { @graph, entities,
//! relationships } }`.

use serde_json::Value;

use super::shared::{link_pairs, link_parent, refs, Stub, StubLabel, DOMAIN_INCLUDES, RANGE_INCLUDES};
use crate::model::property_map::properties_of;
use crate::model::value::{array, first_field, first_text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

const BASE_TYPE: Stub = Stub::external(StubLabel::LocalName, "schema.org / base type");
const ENDPOINT: Stub = Stub::external(StubLabel::LocalName, "");

pub(super) fn build(doc: &Value, source: &str, b: &mut GraphBuilder) {
    let Some(def) = doc.get("ontologyDefinition") else {
        return;
    };
    let meta = doc.get("registryMetadata").unwrap_or(&Value::Null);
    let ont_name = first_text(meta, &["name"])
        .or_else(|| first_text(def, &["name"]))
        .unwrap_or_else(|| source.to_owned());
    let ont_desc = first_text(meta, &["description"])
        .or_else(|| first_text(def, &["description"]))
        .unwrap_or_default();

    for cls in array(def, "@graph") {
        let Some(id) = first_text(cls, &["@id", "id"]) else {
            continue;
        };
        let label = first_text(cls, &["rdfs:label", "name", "label"]).unwrap_or_else(|| id.clone());
        let description = text_or_empty(cls, &["rdfs:comment", "description"]);
        b.add_node(&id, &label, EntityType::Class, &description, properties_of(cls));
        link_parent(b, &id, cls.get("rdfs:subClassOf"), BASE_TYPE);
    }

    for ent in array(def, "entities") {
        let Some(id) = first_text(ent, &["@id", "id", "name"]) else {
            continue;
        };
        let label = first_text(ent, &["name", "rdfs:label"]).unwrap_or_else(|| id.clone());
        let entity_type = first_text(ent, &["entityType"]).unwrap_or_else(|| "class".into());
        let description = text_or_empty(ent, &["description"]);
        b.add_node(&id, &label, entity_type, &description, properties_of(ent));
    }

    for rel in array(def, "relationships") {
        let label = text_or_empty(rel, &["rdfs:label", "name", "label"]);

        // single-valued pair; only plain strings count
        let domain = first_string(rel, &["rdfs:domain", "source"]);
        let range = first_string(rel, &["rdfs:range", "target"]);
        if let (Some(d), Some(r)) = (domain, range) {
            link_pairs(b, &[d], &[r], &label, EdgeType::Relationship, ENDPOINT);
        }

        // multi-valued pair
        let domains = refs(rel, &DOMAIN_INCLUDES);
        let ranges = refs(rel, &RANGE_INCLUDES);
        link_pairs(b, &domains, &ranges, &label, EdgeType::Relationship, ENDPOINT);
    }

    if b.node_count() > 0 {
        let root_id = first_text(doc, &["@id"]).unwrap_or_else(|| "ont:root".into());
        b.add_simple(&root_id, &ont_name, EntityType::Core, &ont_desc);
    }
}

/// First truthy value among `keys`, but only if it is a JSON string.
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    first_field(value, keys)
        .and_then(Value::as_str)
        .map(str::to_owned)
}
