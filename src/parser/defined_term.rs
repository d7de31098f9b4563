//! `jsonld-definedterm`: schema.org `DefinedTermSet` documents whose terms
//! live in `hasDefinedTerm`.

use serde_json::Value;

use super::shared::{link_pairs, link_parent, refs, Stub, StubLabel, DOMAIN_OR_SINGLE, RANGE_OR_SINGLE};
use crate::model::property_map::properties_of;
use crate::model::value::{array, first_field, first_text, local_name, text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

const BASE_TYPE: Stub = Stub::external(StubLabel::LocalName, "schema.org / base type");
const ENDPOINT: Stub = Stub::class(StubLabel::LocalName);
const TERM_DOMAINS: [&str; 3] = ["schema:domainIncludes", "oaa:domainIncludes", "domainIncludes"];
const TERM_RANGES: [&str; 3] = ["schema:rangeIncludes", "oaa:rangeIncludes", "rangeIncludes"];

/// `@type`/`type` as a single string; arrays are comma-joined.
fn term_type(term: &Value) -> String {
    match first_field(term, &["@type", "type"]) {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect::<Vec<_>>().join(","),
        Some(v) => text(v).unwrap_or_else(|| "Class".into()),
        None => "Class".into(),
    }
}

pub(super) fn build(doc: &Value, source: &str, b: &mut GraphBuilder) {
    let ont_name = first_text(doc, &["name", "rdfs:label", "@id"]).unwrap_or_else(|| source.to_owned());
    let ont_desc = text_or_empty(doc, &["description", "rdfs:comment"]);

    for term in array(doc, "hasDefinedTerm") {
        let Some(id) = first_text(term, &["@id", "name"]) else {
            continue;
        };
        let label = first_text(term, &["name", "rdfs:label"]).unwrap_or_else(|| id.clone());
        let description = text_or_empty(term, &["description", "rdfs:comment"]);
        let entity_type = if term_type(term).to_lowercase().contains("property") {
            EntityType::Supporting
        } else {
            EntityType::Class
        };
        b.add_node(&id, &label, entity_type, &description, properties_of(term));
        link_parent(b, &id, term.get("rdfs:subClassOf"), BASE_TYPE);

        // properties hang off their domains and point at their ranges
        for domain in refs(term, &TERM_DOMAINS) {
            b.add_simple(&domain, local_name(&domain), EntityType::Class, "");
            b.add_edge(&domain, &id, "has property", EdgeType::Relationship);
        }
        for range in refs(term, &TERM_RANGES) {
            b.add_simple(&range, local_name(&range), EntityType::External, "");
            b.add_edge(&id, &range, "range", EdgeType::Relationship);
        }
    }

    for rel in array(doc, "relationships") {
        let label = text_or_empty(rel, &["name", "rdfs:label", "@id"]);
        let domains = refs(rel, &DOMAIN_OR_SINGLE);
        let ranges = refs(rel, &RANGE_OR_SINGLE);
        link_pairs(b, &domains, &ranges, &label, EdgeType::Relationship, ENDPOINT);
    }

    if b.node_count() > 0 {
        let root_id = first_text(doc, &["@id"]).unwrap_or_else(|| "ont:root".into());
        b.add_simple(&root_id, local_name(&ont_name), EntityType::Core, &ont_desc);
    }
}
