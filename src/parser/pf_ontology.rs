//! `pf-ontology` (entities as an array) and `pf-ontology-keyed` (entities as
//! a map keyed by short name).

use serde_json::Value;

use super::shared::{
    link_pairs, link_parent, refs, Stub, StubLabel, DOMAIN_INCLUDES, DOMAIN_OR_SINGLE,
    RANGE_INCLUDES, RANGE_OR_SINGLE,
};
use crate::model::property_map::properties_of;
use crate::model::value::{after_last_colon, array, first_field, first_text, has, text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

const PARENT: Stub = Stub::external(StubLabel::LocalName, "Parent class");
const INCLUDES_ENDPOINT: Stub = Stub::external(StubLabel::AfterColon, "");
const DIRECT_ENDPOINT: Stub = Stub::external(StubLabel::LocalName, "");
const SUBCLASS_KEYS: [&str; 2] = ["rdfs:subClassOf", "subClassOf"];
const RELATIONSHIP_LABEL: [&str; 4] = ["name", "label", "@id", "rdfs:label"];

/// `entityType`, else the local part of `@type`, else `class`; lower-cased.
fn entity_type_of(ent: &Value) -> String {
    first_text(ent, &["entityType"])
        .or_else(|| {
            first_text(ent, &["@type"])
                .map(|t| after_last_colon(&t).to_owned())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| "class".into())
        .to_lowercase()
}

fn relationship_edge_type(rel: &Value) -> EdgeType {
    if has(rel, "linkedOntology") { EdgeType::Binding } else { EdgeType::Relationship }
}

pub(super) fn build_array(doc: &Value, source: &str, b: &mut GraphBuilder) {
    let metadata = doc.get("metadata").unwrap_or(&Value::Null);
    let ont_name = first_text(metadata, &["name"])
        .or_else(|| first_text(doc, &["name"]))
        .unwrap_or_else(|| source.to_owned());

    for ent in array(doc, "entities") {
        let id = first_text(ent, &["@id", "id", "name"]);
        if let Some(id) = &id {
            let label = first_text(ent, &["name", "label", "rdfs:label"]).unwrap_or_else(|| id.clone());
            let description = text_or_empty(ent, &["description", "rdfs:comment"]);
            b.add_node(id, &label, entity_type_of(ent), &description, properties_of(ent));
        }
        let Some(id) = id else {
            continue;
        };

        if let Some(base) = first_text(ent, &["schemaOrgBase"]) {
            b.add_simple(&base, &base.replacen("schema:", "", 1), EntityType::External, "schema.org type");
            b.add_edge(&id, &base, "extends", EdgeType::Inheritance);
        }
        link_parent(b, &id, first_field(ent, &SUBCLASS_KEYS), PARENT);
    }

    for rel in array(doc, "relationships") {
        let label = text_or_empty(rel, &RELATIONSHIP_LABEL);
        let domains = refs(rel, &DOMAIN_OR_SINGLE);
        let ranges = refs(rel, &RANGE_OR_SINGLE);
        link_pairs(b, &domains, &ranges, &label, relationship_edge_type(rel), INCLUDES_ENDPOINT);
    }

    let dependencies = metadata.get("dependencies").and_then(Value::as_array);
    if let Some(dependencies) = dependencies {
        let root_id = first_text(doc, &["@id"]).unwrap_or_else(|| "root".into());
        let description = text_or_empty(metadata, &["description"]);
        b.add_simple(&root_id, &ont_name, EntityType::Core, &description);
        for dep in dependencies.iter().filter_map(text) {
            b.add_simple(&dep, after_last_colon(&dep), EntityType::External, "Dependency");
            b.add_edge(&root_id, &dep, "depends on", EdgeType::Binding);
        }
    }
}

pub(super) fn build_keyed(doc: &Value, _source: &str, b: &mut GraphBuilder) {
    let Some(entities) = doc.get("entities").and_then(Value::as_object) else {
        return;
    };

    for (key, ent) in entities {
        let id = first_text(ent, &["@id", "id"]).unwrap_or_else(|| key.clone());
        let label = first_text(ent, &["rdfs:label", "name", "label"]).unwrap_or_else(|| key.clone());
        let description = text_or_empty(ent, &["rdfs:comment", "description"]);
        b.add_node(&id, &label, entity_type_of(ent), &description, properties_of(ent));
        link_parent(b, &id, first_field(ent, &SUBCLASS_KEYS), PARENT);
    }

    for rel in array(doc, "relationships") {
        let label = text_or_empty(rel, &RELATIONSHIP_LABEL);

        // sourceEntity/targetEntity form, with source/domain as aliases
        let source = first_text(rel, &["sourceEntity", "source", "domain"]);
        let target = first_text(rel, &["targetEntity", "target", "range"]);
        if let (Some(s), Some(t)) = (source, target) {
            link_pairs(b, &[s], &[t], &label, relationship_edge_type(rel), DIRECT_ENDPOINT);
        }

        let domains = refs(rel, &DOMAIN_INCLUDES);
        let ranges = refs(rel, &RANGE_INCLUDES);
        link_pairs(b, &domains, &ranges, &label, EdgeType::Relationship, INCLUDES_ENDPOINT);
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{EdgeType, EntityType};
    use crate::parse_ontology;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_minimal_domain_range_scenario() {
        let doc = json!({
            "entities": [{"@id": "A", "name": "A"}, {"@id": "B", "name": "B"}],
            "relationships": [{"domain": "A", "range": "B", "name": "rel"}]
        });
        let g = parse_ontology(&doc, "min");
        let ids: Vec<_> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(g.edges.len(), 1);
        assert_eq!((g.edges[0].from.as_str(), g.edges[0].to.as_str()), ("A", "B"));
        assert_eq!(g.edges[0].label, "rel");
        assert_eq!(g.edges[0].edge_type, EdgeType::Relationship);
    }

    #[test]
    fn test_entity_type_from_at_type() {
        let doc = json!({"entities": [
            {"@id": "pfc:V", "@type": "pfc:Framework"},
            {"@id": "pfc:W", "entityType": "Supporting"},
            {"@id": "pfc:X"}
        ]});
        let g = parse_ontology(&doc, "t");
        assert_eq!(g.node("pfc:V").unwrap().entity_type, EntityType::Framework);
        assert_eq!(g.node("pfc:W").unwrap().entity_type, EntityType::Supporting);
        assert_eq!(g.node("pfc:X").unwrap().entity_type, EntityType::Class);
    }

    #[test]
    fn test_schema_org_base_and_parent() {
        let doc = json!({"entities": [
            {"@id": "pfc:Vision", "schemaOrgBase": "schema:Thing", "subClassOf": "pfc:Base"}
        ]});
        let g = parse_ontology(&doc, "t");
        let base = g.node("schema:Thing").unwrap();
        assert_eq!(base.label, "Thing");
        assert_eq!(base.description, "schema.org type");
        assert!(g.edges.iter().any(|e| e.label == "extends" && e.edge_type == EdgeType::Inheritance));
        assert_eq!(g.node("pfc:Base").unwrap().description, "Parent class");
        assert!(g.edges.iter().any(|e| e.label == "subClassOf" && e.to == "pfc:Base"));
    }

    #[test]
    fn test_linked_ontology_marks_binding() {
        let doc = json!({
            "entities": [{"@id": "a:X"}],
            "relationships": [{"name": "bridges", "domainIncludes": ["a:X"], "rangeIncludes": ["b:Y", "b:Z"],
                                "linkedOntology": "b"}]
        });
        let g = parse_ontology(&doc, "t");
        assert_eq!(g.edges.len(), 2);
        assert!(g.edges.iter().all(|e| e.edge_type == EdgeType::Binding));
        assert_eq!(g.node("b:Y").unwrap().label, "Y");
        assert_eq!(g.node("b:Y").unwrap().entity_type, EntityType::External);
    }

    #[test]
    fn test_metadata_dependencies_root() {
        let doc = json!({
            "@id": "pfc:ontology",
            "metadata": {"name": "PFC", "description": "core", "dependencies": ["org:", "vsom:Vision"]},
            "entities": [{"@id": "pfc:A"}]
        });
        let g = parse_ontology(&doc, "t");
        let root = g.node("pfc:ontology").unwrap();
        assert_eq!(root.label, "PFC");
        assert_eq!(root.entity_type, EntityType::Core);
        assert_eq!(g.node("vsom:Vision").unwrap().label, "Vision");
        assert_eq!(g.edges.iter().filter(|e| e.label == "depends on").count(), 2);
    }

    #[test]
    fn test_keyed_entities_and_source_target() {
        let doc = json!({
            "entities": {
                "Vision": {"@id": "kpi:Vision", "rdfs:comment": "Long term"},
                "Metric": {"name": "Metric Label"}
            },
            "relationships": [
                {"name": "measures", "sourceEntity": "Metric", "targetEntity": "kpi:Vision"},
                {"name": "tracks", "domainIncludes": "Metric", "rangeIncludes": ["ext:Goal"]}
            ]
        });
        let g = parse_ontology(&doc, "kpi");
        assert_eq!(g.diagnostics.format, "pf-ontology-keyed");
        assert_eq!(g.node("kpi:Vision").unwrap().description, "Long term");
        // key is the id when no @id/id is given
        assert_eq!(g.node("Metric").unwrap().label, "Metric Label");
        assert!(g.edges.iter().any(|e| e.from == "Metric" && e.to == "kpi:Vision" && e.label == "measures"));
        assert!(g.edges.iter().any(|e| e.from == "Metric" && e.to == "ext:Goal" && e.label == "tracks"));
    }
}
