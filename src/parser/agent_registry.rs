//! `agent-registry`: `{ "agents": [ { id, name, dependencies[], layer } ] }`.

use serde_json::Value;

use crate::model::property_map::properties_of;
use crate::model::value::{array, first_text, text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder};

pub(super) fn build(doc: &Value, _source: &str, b: &mut GraphBuilder) {
    for agent in array(doc, "agents") {
        let Some(id) = first_text(agent, &["id"]) else {
            continue;
        };
        let label = first_text(agent, &["name"]).unwrap_or_else(|| id.clone());
        let description = text_or_empty(agent, &["purpose", "description"]);
        b.add_node(&id, &label, EntityType::Agent, &description, properties_of(agent));

        for dep in array(agent, "dependencies").iter().filter_map(text) {
            b.add_edge(&id, &dep, "depends on", EdgeType::Binding);
        }

        if let Some(layer) = first_text(agent, &["layer"]) {
            let layer_id = format!("layer:{layer}");
            b.add_simple(&layer_id, &layer, EntityType::Layer, "Agent layer");
            b.add_edge(&id, &layer_id, "in layer", EdgeType::Binding);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{EdgeType, EntityType};
    use crate::parse_ontology;
    use serde_json::json;

    #[test]
    fn test_agents_dependencies_and_layers() {
        let doc = json!({
            "agents": [
                {"id": "planner", "name": "Planner", "purpose": "Plans", "layer": "L1",
                 "dependencies": ["retriever"]},
                {"id": "retriever", "layer": "L1"}
            ]
        });
        let g = parse_ontology(&doc, "agents");

        let planner = g.node("planner").unwrap();
        assert_eq!(planner.entity_type, EntityType::Agent);
        assert_eq!(planner.description, "Plans");
        assert_eq!(planner.properties["layer"], "L1");

        // one shared layer node
        let layers: Vec<_> = g.nodes.iter().filter(|n| n.entity_type == EntityType::Layer).collect();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, "layer:L1");

        assert!(g.edges.iter().any(|e| e.from == "planner" && e.to == "retriever"
            && e.label == "depends on" && e.edge_type == EdgeType::Binding));
        assert_eq!(g.edges.iter().filter(|e| e.label == "in layer").count(), 2);
        assert!(g.diagnostics.stub_nodes.is_empty());
    }

    #[test]
    fn test_dependency_on_unknown_agent_is_stubbed() {
        let doc = json!({"agents": [{"id": "a", "dependencies": ["ghost"]}]});
        let g = parse_ontology(&doc, "agents");
        assert_eq!(g.diagnostics.stub_nodes, vec!["ghost".to_string()]);
        assert_eq!(g.node("ghost").unwrap().entity_type, EntityType::External);
    }
}
