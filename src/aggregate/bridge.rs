//! Bridge node detection.
//!
//! A bridge is a cross-edge target referenced from at least `threshold`
//! distinct source documents. Several edges from one document count once.
//! Dependency anchors take part like any other target.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::merge::MERGED_ID_SEPARATOR;
use crate::registry::{display_name, document_for_prefix, LoadedDocuments};
use crate::xref::CrossEdge;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeNode {
    pub id: String,
    /// Original id part of the merged id.
    pub entity_label: String,
    pub prefix: String,
    pub series: Option<String>,
    pub ontology_name: Option<String>,
    /// Display names of the referencing documents, deduplicated.
    pub referencing_ontologies: Vec<String>,
    pub referencing_namespaces: Vec<String>,
    pub ref_count: usize,
}

impl BridgeNode {
    fn new(id: &str, docs: &LoadedDocuments) -> Self {
        let (prefix, entity) = match id.split_once(MERGED_ID_SEPARATOR) {
            Some((prefix, rest)) => (prefix, rest.split(MERGED_ID_SEPARATOR).next().unwrap_or(rest)),
            None => (id, id),
        };
        let target = document_for_prefix(docs, prefix);
        Self {
            id: id.to_owned(),
            entity_label: if entity.is_empty() { id.to_owned() } else { entity.to_owned() },
            prefix: prefix.to_owned(),
            series: target.map(|d| d.series.clone()),
            ontology_name: target.map(|d| d.name.clone()),
            referencing_ontologies: Vec::new(),
            referencing_namespaces: Vec::new(),
            ref_count: 0,
        }
    }
}

/// Targets of `cross_edges` referenced by `threshold` or more distinct
/// source documents, in order of first reference.
pub fn detect_bridge_nodes(cross_edges: &[CrossEdge], docs: &LoadedDocuments, threshold: usize) -> Vec<BridgeNode> {
    let mut nodes: Vec<BridgeNode> = Vec::new();
    let mut by_id: HashMap<&str, usize> = HashMap::new();

    for edge in cross_edges {
        let pos = *by_id.entry(edge.to.as_str()).or_insert_with(|| {
            nodes.push(BridgeNode::new(&edge.to, docs));
            nodes.len() - 1
        });
        let node = &mut nodes[pos];
        if node.referencing_namespaces.contains(&edge.source_namespace) {
            continue;
        }

        node.referencing_namespaces.push(edge.source_namespace.clone());
        node.ref_count += 1;
        let source_name = docs
            .get(&edge.source_namespace)
            .map(|d| display_name(&d.name))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| edge.source_namespace.clone());
        if !node.referencing_ontologies.contains(&source_name) {
            node.referencing_ontologies.push(source_name);
        }
    }

    nodes.retain(|n| n.ref_count >= threshold);
    nodes
}
