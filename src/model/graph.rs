//! NormalizedGraph: the uniform `{nodes, edges}` shape every dialect is
//! reduced to, plus the builder that enforces its invariants.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::value::local_name;
use super::{Edge, EdgeType, EntityType, Node, PropertyMap};

/// Description attached to nodes synthesized for dangling edge endpoints.
pub const STUB_DESCRIPTION: &str = "Auto-created stub (missing reference)";

/// Parse-time repair log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Dialect tag the document was parsed as (or `placeholder`).
    pub format: String,
    /// Ids of nodes synthesized because an edge referenced them undeclared.
    #[serde(default)]
    pub stub_nodes: Vec<String>,
    /// `from->to` keys of edges that needed at least one stub endpoint.
    #[serde(default)]
    pub orphan_edges: Vec<String>,
}

/// One normalized graph per source document.
///
/// Invariants: node ids are unique, and every edge endpoint is a node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub name: String,
    pub diagnostics: Diagnostics,
}

impl NormalizedGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// "Zero nodes parsed" is the only failure signal the normalizer gives.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes whose type is not `external`.
    pub fn non_external_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_external()).count()
    }
}

/// Accumulates nodes and edges for one document.
///
/// `add_node` is first-writer-wins: a later, usually less complete mention of
/// an already described node never overwrites it. `add_edge` always appends
/// and does not require its endpoints to exist yet; `finish` repairs dangling
/// endpoints with stub nodes.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    seen: HashSet<String>,
    format: String,
}

impl GraphBuilder {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    /// Insert a node unless one with the same id already exists.
    ///
    /// An empty label falls back to the id. Returns `true` if inserted.
    pub fn add_node(
        &mut self,
        id: &str,
        label: &str,
        entity_type: impl Into<EntityType>,
        description: &str,
        properties: PropertyMap,
    ) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_owned());
        self.nodes.push(
            Node::new(id)
                .with_label(label)
                .with_type(entity_type)
                .with_description(description)
                .with_properties(properties),
        );
        true
    }

    /// Insert a node with an empty property bag.
    pub fn add_simple(
        &mut self,
        id: &str,
        label: &str,
        entity_type: impl Into<EntityType>,
        description: &str,
    ) -> bool {
        self.add_node(id, label, entity_type, description, PropertyMap::new())
    }

    pub fn add_edge(&mut self, from: &str, to: &str, label: &str, edge_type: EdgeType) {
        self.edges.push(Edge::new(from, to, label, edge_type));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Run the edge-validation pass and produce the graph.
    ///
    /// Every endpoint that was never declared gets an `external` stub whose
    /// label is the id's local name. Edges are never dropped.
    pub fn finish(mut self, name: impl Into<String>) -> NormalizedGraph {
        let mut stub_nodes = Vec::new();
        let mut orphan_edges = Vec::new();

        let endpoints: Vec<(String, String)> = self
            .edges
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect();

        for (from, to) in endpoints {
            let mut repaired = false;
            for id in [&from, &to] {
                if !self.seen.contains(id.as_str()) {
                    let label = local_name(id).to_owned();
                    self.add_simple(id, &label, EntityType::External, STUB_DESCRIPTION);
                    stub_nodes.push(id.clone());
                    repaired = true;
                }
            }
            if repaired {
                orphan_edges.push(format!("{from}->{to}"));
            }
        }

        NormalizedGraph {
            nodes: self.nodes,
            edges: self.edges,
            name: name.into(),
            diagnostics: Diagnostics {
                format: self.format,
                stub_nodes,
                orphan_edges,
            },
        }
    }
}
