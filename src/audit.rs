//! Graph Auditor
//!
//! Orphan detection and connected components over one normalized graph.
//!
//! Two adjacency models are used on purpose and must stay separate:
//!
//! | Question | Model |
//! |---|---|
//! | Is a node isolated? | directed in/out degree, both zero |
//! | Which nodes reach each other? | undirected BFS |

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node, NormalizedGraph};

/// Result of [`audit_graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub format: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Nodes with no incoming and no outgoing edge.
    pub isolated: Vec<Node>,
    /// Connected components, largest first.
    pub components: Vec<Vec<String>>,
    pub stub_nodes: Vec<String>,
    pub main_component_size: usize,
    /// `components.len() - 1`; zero for a connected or empty graph.
    pub disconnected_count: usize,
}

impl AuditResult {
    pub fn is_connected(&self) -> bool {
        self.disconnected_count == 0
    }
}

/// Audit a single graph. Pure and deterministic.
pub fn audit_graph(graph: &NormalizedGraph) -> AuditResult {
    let mut degree: HashMap<&str, (usize, usize)> =
        graph.nodes.iter().map(|n| (n.id.as_str(), (0, 0))).collect();
    for edge in &graph.edges {
        if let Some((_, out)) = degree.get_mut(edge.from.as_str()) {
            *out += 1;
        }
        if let Some((inc, _)) = degree.get_mut(edge.to.as_str()) {
            *inc += 1;
        }
    }

    let isolated = graph
        .nodes
        .iter()
        .filter(|n| degree.get(n.id.as_str()) == Some(&(0, 0)))
        .cloned()
        .collect();

    let components = connected_components(graph.nodes.iter().map(|n| n.id.as_str()), &graph.edges);
    let main_component_size = components.first().map_or(0, Vec::len);

    AuditResult {
        format: graph.diagnostics.format.clone(),
        total_nodes: graph.nodes.len(),
        total_edges: graph.edges.len(),
        isolated,
        disconnected_count: components.len().saturating_sub(1),
        components,
        stub_nodes: graph.diagnostics.stub_nodes.clone(),
        main_component_size,
    }
}

/// Undirected connected components of the subgraph induced by `ids`.
///
/// Edges with an endpoint outside `ids` are ignored. Components are seeded in
/// `ids` order and stably sorted by size, largest first.
pub(crate) fn connected_components<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    edges: &'a [Edge],
) -> Vec<Vec<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for id in ids {
        if adj.insert(id, Vec::new()).is_none() {
            order.push(id);
        }
    }
    for edge in edges {
        let (from, to) = (edge.from.as_str(), edge.to.as_str());
        if adj.contains_key(from) && adj.contains_key(to) {
            adj.entry(from).or_default().push(to);
            adj.entry(to).or_default().push(from);
        }
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(order.len());
    let mut components = Vec::new();
    for start in order {
        if visited.contains(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            if !visited.insert(cur) {
                continue;
            }
            component.push(cur.to_owned());
            if let Some(neighbours) = adj.get(cur) {
                queue.extend(neighbours.iter().filter(|nb| !visited.contains(*nb)));
            }
        }
        components.push(component);
    }

    components.sort_by(|a, b| b.len().cmp(&a.len()));
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeType, GraphBuilder};
    use pretty_assertions::assert_eq;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> NormalizedGraph {
        let mut b = GraphBuilder::new("test");
        for id in nodes {
            b.add_simple(id, id, "class", "");
        }
        for (from, to) in edges {
            b.add_edge(from, to, "", EdgeType::Relationship);
        }
        b.finish("g")
    }

    #[test]
    fn test_connected_pair() {
        let result = audit_graph(&graph(&["A", "B"], &[("A", "B")]));
        assert_eq!(result.total_nodes, 2);
        assert_eq!(result.total_edges, 1);
        assert!(result.isolated.is_empty());
        assert_eq!(result.disconnected_count, 0);
        assert_eq!(result.main_component_size, 2);
    }

    #[test]
    fn test_components_sorted_largest_first() {
        let result = audit_graph(&graph(&["Z", "A", "B", "C"], &[("A", "B"), ("C", "B")]));
        assert_eq!(result.components.len(), 2);
        assert_eq!(result.components[0].len(), 3);
        assert_eq!(result.components[1], vec!["Z".to_string()]);
        assert_eq!(result.disconnected_count, 1);
        assert_eq!(result.isolated.len(), 1);
        assert_eq!(result.isolated[0].id, "Z");
    }

    #[test]
    fn test_self_loop_is_not_isolated() {
        let result = audit_graph(&graph(&["A"], &[("A", "A")]));
        assert!(result.isolated.is_empty());
        assert_eq!(result.components, vec![vec!["A".to_string()]]);
    }

    #[test]
    fn test_empty_graph() {
        let result = audit_graph(&NormalizedGraph::default());
        assert!(result.components.is_empty());
        assert_eq!(result.main_component_size, 0);
        assert!(result.is_connected());
    }

    #[test]
    fn test_induced_subgraph_ignores_outside_edges() {
        let g = graph(&["A", "B", "C"], &[("A", "C"), ("B", "C")]);
        let comps = connected_components(["A", "B"], &g.edges);
        assert_eq!(comps.len(), 2);
    }
}
