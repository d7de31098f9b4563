//! # Multi-Document Merger
//!
//! Combines every loaded document's graph into one namespaced graph. Node
//! ids become `<prefix>::<originalId>`; the source graphs are never touched.
//!
//! The [`NodeIndex`] answers two kinds of lookup: by merged id, and by the
//! bare original id (`vsom:Vision`) that declared cross-references use.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::value::local_name;
use crate::model::{Edge, Node};
use crate::registry::LoadedDocuments;

/// Name carried by every merged graph.
pub const MERGED_GRAPH_NAME: &str = "Unified Registry";

/// Separator between namespace prefix and original id in merged ids.
pub const MERGED_ID_SEPARATOR: &str = "::";

/// `<prefix>::<id>`.
pub fn merged_id(prefix: &str, id: &str) -> String {
    format!("{prefix}{MERGED_ID_SEPARATOR}{id}")
}

/// Prefix part of a merged id, or the whole id if it has none.
pub fn merged_prefix(id: &str) -> &str {
    id.split(MERGED_ID_SEPARATOR).next().unwrap_or(id)
}

/// A node copied out of its source graph and annotated with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedNode {
    #[serde(flatten)]
    pub node: Node,
    pub original_id: String,
    pub source_namespace: String,
    pub source_name: String,
    pub series: String,
    pub is_placeholder: bool,
}

impl MergedNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedEdge {
    #[serde(flatten)]
    pub edge: Edge,
    pub source_namespace: String,
}

// ============================================================================
// NodeIndex
// ============================================================================

#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    original_id: String,
}

/// Dual index over merged node ids.
///
/// Scans walk entries in insertion order, so every fallback lookup is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    entries: Vec<IndexEntry>,
    by_id: HashMap<String, usize>,
    /// original id → positions of every merged node that carried it
    by_original: HashMap<String, SmallVec<[usize; 2]>>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a merged id. Re-registering an id is a no-op.
    pub fn insert(&mut self, id: &str, original_id: &str) {
        if self.by_id.contains_key(id) {
            return;
        }
        let pos = self.entries.len();
        self.entries.push(IndexEntry { id: id.to_owned(), original_id: original_id.to_owned() });
        self.by_id.insert(id.to_owned(), pos);
        self.by_original.entry(original_id.to_owned()).or_default().push(pos);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `prefix:entity` to a merged id.
    ///
    /// Tried in order, first hit wins:
    ///
    /// 1. exact `prefix::entity`
    /// 2. nodes whose original id is `prefix:entity`, preferring one in the
    ///    `prefix` namespace
    /// 3. both of the above ignoring case
    /// 4. any node in the `prefix` namespace whose original local name equals
    ///    `entity`'s, ignoring case
    pub fn resolve(&self, prefix: &str, entity: &str) -> Option<&str> {
        let namespaced = merged_id(prefix, entity);
        let bare = format!("{prefix}:{entity}");

        if let Some(&pos) = self.by_id.get(&namespaced) {
            return Some(&self.entries[pos].id);
        }
        if let Some(positions) = self.by_original.get(&bare) {
            if let Some(id) = self.prefer_namespace(positions.iter().copied(), prefix) {
                return Some(id);
            }
        }

        if let Some(entry) = self.entries.iter().find(|e| e.id.eq_ignore_ascii_case(&namespaced)) {
            return Some(&entry.id);
        }
        let loose = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.original_id.eq_ignore_ascii_case(&bare))
            .map(|(pos, _)| pos);
        if let Some(id) = self.prefer_namespace(loose, prefix) {
            return Some(id);
        }

        let suffix = local_name(entity);
        self.entries
            .iter()
            .find(|e| {
                merged_prefix(&e.id).eq_ignore_ascii_case(prefix)
                    && local_name(&e.original_id).eq_ignore_ascii_case(suffix)
            })
            .map(|e| e.id.as_str())
    }

    fn prefer_namespace(&self, positions: impl Iterator<Item = usize>, prefix: &str) -> Option<&str> {
        let candidates: SmallVec<[usize; 4]> = positions.collect();
        candidates
            .iter()
            .find(|&&p| merged_prefix(&self.entries[p].id).eq_ignore_ascii_case(prefix))
            .or_else(|| candidates.first())
            .map(|&p| self.entries[p].id.as_str())
    }
}

// ============================================================================
// MergedGraph
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedGraph {
    pub nodes: Vec<MergedNode>,
    pub edges: Vec<MergedEdge>,
    #[serde(skip)]
    pub node_index: NodeIndex,
    pub name: String,
}

impl MergedGraph {
    pub fn node(&self, id: &str) -> Option<&MergedNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Merge every loaded document into one namespaced graph, in namespace order.
pub fn build_merged_graph(docs: &LoadedDocuments) -> MergedGraph {
    let mut graph = MergedGraph {
        name: MERGED_GRAPH_NAME.to_owned(),
        ..MergedGraph::default()
    };

    for (namespace, record) in docs {
        let prefix = crate::registry::strip_colon(namespace);

        for node in &record.parsed.nodes {
            let id = merged_id(prefix, &node.id);
            graph.node_index.insert(&id, &node.id);
            let mut copy = node.clone();
            copy.id = id;
            graph.nodes.push(MergedNode {
                node: copy,
                original_id: node.id.clone(),
                source_namespace: namespace.clone(),
                source_name: record.name.clone(),
                series: record.series.clone(),
                is_placeholder: record.is_placeholder,
            });
        }

        for edge in &record.parsed.edges {
            let mut copy = edge.clone();
            copy.from = merged_id(prefix, &edge.from);
            copy.to = merged_id(prefix, &edge.to);
            graph.edges.push(MergedEdge { edge: copy, source_namespace: namespace.clone() });
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LoadedDocument;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn docs() -> LoadedDocuments {
        let mut docs = LoadedDocuments::new();
        docs.insert(
            "vsom:".into(),
            LoadedDocument::parse(
                "vsom:",
                "VSOM Ontology",
                "VE-Series",
                json!({
                    "entities": [{"@id": "vsom:Vision"}, {"@id": "vsom:Strategy"}],
                    "relationships": [{"name": "guides", "domain": "vsom:Vision", "range": "vsom:Strategy"}]
                }),
            ),
        );
        docs.insert(
            "okr:".into(),
            LoadedDocument::parse("okr:", "OKR Ontology", "VE-Series", json!({"entities": [{"@id": "Objective"}]})),
        );
        docs
    }

    #[test]
    fn test_ids_are_prefixed_and_annotated() {
        let merged = build_merged_graph(&docs());
        assert_eq!(merged.name, MERGED_GRAPH_NAME);
        assert_eq!(merged.node_count(), 3);
        let vision = merged.node("vsom::vsom:Vision").unwrap();
        assert_eq!(vision.original_id, "vsom:Vision");
        assert_eq!(vision.source_namespace, "vsom:");
        assert_eq!(vision.series, "VE-Series");
        assert_eq!(merged.edges[0].edge.from, "vsom::vsom:Vision");
        assert_eq!(merged.edges[0].edge.to, "vsom::vsom:Strategy");
    }

    #[test]
    fn test_source_graphs_untouched() {
        let docs = docs();
        let _ = build_merged_graph(&docs);
        assert!(docs["vsom:"].parsed.contains("vsom:Vision"));
    }

    #[test]
    fn test_resolution_fallbacks() {
        let merged = build_merged_graph(&docs());
        let index = &merged.node_index;
        // exact merged id
        assert_eq!(index.resolve("okr", "Objective"), Some("okr::Objective"));
        // original CURIE
        assert_eq!(index.resolve("vsom", "Vision"), Some("vsom::vsom:Vision"));
        // ignoring case
        assert_eq!(index.resolve("okr", "objective"), Some("okr::Objective"));
        assert_eq!(index.resolve("vsom", "VISION"), Some("vsom::vsom:Vision"));
        assert_eq!(index.resolve("pmf", "Vision"), None);
    }

    #[test]
    fn test_suffix_scan_stays_in_namespace() {
        let mut index = NodeIndex::new();
        index.insert("vsom::http://x.org/vsom#Vision", "http://x.org/vsom#Vision");
        index.insert("okr::Vision", "Vision");
        assert_eq!(index.resolve("vsom", "Vision"), Some("vsom::http://x.org/vsom#Vision"));
    }

    #[test]
    fn test_shared_original_prefers_own_namespace() {
        let mut index = NodeIndex::new();
        index.insert("okr::vsom:Vision", "vsom:Vision");
        index.insert("vsom::vsom:Vision", "vsom:Vision");
        assert_eq!(index.len(), 2);
        // exact form wins before alias lookup
        assert_eq!(index.resolve("vsom", "vsom:Vision"), Some("vsom::vsom:Vision"));
        assert_eq!(index.resolve("vsom", "Vision"), Some("vsom::vsom:Vision"));
    }
}
