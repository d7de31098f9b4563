//! # Cross-Reference Resolver
//!
//! Finds edges between documents of a merged registry. Three passes run in
//! order and share one seen-key set, so an edge found by an earlier pass
//! shadows the same edge from a later one:
//!
//! | Pass | Source | Label | Key |
//! |------|--------|-------|-----|
//! | 1 | `registryEntry.relationships.{keyBridges,crossOntology}` | bridge name | `from->to:name` |
//! | 2 | `rangeIncludes`/`domainIncludes` naming another namespace | `references` | `from->to:range-ref` |
//! | 3 | `registryEntry.dependencies` | `depends-on` | `from->to:depends-on` |
//!
//! Pass 3 links per-document anchor nodes (`<prefix>::_dependency`), not
//! entities.

use std::sync::OnceLock;

use hashbrown::{HashMap, HashSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::merge::{merged_id, MergedGraph};
use crate::model::value::{array, field, first_field, first_text, one_or_many, ref_id, text};
use crate::model::EdgeType;
use crate::registry::{strip_colon, LoadedDocuments};

/// Id suffix of the per-document anchor used by dependency edges.
pub const DEPENDENCY_ANCHOR: &str = "_dependency";

const DEFAULT_BRIDGE_LABEL: &str = "cross-ref";
const REFERENCE_LABEL: &str = "references";
const REFERENCE_PURPOSE: &str = "namespace-prefix reference";
const DEPENDENCY_LABEL: &str = "depends-on";
const DEPENDENCY_PURPOSE: &str = "declared dependency";

/// An edge between two documents of a merged registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub edge_type: EdgeType,
    pub purpose: String,
    /// Namespace of the document that declared the edge.
    pub source_namespace: String,
}

/// `vp:ValueProposition` split into a lower-cased prefix and the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedRef {
    pub prefix: String,
    pub entity: String,
}

fn prefixed_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([a-z][a-z0-9-]*):(.+)$").expect("prefixed ref regex must compile"))
}

pub fn parse_prefixed_ref(reference: &str) -> Option<PrefixedRef> {
    let caps = prefixed_ref_re().captures(reference)?;
    Some(PrefixedRef {
        prefix: caps[1].to_lowercase(),
        entity: caps[2].to_owned(),
    })
}

fn anchor(prefix: &str) -> String {
    merged_id(prefix, DEPENDENCY_ANCHOR)
}

/// Accumulates edges and rejects repeated keys.
#[derive(Default)]
struct EdgeSet {
    edges: Vec<CrossEdge>,
    seen: HashSet<String>,
}

impl EdgeSet {
    fn push(&mut self, key: String, edge: CrossEdge) -> bool {
        if !self.seen.insert(key) {
            return false;
        }
        self.edges.push(edge);
        true
    }
}

/// Run all three passes over `docs` and their merged graph.
pub fn detect_cross_references(docs: &LoadedDocuments, merged: &MergedGraph) -> Vec<CrossEdge> {
    let mut out = EdgeSet::default();

    let declared = declared_bridges(docs, merged, &mut out);
    let referenced = prefix_references(docs, merged, &mut out);
    let dependencies = declared_dependencies(docs, &mut out);

    debug!(declared, referenced, dependencies, total = out.edges.len(), "cross references detected");
    out.edges
}

// ============================================================================
// Pass 1: declared bridges
// ============================================================================

fn declared_bridges(docs: &LoadedDocuments, merged: &MergedGraph, out: &mut EdgeSet) -> usize {
    let mut added = 0;
    for (namespace, record) in docs {
        let Some(entry) = &record.registry_entry else {
            continue;
        };
        let relationships = entry.get("relationships").unwrap_or(&Value::Null);
        // crossOntology doubles as a plain count in some entries
        let bridges = array(relationships, "keyBridges")
            .iter()
            .chain(array(relationships, "crossOntology"));

        for bridge in bridges {
            let (Some(from), Some(to)) = (string_field(bridge, "from"), string_field(bridge, "to")) else {
                continue;
            };
            let (Some(from_ref), Some(to_ref)) = (parse_prefixed_ref(from), parse_prefixed_ref(to)) else {
                continue;
            };

            let index = &merged.node_index;
            let resolved = (
                index.resolve(&from_ref.prefix, &from_ref.entity),
                index.resolve(&to_ref.prefix, &to_ref.entity),
            );
            let (Some(from_id), Some(to_id)) = resolved else {
                debug!(from, to, namespace = %namespace, "unresolved bridge dropped");
                continue;
            };

            let label = first_text(bridge, &["name"]).unwrap_or_else(|| DEFAULT_BRIDGE_LABEL.to_owned());
            let edge = CrossEdge {
                from: from_id.to_owned(),
                to: to_id.to_owned(),
                label: label.clone(),
                edge_type: EdgeType::CrossOntology,
                purpose: first_text(bridge, &["purpose"]).unwrap_or_default(),
                source_namespace: namespace.clone(),
            };
            if out.push(format!("{from_id}->{to_id}:{label}"), edge) {
                added += 1;
            }
        }
    }
    added
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    field(value, key).and_then(Value::as_str)
}

// ============================================================================
// Pass 2: namespace-prefix references
// ============================================================================

/// Raw term declarations of one document, keyed by `name`, `@id` and
/// `termCode`. The first term to claim a key keeps it.
fn term_lookup(raw: &Value) -> HashMap<String, &Value> {
    let mut terms = HashMap::new();
    for term in one_or_many(first_field(raw, &["hasDefinedTerm", "hasPart"])) {
        for key in ["name", "@id", "termCode"] {
            if let Some(k) = term.get(key).and_then(text) {
                terms.entry(k).or_insert(term);
            }
        }
    }
    terms
}

fn prefix_references(docs: &LoadedDocuments, merged: &MergedGraph, out: &mut EdgeSet) -> usize {
    let known: HashSet<&str> = docs.keys().map(|ns| strip_colon(ns)).collect();
    let lookups: HashMap<&str, HashMap<String, &Value>> = docs
        .iter()
        .filter_map(|(ns, record)| record.raw_data.as_ref().map(|raw| (ns.as_str(), term_lookup(raw))))
        .collect();

    let mut added = 0;
    for node in &merged.nodes {
        let Some(term) = lookups
            .get(node.source_namespace.as_str())
            .and_then(|terms| terms.get(&node.original_id))
        else {
            continue;
        };
        let own_prefix = strip_colon(&node.source_namespace);

        let refs = one_or_many(term.get("rangeIncludes"))
            .into_iter()
            .chain(one_or_many(term.get("domainIncludes")));
        for reference in refs.filter_map(ref_id) {
            let Some(parts) = parse_prefixed_ref(&reference) else {
                continue;
            };
            if parts.prefix == own_prefix || !known.contains(parts.prefix.as_str()) {
                continue;
            }
            let Some(target) = merged.node_index.resolve(&parts.prefix, &parts.entity) else {
                continue;
            };

            let edge = CrossEdge {
                from: node.id().to_owned(),
                to: target.to_owned(),
                label: REFERENCE_LABEL.to_owned(),
                edge_type: EdgeType::CrossOntology,
                purpose: REFERENCE_PURPOSE.to_owned(),
                source_namespace: node.source_namespace.clone(),
            };
            if out.push(format!("{}->{target}:range-ref", node.id()), edge) {
                added += 1;
            }
        }
    }
    added
}

// ============================================================================
// Pass 3: declared dependencies
// ============================================================================

fn declared_dependencies(docs: &LoadedDocuments, out: &mut EdgeSet) -> usize {
    let mut by_entry_id: HashMap<String, &str> = HashMap::new();
    for (ns, record) in docs {
        let entry_id = record
            .entry_id
            .clone()
            .or_else(|| record.registry_entry.as_ref().and_then(|e| first_text(e, &["@id"])));
        if let Some(id) = entry_id {
            by_entry_id.entry(id).or_insert(ns.as_str());
        }
    }

    let mut added = 0;
    for (namespace, record) in docs.iter().filter(|(_, r)| !r.is_placeholder) {
        let Some(entry) = &record.registry_entry else {
            continue;
        };
        for dep in array(entry, "dependencies").iter().filter_map(text) {
            let Some(&target_ns) = by_entry_id.get(&dep) else {
                debug!(dependency = %dep, namespace = %namespace, "unknown dependency target");
                continue;
            };
            if target_ns == namespace.as_str() {
                continue;
            }

            let from = anchor(record.prefix());
            let to = anchor(strip_colon(target_ns));
            let key = format!("{from}->{to}:{DEPENDENCY_LABEL}");
            let edge = CrossEdge {
                from,
                to,
                label: DEPENDENCY_LABEL.to_owned(),
                edge_type: EdgeType::Dependency,
                purpose: DEPENDENCY_PURPOSE.to_owned(),
                source_namespace: namespace.clone(),
            };
            if out.push(key, edge) {
                added += 1;
            }
        }
    }
    added
}
