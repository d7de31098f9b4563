//! Series rollup.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::merge::merged_prefix;
use crate::registry::{document_for_prefix, LoadedDocuments};
use crate::xref::CrossEdge;

/// Cross-edges between two series, collapsed regardless of direction.
/// `from` sorts before `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEdge {
    pub from: String,
    pub to: String,
    pub count: usize,
    /// Label of every contributing cross-edge, in input order.
    pub bridges: Vec<String>,
}

/// Group `cross_edges` by series pair. Same-series edges and edges whose
/// endpoints have no loaded document are skipped.
pub fn build_cross_series_edges(cross_edges: &[CrossEdge], docs: &LoadedDocuments) -> Vec<SeriesEdge> {
    let mut out: Vec<SeriesEdge> = Vec::new();
    let mut by_key: HashMap<(String, String), usize> = HashMap::new();

    for edge in cross_edges {
        let Some(from_record) = docs.get(&edge.source_namespace) else {
            continue;
        };
        let Some(to_record) = document_for_prefix(docs, merged_prefix(&edge.to)) else {
            continue;
        };
        let (a, b) = (&from_record.series, &to_record.series);
        if a == b {
            continue;
        }

        let key = if a < b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
        let pos = *by_key.entry(key).or_insert_with_key(|(from, to)| {
            out.push(SeriesEdge { from: from.clone(), to: to.clone(), count: 0, bridges: Vec::new() });
            out.len() - 1
        });
        out[pos].count += 1;
        out[pos].bridges.push(edge.label.clone());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeType;
    use crate::registry::LoadedDocument;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn docs() -> LoadedDocuments {
        let mut docs = LoadedDocuments::new();
        for (ns, series) in [("vsom:", "VE-Series"), ("okr:", "VE-Series"), ("ppm:", "PE-Series")] {
            docs.insert(ns.into(), LoadedDocument::parse(ns, "X Ontology", series, json!({})));
        }
        docs
    }

    fn cross(from: &str, to: &str, label: &str, ns: &str) -> CrossEdge {
        CrossEdge {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            edge_type: EdgeType::CrossOntology,
            purpose: String::new(),
            source_namespace: ns.into(),
        }
    }

    #[test]
    fn test_reverse_edges_collapse() {
        let edges = vec![
            cross("vsom::A", "ppm::B", "feeds", "vsom:"),
            cross("ppm::B", "vsom::A", "reports", "ppm:"),
        ];
        let series = build_cross_series_edges(&edges, &docs());
        assert_eq!(
            series,
            vec![SeriesEdge {
                from: "PE-Series".into(),
                to: "VE-Series".into(),
                count: 2,
                bridges: vec!["feeds".into(), "reports".into()],
            }]
        );
    }

    #[test]
    fn test_same_series_and_unknown_targets_skipped() {
        let edges = vec![
            cross("vsom::A", "okr::B", "x", "vsom:"),
            cross("vsom::A", "zzz::B", "y", "vsom:"),
            cross("nope::A", "ppm::B", "z", "nope:"),
        ];
        assert!(build_cross_series_edges(&edges, &docs()).is_empty());
    }
}
