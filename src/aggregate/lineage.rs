//! Lineage chains.
//!
//! A chain is an ordered list of namespace prefixes. An edge is in a chain
//! when its endpoints are adjacent in it, in either order. A prefix present
//! in both chains is a convergence point.
//!
//! ```text
//! VE:  VSOM ─ OKR ─ VP ─ PMF ─ EFS
//!                               │
//! PE:               PPM ─ PE ─ EFS ─ EA
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::merge::merged_prefix;
use crate::registry::strip_colon;
use crate::xref::CrossEdge;

pub const DEFAULT_VE_CHAIN: [&str; 5] = ["VSOM", "OKR", "VP", "PMF", "EFS"];
pub const DEFAULT_PE_CHAIN: [&str; 4] = ["PPM", "PE", "EFS", "EA"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub ve: Vec<String>,
    pub pe: Vec<String>,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            ve: DEFAULT_VE_CHAIN.iter().map(|s| (*s).to_owned()).collect(),
            pe: DEFAULT_PE_CHAIN.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageClass {
    #[serde(rename = "isVE")]
    pub is_ve: bool,
    #[serde(rename = "isPE")]
    pub is_pe: bool,
    #[serde(rename = "isConvergence")]
    pub is_convergence: bool,
}

impl LineageClass {
    pub fn in_any_chain(&self) -> bool {
        self.is_ve || self.is_pe
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLineageRole {
    #[serde(rename = "inVE")]
    pub in_ve: bool,
    #[serde(rename = "inPE")]
    pub in_pe: bool,
    #[serde(rename = "isConvergence")]
    pub is_convergence: bool,
}

fn same_prefix(a: &str, b: &str) -> bool {
    strip_colon(a.trim()).eq_ignore_ascii_case(strip_colon(b.trim()))
}

fn contains(chain: &[String], ns: &str) -> bool {
    chain.iter().any(|p| same_prefix(p, ns))
}

fn adjacent(chain: &[String], a: &str, b: &str) -> bool {
    chain.windows(2).any(|w| {
        (same_prefix(&w[0], a) && same_prefix(&w[1], b)) || (same_prefix(&w[0], b) && same_prefix(&w[1], a))
    })
}

impl LineageConfig {
    pub fn new(ve: Vec<String>, pe: Vec<String>) -> Self {
        Self { ve, pe }
    }

    /// Prefixes present in both chains, in VE order.
    pub fn convergence(&self) -> Vec<&str> {
        self.ve
            .iter()
            .filter(|p| contains(&self.pe, p))
            .map(String::as_str)
            .collect()
    }

    pub fn is_convergence_prefix(&self, ns: &str) -> bool {
        contains(&self.ve, ns) && contains(&self.pe, ns)
    }

    /// Classify an edge between two namespaces. `is_convergence` needs a
    /// chain match and a convergence endpoint.
    pub fn classify_edge(&self, from_ns: &str, to_ns: &str) -> LineageClass {
        let is_ve = adjacent(&self.ve, from_ns, to_ns);
        let is_pe = adjacent(&self.pe, from_ns, to_ns);
        let at_convergence = self.is_convergence_prefix(from_ns) || self.is_convergence_prefix(to_ns);
        LineageClass {
            is_ve,
            is_pe,
            is_convergence: (is_ve || is_pe) && at_convergence,
        }
    }

    /// Chain membership of one namespace, independent of any edge.
    pub fn node_role(&self, ns: &str) -> NodeLineageRole {
        let in_ve = contains(&self.ve, ns);
        let in_pe = contains(&self.pe, ns);
        NodeLineageRole { in_ve, in_pe, is_convergence: in_ve && in_pe }
    }

    /// Classify a cross-edge by the prefixes of its merged endpoint ids.
    pub fn classify_cross_edge(&self, edge: &CrossEdge) -> LineageClass {
        self.classify_edge(merged_prefix(&edge.from), merged_prefix(&edge.to))
    }
}

fn default_lineage() -> &'static LineageConfig {
    static DEFAULT: OnceLock<LineageConfig> = OnceLock::new();
    DEFAULT.get_or_init(LineageConfig::default)
}

/// [`LineageConfig::classify_edge`] over the default chains.
pub fn classify_lineage_edge(from_ns: &str, to_ns: &str) -> LineageClass {
    default_lineage().classify_edge(from_ns, to_ns)
}

/// [`LineageConfig::node_role`] over the default chains.
pub fn get_node_lineage_role(ns: &str) -> NodeLineageRole {
    default_lineage().node_role(ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_adjacent_in_either_direction() {
        assert_eq!(
            classify_lineage_edge("VSOM", "OKR"),
            LineageClass { is_ve: true, is_pe: false, is_convergence: false }
        );
        assert!(classify_lineage_edge("PMF", "VP").is_ve);
        assert!(classify_lineage_edge("VP", "PMF").is_ve);
        // not adjacent
        assert!(!classify_lineage_edge("VSOM", "VP").in_any_chain());
    }

    #[test]
    fn test_convergence_needs_chain_match() {
        let c = classify_lineage_edge("PMF", "EFS");
        assert!(c.is_ve && c.is_convergence);
        let c = classify_lineage_edge("efs:", "ea");
        assert!(c.is_pe && c.is_convergence);
        // EFS endpoint, but no chain adjacency
        assert_eq!(classify_lineage_edge("EFS", "VSOM"), LineageClass::default());
    }

    #[test]
    fn test_node_roles() {
        assert_eq!(
            get_node_lineage_role("efs:"),
            NodeLineageRole { in_ve: true, in_pe: true, is_convergence: true }
        );
        assert_eq!(
            get_node_lineage_role("okr"),
            NodeLineageRole { in_ve: true, in_pe: false, is_convergence: false }
        );
        assert_eq!(get_node_lineage_role("kpi"), NodeLineageRole::default());
        assert_eq!(LineageConfig::default().convergence(), vec!["EFS"]);
    }

    #[test]
    fn test_classify_cross_edge_uses_merged_prefixes() {
        let edge = CrossEdge {
            from: "ppm::ppm:Portfolio".into(),
            to: "pe::pe:Process".into(),
            label: "x".into(),
            edge_type: EdgeType::CrossOntology,
            purpose: String::new(),
            source_namespace: "ppm:".into(),
        };
        let c = LineageConfig::default().classify_cross_edge(&edge);
        assert!(c.is_pe && !c.is_ve && !c.is_convergence);
    }

    #[test]
    fn test_custom_chains() {
        let config = LineageConfig::new(vec!["A".into(), "B".into()], vec!["B".into(), "C".into()]);
        assert_eq!(config.convergence(), vec!["B"]);
        assert!(config.classify_edge("a", "b").is_convergence);
    }
}
