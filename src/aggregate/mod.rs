//! # Aggregation
//!
//! Views over the resolved cross-document edges:
//!
//! | View | Module | Output |
//! |------|--------|--------|
//! | Series rollup | `series` | one edge per unordered series pair |
//! | Bridge nodes | `bridge` | entities referenced by ≥ N documents |
//! | Lineage | `lineage` | chain membership of edges and namespaces |
//!
//! All three are pure functions of the cross-edge list and the loaded
//! document map.

pub mod bridge;
pub mod lineage;
pub mod series;

pub use bridge::{detect_bridge_nodes, BridgeNode};
pub use lineage::{
    classify_lineage_edge, get_node_lineage_role, LineageClass, LineageConfig, NodeLineageRole,
};
pub use series::{build_cross_series_edges, SeriesEdge};
