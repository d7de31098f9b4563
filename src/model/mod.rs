//! # Normalized Ontology Graph Model
//!
//! Clean DTOs shared by every stage: normalizer → auditor/validator on the
//! single-document path, merger → resolver → aggregation on the
//! multi-document path.
//!
//! Design rule: this module is pure data. No I/O, no logging, no async.

pub mod node;
pub mod edge;
pub mod graph;
pub mod value;
pub mod property_map;

pub use node::{Node, EntityType};
pub use edge::{Edge, EdgeType};
pub use graph::{NormalizedGraph, Diagnostics, GraphBuilder, STUB_DESCRIPTION};
pub use property_map::PropertyMap;
