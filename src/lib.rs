//! # ontograph: Ontology Normalization and Cross-Reference Resolution
//!
//! Reads JSON ontology documents in any of several dialects, normalizes them
//! into one entity/relationship graph shape, audits and validates them, and
//! merges whole registries of documents into a single graph with the
//! references that cross document boundaries resolved.
//!
//! ## Design Principles
//!
//! 1. **Never throw on input**: a malformed document degrades to a smaller
//!    (possibly empty) graph; a failed fetch degrades to a placeholder record
//! 2. **Clean DTOs**: `Node`, `Edge`, `NormalizedGraph` cross all stages
//! 3. **Pure core**: normalizer, auditor, validator, merger, resolver and
//!    aggregation are functions of their inputs; only loading is async
//! 4. **Deterministic**: ordered maps and insertion-ordered scans throughout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ontograph::{analyze_document, analyze_registry, load_registry, AnalysisConfig, MemorySource};
//!
//! # async fn example(doc: serde_json::Value, source: MemorySource) -> ontograph::Result<()> {
//! // Single document
//! let analysis = analyze_document(&doc, "vsom");
//! println!("{} nodes, overall {}", analysis.graph.node_count(), analysis.validation.overall);
//!
//! // Whole registry
//! let registry = load_registry(&source, "registry/index.json").await?;
//! let result = analyze_registry(&registry.documents, &AnalysisConfig::default());
//! for bridge in &result.bridges {
//!     println!("{} referenced by {:?}", bridge.id, bridge.referencing_ontologies);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Input → Output |
//! |-------|--------|----------------|
//! | Normalize | `parser` | JSON → `NormalizedGraph` |
//! | Audit | `audit` | graph → `AuditResult` |
//! | Validate | `validation` | JSON + graph → `ValidationResult` |
//! | Load | `registry` | `DocumentSource` → `LoadedDocuments` |
//! | Merge | `merge` | `LoadedDocuments` → `MergedGraph` |
//! | Resolve | `xref` | `LoadedDocuments` + `MergedGraph` → `CrossEdge`s |
//! | Aggregate | `aggregate` | `CrossEdge`s → series edges, bridges, lineage |
//! | Report | `report` | all of the above → `AuditReport` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod format;
pub mod parser;
pub mod audit;
pub mod validation;
pub mod registry;
pub mod merge;
pub mod xref;
pub mod aggregate;
pub mod report;
pub mod config;

use serde_json::Value;
use tracing::info;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Diagnostics, Edge, EdgeType, EntityType, Node, NormalizedGraph, PropertyMap};

// ============================================================================
// Re-exports: Single-document path
// ============================================================================

pub use format::{detect_format, FormatTag};
pub use parser::{parse_as, parse_ontology};
pub use audit::{audit_graph, AuditResult};
pub use validation::{validate, GateResult, GateStatus, GateSummary, ValidationResult};
pub use report::{generate_audit_report, AuditReport, RegistryMatch};

// ============================================================================
// Re-exports: Multi-document path
// ============================================================================

pub use registry::{
    find_registry_entry, load_registry, load_registry_with, ontologies_for_series, DocumentSource,
    LoadedDocument, LoadedDocuments, LoadedRegistry, MemorySource, RegistryIndex,
};
#[cfg(feature = "fs")]
pub use registry::FsSource;
pub use merge::{build_merged_graph, MergedGraph, NodeIndex};
pub use xref::{detect_cross_references, parse_prefixed_ref, CrossEdge};
pub use aggregate::{
    build_cross_series_edges, classify_lineage_edge, detect_bridge_nodes, get_node_lineage_role,
    BridgeNode, LineageClass, LineageConfig, NodeLineageRole, SeriesEdge,
};
pub use config::AnalysisConfig;

// ============================================================================
// Top-level analysis
// ============================================================================

/// Everything the single-document path produces for one document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub graph: NormalizedGraph,
    pub audit: AuditResult,
    pub validation: ValidationResult,
}

impl DocumentAnalysis {
    /// Zero nodes: the caller should tell the user the document was not
    /// understood.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

/// Normalize, audit and validate one document.
pub fn analyze_document(doc: &Value, source: &str) -> DocumentAnalysis {
    let graph = parse_ontology(doc, source);
    let audit = audit_graph(&graph);
    let validation = validate(doc, Some(&graph));
    DocumentAnalysis { graph, audit, validation }
}

/// Everything the multi-document path produces for one loaded registry.
#[derive(Debug, Clone)]
pub struct RegistryAnalysis {
    pub merged: MergedGraph,
    pub cross_edges: Vec<CrossEdge>,
    pub series_edges: Vec<SeriesEdge>,
    pub bridges: Vec<BridgeNode>,
}

impl RegistryAnalysis {
    /// Cross-edges with their lineage classification under `lineage`.
    pub fn classified_edges<'a>(
        &'a self,
        lineage: &'a LineageConfig,
    ) -> impl Iterator<Item = (&'a CrossEdge, LineageClass)> + 'a {
        self.cross_edges.iter().map(move |e| (e, lineage.classify_cross_edge(e)))
    }
}

/// Merge, resolve and aggregate a fully loaded document set.
pub fn analyze_registry(docs: &LoadedDocuments, config: &AnalysisConfig) -> RegistryAnalysis {
    let merged = build_merged_graph(docs);
    let cross_edges = detect_cross_references(docs, &merged);
    let series_edges = build_cross_series_edges(&cross_edges, docs);
    let bridges = detect_bridge_nodes(&cross_edges, docs, config.bridge_threshold);

    info!(
        documents = docs.len(),
        nodes = merged.node_count(),
        edges = merged.edge_count(),
        cross_edges = cross_edges.len(),
        series_edges = series_edges.len(),
        bridges = bridges.len(),
        "registry analyzed"
    );

    RegistryAnalysis { merged, cross_edges, series_edges, bridges }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors only arise on the loading side; the analysis core never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error for {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
