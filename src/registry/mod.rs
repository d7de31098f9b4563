//! # Registry
//!
//! The collaborator-facing side of the multi-document path: a registry index
//! lists entries, each entry points at an ontology artifact, and loading the
//! whole set yields one [`LoadedDocument`] per namespace.
//!
//! ## Sources
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemorySource` | `source` | In-memory map, for embedding and tests |
//! | `FsSource` | `source` | JSON files under a root directory (`fs` feature) |

pub mod naming;
pub mod source;
pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::value::first_text;
use crate::model::{EntityType, GraphBuilder, NormalizedGraph};
use crate::parse_ontology;

pub use loader::{load_registry, load_registry_with, LoadStats, LoadedRegistry, SeriesSummary};
pub use naming::{display_name, extract_ontology_prefix, extract_short_name, resolve_series};
pub use source::{DocumentSource, MemorySource};
#[cfg(feature = "fs")]
pub use source::FsSource;

/// Description given to placeholders whose entry carries none.
pub const PLACEHOLDER_DESCRIPTION: &str = "Placeholder - ontology not yet developed";

pub const STATUS_PLACEHOLDER: &str = "placeholder";
pub const STATUS_LOAD_FAILED: &str = "load-failed";

// ============================================================================
// Registry index
// ============================================================================

/// One line of the registry index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Anything else the index carries for this entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntrySummary {
    /// `namespace`, else `@id`.
    pub fn namespace_key(&self) -> String {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&self.id)
            .to_owned()
    }

    pub fn is_placeholder(&self) -> bool {
        self.status.as_deref() == Some(STATUS_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ontologies: Vec<String>,
}

/// Series key → registration, in index order.
pub type SeriesRegistry = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryIndex {
    #[serde(default)]
    pub entries: Vec<EntrySummary>,
    #[serde(default)]
    pub series_registry: SeriesRegistry,
    #[serde(default)]
    pub namespace_registry: Value,
}

impl RegistryIndex {
    /// Series registrations in index order; malformed ones are skipped.
    pub fn series(&self) -> Vec<(String, SeriesInfo)> {
        self.series_registry
            .iter()
            .filter_map(|(key, info)| {
                serde_json::from_value::<SeriesInfo>(info.clone())
                    .ok()
                    .map(|info| (key.clone(), info))
            })
            .collect()
    }
}

/// Look up an entry by namespace prefix, ignoring case and a trailing `:`.
pub fn find_registry_entry<'a>(index: &'a RegistryIndex, prefix: &str) -> Option<&'a EntrySummary> {
    let wanted = strip_colon(prefix);
    index.entries.iter().find(|e| {
        e.namespace
            .as_deref()
            .is_some_and(|ns| strip_colon(ns).eq_ignore_ascii_case(wanted))
    })
}

/// Drop one trailing `:` from a namespace.
pub fn strip_colon(ns: &str) -> &str {
    ns.strip_suffix(':').unwrap_or(ns)
}

// ============================================================================
// Loaded documents
// ============================================================================

/// One registry entry after loading: either a parsed ontology or a
/// placeholder that stands in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedDocument {
    /// Registry entry `@id`, if the document came from a registry.
    pub entry_id: Option<String>,
    pub namespace: String,
    pub name: String,
    pub series: String,
    pub status: String,
    pub is_placeholder: bool,
    pub registry_entry: Option<Value>,
    pub raw_data: Option<Value>,
    pub parsed: NormalizedGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

/// Namespace → record. Ordered so every downstream pass is deterministic.
pub type LoadedDocuments = BTreeMap<String, LoadedDocument>;

impl LoadedDocument {
    /// Parse `raw` and wrap it as a full record.
    pub fn parse(
        namespace: impl Into<String>,
        name: impl Into<String>,
        series: impl Into<String>,
        raw: Value,
    ) -> Self {
        let name = name.into();
        let parsed = parse_ontology(&raw, &extract_short_name(&name));
        Self {
            entry_id: None,
            namespace: namespace.into(),
            name,
            series: series.into(),
            status: "active".into(),
            is_placeholder: false,
            registry_entry: None,
            raw_data: Some(raw),
            parsed,
            load_error: None,
        }
    }

    /// A record with no artifact: one `placeholder` node, no edges.
    pub fn placeholder(summary: &EntrySummary, full_entry: Option<&Value>, series: impl Into<String>) -> Self {
        let node_id = summary
            .namespace
            .as_deref()
            .map(strip_colon)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&summary.id)
            .to_owned();
        let description = full_entry
            .and_then(|e| first_text(e, &["description"]))
            .or_else(|| summary.description.clone().filter(|d| !d.is_empty()))
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_owned());

        let mut b = GraphBuilder::new(STATUS_PLACEHOLDER);
        b.add_simple(&node_id, &extract_short_name(&summary.name), EntityType::Placeholder, &description);

        let registry_entry = match full_entry {
            Some(entry) => entry.clone(),
            None => serde_json::to_value(summary).unwrap_or(Value::Null),
        };

        Self {
            entry_id: Some(summary.id.clone()).filter(|id| !id.is_empty()),
            namespace: summary.namespace_key(),
            name: summary.name.clone(),
            series: series.into(),
            status: STATUS_PLACEHOLDER.into(),
            is_placeholder: true,
            registry_entry: Some(registry_entry).filter(|e| !e.is_null()),
            raw_data: None,
            parsed: b.finish(summary.name.clone()),
            load_error: None,
        }
    }

    /// A placeholder for an entry whose fetch failed.
    pub fn failed(summary: &EntrySummary, series: impl Into<String>, error: impl Into<String>) -> Self {
        let mut record = Self::placeholder(summary, None, series);
        record.status = STATUS_LOAD_FAILED.into();
        record.load_error = Some(error.into());
        record
    }

    pub fn with_registry_entry(mut self, entry: Value) -> Self {
        if self.entry_id.is_none() {
            self.entry_id = first_text(&entry, &["@id"]);
        }
        self.registry_entry = Some(entry);
        self
    }

    pub fn with_entry_id(mut self, id: impl Into<String>) -> Self {
        self.entry_id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Namespace without its trailing `:`; the prefix of merged node ids.
    pub fn prefix(&self) -> &str {
        strip_colon(&self.namespace)
    }
}

/// Records of one series, in namespace order.
pub fn ontologies_for_series<'a>(series: &str, docs: &'a LoadedDocuments) -> Vec<&'a LoadedDocument> {
    docs.values().filter(|d| d.series == series).collect()
}

/// Find the record whose namespace prefix is `prefix`.
pub fn document_for_prefix<'a>(docs: &'a LoadedDocuments, prefix: &str) -> Option<&'a LoadedDocument> {
    docs.values().find(|d| d.prefix() == prefix)
}
