//! Registry loading.
//!
//! ```text
//! index.json ─► entries[] ─► entries/<entry>.json ─► artifacts.ontology
//!                                   │                      │
//!                                   ▼                      ▼
//!                            placeholder record      parse_ontology
//! ```
//!
//! Every entry settles before [`load_registry`] returns. A failed fetch never
//! aborts the load: the entry becomes a `load-failed` placeholder so every
//! namespace in the index still resolves to a record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::source::{normalize_path, DocumentSource};
use super::{
    resolve_series, EntrySummary, LoadedDocument, LoadedDocuments, RegistryIndex, SeriesInfo,
    STATUS_LOAD_FAILED,
};
use crate::config::AnalysisConfig;
use crate::model::value::first_text;
use crate::{Error, Result};

/// Per-series roll-up of the loaded set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub name: String,
    pub description: String,
    pub ontologies: Vec<String>,
    /// Loaded records assigned to this series.
    pub count: usize,
}

/// `loaded` counts every settled entry, whatever its outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub total: usize,
    pub loaded: usize,
    pub placeholders: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    pub index: RegistryIndex,
    pub documents: LoadedDocuments,
    pub series: BTreeMap<String, SeriesSummary>,
    pub namespace_registry: Value,
    pub stats: LoadStats,
}

/// Load the registry at `index_path` with default settings.
pub async fn load_registry<S>(source: &S, index_path: &str) -> Result<LoadedRegistry>
where
    S: DocumentSource + ?Sized,
{
    load_registry_with(source, index_path, &AnalysisConfig::default()).await
}

/// Load the registry at `index_path`. Entry and artifact paths are resolved
/// against the directory holding the index.
pub async fn load_registry_with<S>(source: &S, index_path: &str, config: &AnalysisConfig) -> Result<LoadedRegistry>
where
    S: DocumentSource + ?Sized,
{
    let raw_index = source.fetch(index_path).await?;
    let index: RegistryIndex = serde_json::from_value(raw_index)?;
    if index.entries.is_empty() {
        return Err(Error::Registry(format!("no entries found in {index_path}")));
    }

    let base = base_dir(index_path);
    let series_list = index.series();
    let mut documents = LoadedDocuments::new();
    let mut stats = LoadStats { total: index.entries.len(), ..LoadStats::default() };

    for summary in &index.entries {
        let series = resolve_series(
            &summary.name,
            series_list.iter().map(|(key, info)| (key.as_str(), info)),
            &config.default_series,
        );

        let record = match load_entry(source, &base, summary, &series).await {
            Ok(record) => record,
            Err(err) => {
                warn!(entry = %summary.name, error = %err, "failed to load registry entry");
                LoadedDocument::failed(summary, series, err.to_string())
            }
        };

        stats.loaded += 1;
        if record.status == STATUS_LOAD_FAILED {
            stats.failed += 1;
        } else if record.is_placeholder {
            stats.placeholders += 1;
        }
        documents.insert(summary.namespace_key(), record);
    }

    let series = summarize_series(&series_list, &documents);
    info!(
        total = stats.total,
        loaded = stats.loaded,
        placeholders = stats.placeholders,
        failed = stats.failed,
        "registry loaded"
    );

    Ok(LoadedRegistry {
        namespace_registry: index.namespace_registry.clone(),
        index,
        documents,
        series,
        stats,
    })
}

async fn load_entry<S>(source: &S, base: &str, summary: &EntrySummary, series: &str) -> Result<LoadedDocument>
where
    S: DocumentSource + ?Sized,
{
    let entry_path = summary
        .path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::Registry(format!("entry {} has no path", summary.id)))?;
    let full_entry = source.fetch(&join(base, entry_path)).await?;

    let artifact = full_entry.get("artifacts").and_then(|a| first_text(a, &["ontology"]));
    let artifact = match artifact {
        Some(path) if !summary.is_placeholder() => path,
        _ => {
            debug!(entry = %summary.name, "no artifact, using placeholder");
            return Ok(LoadedDocument::placeholder(summary, Some(&full_entry), series));
        }
    };

    let artifact_path = join(base, &format!("entries/{}", strip_dot_slash(&artifact)));
    let raw = source.fetch(&artifact_path).await?;

    let mut record = LoadedDocument::parse(summary.namespace_key(), summary.name.clone(), series, raw)
        .with_registry_entry(full_entry);
    if !summary.id.is_empty() {
        record = record.with_entry_id(summary.id.clone());
    }
    if let Some(status) = summary.status.as_deref().filter(|s| !s.is_empty()) {
        record = record.with_status(status);
    }
    Ok(record)
}

fn summarize_series(series: &[(String, SeriesInfo)], docs: &LoadedDocuments) -> BTreeMap<String, SeriesSummary> {
    series
        .iter()
        .map(|(key, info)| {
            let summary = SeriesSummary {
                name: info.name.clone(),
                description: info.description.clone(),
                ontologies: info.ontologies.clone(),
                count: docs.values().filter(|d| &d.series == key).count(),
            };
            (key.clone(), summary)
        })
        .collect()
}

fn strip_dot_slash(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// Directory part of `path`, with a trailing `/`, or empty.
fn base_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(pos) => path[..=pos].to_owned(),
        None => String::new(),
    }
}

fn join(base: &str, rel: &str) -> String {
    normalize_path(&format!("{base}{}", strip_dot_slash(rel)))
}
