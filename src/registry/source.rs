//! Document sources: where registry indexes, entries and artifacts come from.
//!
//! The loader only ever asks for a JSON document by relative path. Retries,
//! timeouts and caching belong to the source, not the loader.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::{Error, Result};

/// Anything that can produce a JSON document for a relative path.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch and decode the document at `path` (already normalized).
    async fn fetch(&self, path: &str) -> Result<Value>;
}

/// Resolve `.` and `..` segments and drop a leading `./`.
///
/// `..` above the root is kept, so paths that step outside the registry
/// directory stay distinct.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." if parts.last().is_some_and(|p| *p != "..") => {
                parts.pop();
            }
            _ => parts.push(seg),
        }
    }
    parts.join("/")
}

// ============================================================================
// MemorySource
// ============================================================================

/// In-memory document store keyed by normalized path.
#[derive(Clone, Default)]
pub struct MemorySource {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, doc: Value) {
        self.inner.docs.write().insert(normalize_path(path), doc);
    }

    pub fn with_document(self, path: &str, doc: Value) -> Self {
        self.insert(path, doc);
        self
    }

    pub fn len(&self) -> usize {
        self.inner.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.docs.read().is_empty()
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let key = normalize_path(path);
        self.inner
            .docs
            .read()
            .get(&key)
            .cloned()
            .ok_or(Error::NotFound(key))
    }
}

// ============================================================================
// FsSource
// ============================================================================

/// JSON files under a root directory.
#[cfg(feature = "fs")]
#[derive(Debug, Clone)]
pub struct FsSource {
    root: std::path::PathBuf,
}

#[cfg(feature = "fs")]
impl FsSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(feature = "fs")]
#[async_trait]
impl DocumentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let full = self.root.join(normalize_path(path));
        let bytes = match tokio::fs::read(&full).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::Fetch { path: full.display().to_string(), message: e.to_string() });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./entries/a.json"), "entries/a.json");
        assert_eq!(normalize_path("entries/../pfc/x.jsonld"), "pfc/x.jsonld");
        assert_eq!(normalize_path("../outside/x.json"), "../outside/x.json");
        assert_eq!(normalize_path("a//b/./c"), "a/b/c");
    }

    #[tokio::test]
    async fn test_memory_source_fetch() {
        let source = MemorySource::new().with_document("./index.json", json!({"entries": []}));
        assert_eq!(source.len(), 1);
        let doc = source.fetch("index.json").await.unwrap();
        assert_eq!(doc["entries"], json!([]));
    }

    #[tokio::test]
    async fn test_memory_source_missing() {
        let source = MemorySource::new();
        let err = source.fetch("nope.json").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p == "nope.json"));
    }
}
