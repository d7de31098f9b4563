//! Edge (directed, labeled relationship) in the normalized graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relationship classification tag.
///
/// Only styling cares about most of these, but lineage classification and
/// the audit exclusions read the type, so it is kept typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
    Relationship,
    Inheritance,
    Binding,
    CrossOntology,
    Dependency,
    CrossSeries,
    Other(String),
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Relationship => "relationship",
            EdgeType::Inheritance => "inheritance",
            EdgeType::Binding => "binding",
            EdgeType::CrossOntology => "crossOntology",
            EdgeType::Dependency => "dependency",
            EdgeType::CrossSeries => "crossSeries",
            EdgeType::Other(s) => s,
        }
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        match s {
            "relationship" => EdgeType::Relationship,
            "inheritance" => EdgeType::Inheritance,
            "binding" => EdgeType::Binding,
            "crossOntology" => EdgeType::CrossOntology,
            "dependency" => EdgeType::Dependency,
            "crossSeries" => EdgeType::CrossSeries,
            other => EdgeType::Other(other.to_owned()),
        }
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        EdgeType::from(s.as_str())
    }
}

impl From<EdgeType> for String {
    fn from(t: EdgeType) -> Self {
        t.as_str().to_owned()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            edge_type,
        }
    }
}
