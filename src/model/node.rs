//! Node in the normalized ontology graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PropertyMap;

/// Entity classification tag.
///
/// The vocabulary is open: dialects may carry arbitrary type names (the
/// pf-ontology dialect lower-cases whatever `@type` says), so unknown tags are
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Class,
    Core,
    Framework,
    Supporting,
    Agent,
    External,
    Layer,
    Concept,
    Series,
    Ontology,
    Placeholder,
    Default,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Class => "class",
            EntityType::Core => "core",
            EntityType::Framework => "framework",
            EntityType::Supporting => "supporting",
            EntityType::Agent => "agent",
            EntityType::External => "external",
            EntityType::Layer => "layer",
            EntityType::Concept => "concept",
            EntityType::Series => "series",
            EntityType::Ontology => "ontology",
            EntityType::Placeholder => "placeholder",
            EntityType::Default => "default",
            EntityType::Other(s) => s,
        }
    }

    /// Meta types are structural scaffolding, not domain entities. They are
    /// excluded from connectivity scoring.
    pub fn is_meta(&self) -> bool {
        matches!(self, EntityType::External | EntityType::Core | EntityType::Layer)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        match s {
            "class" => EntityType::Class,
            "core" => EntityType::Core,
            "framework" => EntityType::Framework,
            "supporting" => EntityType::Supporting,
            "agent" => EntityType::Agent,
            "external" => EntityType::External,
            "layer" => EntityType::Layer,
            "concept" => EntityType::Concept,
            "series" => EntityType::Series,
            "ontology" => EntityType::Ontology,
            "placeholder" => EntityType::Placeholder,
            "default" => EntityType::Default,
            other => EntityType::Other(other.to_owned()),
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        EntityType::from(s.as_str())
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_owned()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex of a normalized graph.
///
/// Created once during normalization and never mutated afterwards. The merge
/// step copies nodes into new records instead of touching the source graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Node {
    /// A bare node: label defaults to the id, type to `default`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            entity_type: EntityType::Default,
            description: String::new(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.is_empty() {
            self.label = label;
        }
        self
    }

    pub fn with_type(mut self, entity_type: impl Into<EntityType>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn is_external(&self) -> bool {
        self.entity_type == EntityType::External
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
