//! Fallback for unrecognized documents.
//!
//! Every top-level plain object becomes a `concept` under a synthetic root
//! (with its own plain-object members one level down), and every top-level
//! array of objects becomes a batch of `class` children. Scalars are ignored.

use serde_json::Value;

use crate::model::property_map::properties_of;
use crate::model::value::{first_text, text_or_empty};
use crate::model::{EdgeType, EntityType, GraphBuilder, PropertyMap};

const ROOT: &str = "root";

pub(super) fn build(doc: &Value, source: &str, b: &mut GraphBuilder) {
    b.add_simple(ROOT, source, EntityType::Core, "Root");

    let Some(members) = doc.as_object() else {
        return;
    };

    for (key, value) in members {
        if key.starts_with('@') || key.starts_with('$') {
            continue;
        }
        match value {
            Value::Object(inner) => {
                let label = first_text(value, &["name", "label"]).unwrap_or_else(|| key.clone());
                let entity_type = first_text(value, &["entityType", "type"]).unwrap_or_else(|| "concept".into());
                b.add_simple(key, &label, entity_type, &text_or_empty(value, &["description"]));
                b.add_edge(ROOT, key, "contains", EdgeType::Relationship);

                for (child_key, child) in inner {
                    if !child.is_object() || child_key.starts_with('@') {
                        continue;
                    }
                    let child_id = format!("{key}.{child_key}");
                    let label = first_text(child, &["name", "label"]).unwrap_or_else(|| child_key.clone());
                    let entity_type = first_text(child, &["entityType"]).unwrap_or_else(|| "supporting".into());
                    b.add_simple(&child_id, &label, entity_type, &text_or_empty(child, &["description"]));
                    b.add_edge(key, &child_id, child_key, EdgeType::Relationship);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !(item.is_object() || item.is_array()) {
                        continue;
                    }
                    let id = first_text(item, &["id", "name"]).unwrap_or_else(|| format!("{key}_{i}"));
                    let label = first_text(item, &["name", "label"]).unwrap_or_else(|| id.clone());
                    let entity_type = first_text(item, &["entityType", "type"]).unwrap_or_else(|| "class".into());
                    let properties: PropertyMap = properties_of(item);
                    b.add_node(&id, &label, entity_type, &text_or_empty(item, &["description"]), properties);
                    b.add_edge(ROOT, &id, key, EdgeType::Relationship);
                }
            }
            _ => {}
        }
    }
}
