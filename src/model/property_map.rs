//! PropertyMap: the opaque metadata bag carried by every node.

use serde_json::Value;

/// Dialect-specific metadata preserved verbatim from the source document.
///
/// The core only ever reads a handful of known keys (`subClassOf`,
/// `schemaOrgBase`, ...). Everything else is passed through untouched.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Copy an arbitrary JSON value into a property bag.
///
/// Objects are cloned as-is; anything else yields an empty bag.
pub fn properties_of(value: &Value) -> PropertyMap {
    match value {
        Value::Object(map) => map.clone(),
        _ => PropertyMap::new(),
    }
}
