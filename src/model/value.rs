//! Tolerant accessors over raw JSON documents.
//!
//! Ontology documents in the wild are loosely shaped: the same field may be a
//! string, a list, an object with an `@id`, or absent. Every read in the
//! normalizer and the gates goes through these helpers so that a missing or
//! oddly typed field degrades to "not present" instead of failing.

use serde_json::Value;

/// JSON truthiness as ontology authors expect it: `null`, `false`, `0`,
/// `""` are absent; everything else (including empty containers) is present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Scalar rendered as text. Containers and `null` have no text form.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `value[key]` if it is present and truthy.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

/// `true` when `value[key]` is present and truthy.
pub fn has(value: &Value, key: &str) -> bool {
    field(value, key).is_some()
}

/// First truthy field among `keys`, in order.
pub fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| field(value, k))
}

/// First truthy field among `keys` that has a text form.
pub fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| field(value, k).and_then(text))
}

/// Text of a truthy field, or the empty string.
pub fn text_or_empty(value: &Value, keys: &[&str]) -> String {
    first_text(value, keys).unwrap_or_default()
}

/// The elements of an array field, or an empty slice for anything else.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Normalize a one-or-many field into a list: arrays yield their elements,
/// any other truthy value yields itself, falsy values yield nothing.
pub fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v) if is_truthy(v) => vec![v],
        _ => Vec::new(),
    }
}

/// Resolve a reference that may be a bare id string or an `{ "@id": ... }`
/// object.
pub fn ref_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => first_text(value, &["@id", "id"]),
        v if is_truthy(v) => text(v),
        _ => None,
    }
}

/// Local part of a CURIE or IRI: everything after the last `:` or `#`.
pub fn local_name(id: &str) -> &str {
    match id.rfind([':', '#']) {
        Some(pos) => &id[pos + 1..],
        None => id,
    }
}

/// Everything after the last `:` only. Some dialects strip prefixes this way
/// and leave `#` fragments intact.
pub fn after_last_colon(id: &str) -> &str {
    match id.rfind(':') {
        Some(pos) => &id[pos + 1..],
        None => id,
    }
}
