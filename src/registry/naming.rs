//! Name heuristics for registry entries.
//!
//! Each function is an ordered list of pattern attempts; the first match
//! wins. Cross-reference resolution depends on these matching exactly the
//! same way every time, so the order is part of the contract.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::SeriesInfo;
use crate::model::value::first_text;

fn entry_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Entry-ONT-([A-Z0-9-]+)-\d+").expect("entry id regex must compile"))
}

fn entry_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([A-Z0-9-]+)\s+Ontology").expect("entry name regex must compile"))
}

fn mcsb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(MCSB\s*v?\d*)\s").expect("mcsb regex must compile"))
}

fn curie_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([a-z-]+):").expect("curie prefix regex must compile"))
}

fn path_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)/([a-z-]+)/(?:schema|ontology)?$").expect("path prefix regex must compile")
    })
}

fn alternate_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([A-Z-]+)-ONT$").expect("alternate name regex must compile"))
}

fn ontology_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+Ontology.*$").expect("ontology suffix regex must compile"))
}

/// Short ontology name from an entry name or id.
///
/// 1. `Entry-ONT-EMC-001` → `EMC`
/// 2. `EMC Ontology (Enterprise Model Composition)` → `EMC`
/// 3. `MCSB v2 Ontology` → `MCSBv2`
/// 4. anything else is returned unchanged
pub fn extract_short_name(name_or_id: &str) -> String {
    if let Some(caps) = entry_id_re().captures(name_or_id) {
        return caps[1].to_owned();
    }
    if let Some(caps) = entry_name_re().captures(name_or_id) {
        return caps[1].to_owned();
    }
    if let Some(caps) = mcsb_re().captures(name_or_id) {
        return caps[1].split_whitespace().collect();
    }
    name_or_id.to_owned()
}

fn same_short_name(registered: &str, short: &str) -> bool {
    let strip = |s: &str| s.replace('-', "").to_uppercase();
    registered.eq_ignore_ascii_case(short) || strip(registered) == strip(short)
}

/// Series key whose registration lists the entry's short name, in
/// registry order; `default` if none does.
pub fn resolve_series<'a, I>(entry_name: &str, series: I, default: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a SeriesInfo)>,
{
    let short = extract_short_name(entry_name);
    series
        .into_iter()
        .find(|(_, info)| info.ontologies.iter().any(|o| same_short_name(o, &short)))
        .map_or_else(|| default.to_owned(), |(key, _)| key.to_owned())
}

/// Namespace prefix a document declares for itself, lower-cased with a
/// trailing `:`.
///
/// Tried in order: a CURIE-style `@id`/`id` (`vsom:ontology`), a path-style
/// id ending in `/<prefix>/`, `/<prefix>/schema` or `/<prefix>/ontology`,
/// then an `alternateName` of the form `VSOM-ONT`.
pub fn extract_ontology_prefix(doc: &Value) -> Option<String> {
    let from_id = first_text(doc, &["@id", "id"]).and_then(|id| {
        curie_prefix_re()
            .captures(&id)
            .or_else(|| path_prefix_re().captures(&id))
            .map(|caps| caps[1].to_owned())
    });
    let prefix = from_id.or_else(|| {
        let alt = first_text(doc, &["alternateName"])?;
        alternate_name_re().captures(&alt).map(|caps| caps[1].to_owned())
    })?;
    Some(format!("{}:", prefix.to_lowercase()))
}

/// Entry name without its trailing ` Ontology ...` qualifier.
pub fn display_name(name: &str) -> String {
    ontology_suffix_re().replace(name, "").into_owned()
}
