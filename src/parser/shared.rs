//! Patterns that recur across dialects: `subClassOf` parents and
//! domain/range cartesian expansion.

use serde_json::Value;

use crate::model::value::{after_last_colon, first_field, local_name, one_or_many, ref_id};
use crate::model::{EdgeType, EntityType, GraphBuilder};

/// How a synthesized endpoint derives its label from its id.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StubLabel {
    /// After the last `:` or `#`.
    LocalName,
    /// After the last `:` only.
    AfterColon,
    /// The id itself.
    Verbatim,
}

impl StubLabel {
    fn apply(self, id: &str) -> &str {
        match self {
            StubLabel::LocalName => local_name(id),
            StubLabel::AfterColon => after_last_colon(id),
            StubLabel::Verbatim => id,
        }
    }
}

/// Shape of a node synthesized for a referenced-but-undeclared id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stub {
    pub label: StubLabel,
    pub entity_type: &'static str,
    pub description: &'static str,
}

impl Stub {
    pub const fn external(label: StubLabel, description: &'static str) -> Self {
        Self { label, entity_type: "external", description }
    }

    pub const fn class(label: StubLabel) -> Self {
        Self { label, entity_type: "class", description: "" }
    }

    /// Insert the stub; a no-op if the id is already declared.
    pub fn ensure(self, b: &mut GraphBuilder, id: &str) {
        if !b.contains(id) {
            b.add_simple(id, self.label.apply(id), EntityType::from(self.entity_type), self.description);
        }
    }
}

/// Resolve a `subClassOf`-style value (bare id or `{ "@id": ... }`) and add an
/// `inheritance` edge from `child` to it, synthesizing the parent if needed.
pub(crate) fn link_parent(b: &mut GraphBuilder, child: &str, parent: Option<&Value>, stub: Stub) {
    let Some(parent_id) = parent.and_then(ref_id) else {
        return;
    };
    stub.ensure(b, &parent_id);
    b.add_edge(child, &parent_id, "subClassOf", EdgeType::Inheritance);
}

/// One-or-many reference list from the first truthy key, flattened to ids.
pub(crate) fn refs(value: &Value, keys: &[&str]) -> Vec<String> {
    one_or_many(first_field(value, keys))
        .into_iter()
        .filter_map(ref_id)
        .collect()
}

/// Cartesian product of two reference lists.
pub(crate) fn pairs(domains: &[String], ranges: &[String]) -> Vec<(String, String)> {
    domains
        .iter()
        .flat_map(|d| ranges.iter().map(move |r| (d.clone(), r.clone())))
        .collect()
}

/// Add one edge per domain/range pair, synthesizing missing endpoints first.
pub(crate) fn link_pairs(
    b: &mut GraphBuilder,
    domains: &[String],
    ranges: &[String],
    label: &str,
    edge_type: EdgeType,
    stub: Stub,
) {
    for (d, r) in pairs(domains, ranges) {
        stub.ensure(b, &d);
        stub.ensure(b, &r);
        b.add_edge(&d, &r, label, edge_type.clone());
    }
}

pub(crate) const DOMAIN_INCLUDES: [&str; 2] = ["domainIncludes", "oaa:domainIncludes"];
pub(crate) const RANGE_INCLUDES: [&str; 2] = ["rangeIncludes", "oaa:rangeIncludes"];
/// `domainIncludes`, falling back to a single `domain`.
pub(crate) const DOMAIN_OR_SINGLE: [&str; 3] = ["domainIncludes", "oaa:domainIncludes", "domain"];
/// `rangeIncludes`, falling back to a single `range`.
pub(crate) const RANGE_OR_SINGLE: [&str; 3] = ["rangeIncludes", "oaa:rangeIncludes", "range"];
