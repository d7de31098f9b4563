//! Individual gate checks. Each is independent of the others.

use std::sync::OnceLock;

use hashbrown::HashSet;
use regex::Regex;
use serde_json::Value;

use super::{GateResult, GateStatus};
use crate::audit::connected_components;
use crate::model::value::{field, first_field, first_text, has, text};
use crate::model::{EntityType, NormalizedGraph};

const G1: &str = "G1: Schema Structure";
const G2: &str = "G2: Relationship Cardinality";
const G2B: &str = "G2B: Entity Connectivity";
const G2C: &str = "G2C: Graph Connectivity";
const G3: &str = "G3: Business Rules";
const G4: &str = "G4: Semantic Consistency";
const G5: &str = "G5: Completeness";
const G6: &str = "G6: UniRegistry Format";

const SHOWN_WARNINGS: usize = 5;

fn cardinality_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(0|1|\*|n|m)((\.\.)|(:))?(0|1|\*|n|m)?$").expect("cardinality regex must compile")
    })
}

fn if_then_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^IF\s+.+\s+THEN\s+.+$").expect("if-then regex must compile"))
}

fn expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Za-z_][A-Za-z0-9_.]*\s*(==|!=|>|<|>=|<=|&&|\|\||\s+AND\s+|\s+OR\s+)")
            .expect("expression regex must compile")
    })
}

fn pascal_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("pascal-case regex must compile"))
}

fn no_parsed_data(gate: &str) -> GateResult {
    GateResult::with_status(gate, GateStatus::Warn, vec![], vec!["No parsed data".into()], "Cannot validate")
}

/// `Math.round`-style percentage; 0 when the denominator is 0.
fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as usize
}

/// Scalars as text; containers as their JSON form.
fn display(value: &Value) -> String {
    text(value).unwrap_or_else(|| value.to_string())
}

/// `ontologyDefinition`, or `null` when absent.
fn definition(doc: &Value) -> &Value {
    doc.get("ontologyDefinition").unwrap_or(&Value::Null)
}

/// First truthy `keys` value on `doc`, falling back to the same lookup inside
/// `ontologyDefinition`.
fn with_definition<'a>(doc: &'a Value, keys: &[&str], def_keys: &[&str]) -> Option<&'a Value> {
    first_field(doc, keys).or_else(|| first_field(definition(doc), def_keys))
}

fn as_list(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

// ============================================================================
// Raw-document gates
// ============================================================================

pub(super) fn schema_structure(doc: &Value) -> GateResult {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if !has(doc, "@context") {
        warnings.push("Missing @context (not strict JSON-LD)".to_owned());
    }
    if first_field(doc, &["@id", "id", "name"]).is_none() {
        issues.push("Missing ontology identifier (@id, id, or name)".to_owned());
    }

    let entities = with_definition(doc, &["entities", "hasDefinedTerm", "@graph"], &["entities", "@graph"]);
    if entities.is_none() {
        issues.push("No entities found (entities, hasDefinedTerm, or @graph)".to_owned());
    }
    for (i, entity) in as_list(entities).iter().enumerate() {
        if first_field(entity, &["@id", "id", "name"]).is_none() {
            issues.push(format!("Entity {i}: missing identifier"));
        }
    }

    let detail = if issues.is_empty() {
        "Valid JSON structure".to_owned()
    } else {
        format!("{} issue(s) found", issues.len())
    };
    GateResult::from_findings(G1, issues, warnings, detail)
}

pub(super) fn relationship_cardinality(doc: &Value) -> GateResult {
    let relationships = as_list(with_definition(doc, &["relationships"], &["relationships"]));
    if relationships.is_empty() {
        return GateResult::with_status(
            G2,
            GateStatus::Warn,
            vec![],
            vec!["No explicit relationships defined".into()],
            "No relationships to validate",
        );
    }

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    for (i, rel) in relationships.iter().enumerate() {
        let name = first_text(rel, &["name", "@id", "rdfs:label"]).unwrap_or_else(|| format!("Relationship {i}"));

        let domain_keys = ["domainIncludes", "domain", "source", "rdfs:domain", "schema:domainIncludes", "oaa:domainIncludes"];
        if first_field(rel, &domain_keys).is_none() {
            issues.push(format!("{name}: missing domain"));
        }
        let range_keys = ["rangeIncludes", "range", "target", "rdfs:range", "schema:rangeIncludes", "oaa:rangeIncludes"];
        if first_field(rel, &range_keys).is_none() {
            issues.push(format!("{name}: missing range"));
        }

        if let Some(cardinality) = first_field(rel, &["cardinality", "oaa:cardinality"]).map(display) {
            if !cardinality_re().is_match(&cardinality) {
                warnings.push(format!("{name}: non-standard cardinality notation \"{cardinality}\""));
            }
        }
    }

    let detail = format!("{} relationship(s) checked", relationships.len());
    GateResult::from_findings(G2, issues, warnings, detail)
}

pub(super) fn business_rules(doc: &Value) -> GateResult {
    let rules = as_list(with_definition(doc, &["businessRules", "rules"], &["businessRules"]));
    if rules.is_empty() {
        return GateResult::with_status(
            G3,
            GateStatus::Warn,
            vec![],
            vec!["No business rules defined".into()],
            "Consider adding IF-THEN business rules",
        );
    }

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut compliant = 0;
    for (i, rule) in rules.iter().enumerate() {
        let name = first_text(rule, &["name", "@id", "id"]).unwrap_or_else(|| format!("Rule {}", i + 1));

        let condition_action = match (field(rule, "condition"), field(rule, "action")) {
            (Some(c), Some(a)) => Some((display(c), display(a))),
            _ => None,
        };
        let rule_text = match &condition_action {
            Some((c, a)) => format!("{c} {a}"),
            None => first_text(rule, &["expression", "rule", "description"]).unwrap_or_default(),
        };

        if if_then_re().is_match(&rule_text) {
            compliant += 1;
        } else if let Some((condition, action)) = &condition_action {
            if condition.to_uppercase().starts_with("IF") && action.to_uppercase().contains("MUST") {
                compliant += 1;
            } else {
                warnings.push(format!("{name}: condition/action should use IF...THEN format"));
            }
        } else if expression_re().is_match(&rule_text) {
            warnings.push(format!("{name}: has expression but not IF-THEN format"));
        } else if rule_text.trim().is_empty() {
            issues.push(format!("{name}: empty rule expression"));
        } else {
            warnings.push(format!("{name}: convert to IF-THEN format"));
        }

        if !has(rule, "severity") {
            warnings.push(format!("{name}: missing severity (error/warning/info)"));
        }
    }

    let pct = percent(compliant, rules.len());
    let status = if !issues.is_empty() {
        GateStatus::Fail
    } else if pct < 80 {
        GateStatus::Warn
    } else {
        GateStatus::Pass
    };
    warnings.truncate(SHOWN_WARNINGS);
    let detail = format!("{pct}% rules in IF-THEN format ({compliant}/{})", rules.len());
    GateResult::with_status(G3, status, issues, warnings, detail)
}

pub(super) fn completeness(doc: &Value, graph: Option<&NormalizedGraph>) -> GateResult {
    let mut warnings = Vec::new();

    if first_field(doc, &["metadata", "registryMetadata", "@context"]).is_none() {
        warnings.push("No metadata block found".to_owned());
    } else {
        let meta = first_field(doc, &["metadata", "registryMetadata"]).unwrap_or(&Value::Null);
        let has_version = has(meta, "version")
            || first_field(doc, &["version", "oaa:moduleVersion", "owl:versionInfo"]).is_some();
        if !has_version {
            warnings.push("Missing version".to_owned());
        }
        let has_author = first_field(meta, &["author", "creator"]).is_some()
            || first_field(doc, &["author", "creator"]).is_some();
        if !has_author {
            warnings.push("Missing author/creator".to_owned());
        }
    }

    let entities = as_list(with_definition(doc, &["entities", "hasDefinedTerm"], &["entities", "@graph"]));
    let missing_type = entities
        .iter()
        .filter(|e| first_field(e, &["@type", "type", "entityType"]).is_none())
        .count();
    if missing_type > 0 {
        warnings.push(format!("{missing_type} entities missing @type"));
    }

    if let Some(graph) = graph.filter(|g| !g.is_empty()) {
        let non_external = graph.non_external_count();
        let ratio = if non_external > 0 {
            (graph.edge_count() as f64 / non_external as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };
        if ratio < 0.5 && non_external > 3 {
            warnings.push(format!("Low edge-to-node ratio: {ratio:.2} (recommend ≥0.8)"));
        }
    }

    let detail = if warnings.is_empty() {
        "All required fields present".to_owned()
    } else {
        format!("{} recommendation(s)", warnings.len())
    };
    GateResult::from_findings(G5, vec![], warnings, detail)
}

pub(super) fn uni_registry(doc: &Value) -> GateResult {
    if first_field(doc, &["ontologyDefinition", "registryEntry", "registryMetadata"]).is_none() {
        let mut result = GateResult::with_status(G6, GateStatus::Pass, vec![], vec![], "Not UniRegistry format (OK)");
        result.skipped = true;
        return result;
    }

    let mut warnings = Vec::new();
    if let Some(def) = field(doc, "ontologyDefinition") {
        if first_field(def, &["name", "rdfs:label"]).is_none() {
            warnings.push("ontologyDefinition missing name".to_owned());
        }
        if first_field(def, &["@graph", "entities"]).is_none() {
            warnings.push("ontologyDefinition missing @graph or entities".to_owned());
        }
    }
    if let Some(meta) = field(doc, "registryMetadata") {
        if !has(meta, "registryId") {
            warnings.push("registryMetadata missing registryId".to_owned());
        }
        if first_field(meta, &["registeredAt", "createdAt"]).is_none() {
            warnings.push("registryMetadata missing timestamp".to_owned());
        }
    }

    GateResult::from_findings(G6, vec![], warnings, "UniRegistry format validated")
}

// ============================================================================
// Graph gates
// ============================================================================

fn is_domain(entity_type: &EntityType) -> bool {
    !entity_type.is_meta()
}

pub(super) fn entity_connectivity(graph: Option<&NormalizedGraph>) -> GateResult {
    let Some(graph) = graph else {
        return no_parsed_data(G2B);
    };

    let connected: HashSet<&str> = graph
        .edges
        .iter()
        .flat_map(|e| [e.from.as_str(), e.to.as_str()])
        .collect();

    let domain: Vec<_> = graph.nodes.iter().filter(|n| is_domain(&n.entity_type)).collect();
    let (linked, orphaned): (Vec<&&crate::model::Node>, Vec<&&crate::model::Node>) = domain.iter().partition(|n| connected.contains(n.id.as_str()));

    let pct = if domain.is_empty() { 100 } else { percent(linked.len(), domain.len()) };
    let issues = orphaned
        .iter()
        .map(|n| {
            let shown = if n.label.is_empty() { &n.id } else { &n.label };
            format!("{shown} ({})", n.entity_type)
        })
        .collect();
    let status = if orphaned.is_empty() { GateStatus::Pass } else { GateStatus::Fail };
    let detail = format!("{pct}% entities connected ({}/{})", linked.len(), domain.len());

    let mut result = GateResult::with_status(G2B, status, issues, vec![], detail);
    result.orphaned = Some(orphaned.iter().map(|n| n.id.clone()).collect());
    result
}

pub(super) fn graph_connectivity(graph: Option<&NormalizedGraph>) -> GateResult {
    let Some(graph) = graph else {
        return no_parsed_data(G2C);
    };

    let domain_ids: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| is_domain(&n.entity_type))
        .map(|n| n.id.as_str())
        .collect();
    if domain_ids.is_empty() {
        return GateResult::with_status(G2C, GateStatus::Pass, vec![], vec![], "No domain entities");
    }

    let count = connected_components(domain_ids, &graph.edges).len();
    let mut result = if count <= 1 {
        GateResult::with_status(G2C, GateStatus::Pass, vec![], vec![], "Single connected component")
    } else {
        GateResult::with_status(
            G2C,
            GateStatus::Warn,
            vec![],
            vec![format!("{count} disconnected clusters")],
            format!("{count} components"),
        )
    };
    result.components = Some(count);
    result
}

pub(super) fn semantic_consistency(graph: Option<&NormalizedGraph>) -> GateResult {
    let Some(graph) = graph else {
        return no_parsed_data(G4);
    };

    let mut warnings = Vec::new();
    for node in graph.nodes.iter().filter(|n| !n.is_external()) {
        if node.description.trim().is_empty() {
            warnings.push(format!("{}: missing description", node.label));
        }

        let label = node.label.as_str();
        if !label.is_empty() && node.entity_type != EntityType::Layer {
            let pascal = pascal_case_re().is_match(label);
            let spaced = label.chars().any(char::is_whitespace);
            let snake_like = label.starts_with(|c: char| c.is_ascii_lowercase()) && label.contains('_');
            if !pascal && !spaced && snake_like {
                warnings.push(format!("{label}: consider PascalCase naming"));
            }
        }
    }

    let total = warnings.len();
    let detail = if total == 0 {
        "All entities have descriptions".to_owned()
    } else {
        format!("{total} entities missing descriptions")
    };
    if total > SHOWN_WARNINGS {
        warnings.truncate(SHOWN_WARNINGS);
        warnings.push(format!("... and {} more", total - SHOWN_WARNINGS));
    }
    GateResult::from_findings(G4, vec![], warnings, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeType, GraphBuilder};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_g1_reports_missing_identifier_and_entities() {
        let g = schema_structure(&json!({}));
        assert_eq!(g.status, GateStatus::Fail);
        assert_eq!(g.issues, vec![
            "Missing ontology identifier (@id, id, or name)".to_string(),
            "No entities found (entities, hasDefinedTerm, or @graph)".to_string(),
        ]);
        assert_eq!(g.warnings, vec!["Missing @context (not strict JSON-LD)".to_string()]);
        assert_eq!(g.detail, "2 issue(s) found");
    }

    #[test]
    fn test_g1_nested_definition_entities() {
        let doc = json!({"@context": "x", "@id": "a", "ontologyDefinition": {"@graph": [{"@id": "A"}, {"label": "B"}]}});
        let g = schema_structure(&doc);
        assert_eq!(g.issues, vec!["Entity 1: missing identifier".to_string()]);
    }

    #[test]
    fn test_g2_cardinality_notations() {
        let doc = json!({"relationships": [
            {"name": "a", "domain": "X", "range": "Y", "cardinality": "n..1"},
            {"name": "b", "domain": "X", "range": "Y", "cardinality": "1:N"},
            {"name": "c", "domain": "X", "range": "Y", "cardinality": "many"},
            {"name": "d", "range": "Y"}
        ]});
        let g = relationship_cardinality(&doc);
        assert_eq!(g.status, GateStatus::Fail);
        assert_eq!(g.issues, vec!["d: missing domain".to_string()]);
        assert_eq!(g.warnings, vec!["c: non-standard cardinality notation \"many\"".to_string()]);
        assert_eq!(g.detail, "4 relationship(s) checked");
    }

    #[test]
    fn test_g2_no_relationships_warns() {
        let g = relationship_cardinality(&json!({"relationships": []}));
        assert_eq!(g.status, GateStatus::Warn);
        assert_eq!(g.detail, "No relationships to validate");
    }

    #[test]
    fn test_g3_rule_formats() {
        let doc = json!({"businessRules": [
            {"name": "r1", "expression": "IF a > 1 THEN b MUST hold", "severity": "error"},
            {"name": "r2", "condition": "IF stale", "action": "owner MUST review", "severity": "warning"},
            {"name": "r3", "expression": "count >= 3", "severity": "info"},
            {"name": "r4", "description": "Be nice"}
        ]});
        let g = business_rules(&doc);
        assert_eq!(g.status, GateStatus::Warn);
        assert_eq!(g.detail, "50% rules in IF-THEN format (2/4)");
        assert_eq!(g.warnings, vec![
            "r3: has expression but not IF-THEN format".to_string(),
            "r4: convert to IF-THEN format".to_string(),
            "r4: missing severity (error/warning/info)".to_string(),
        ]);
    }

    #[test]
    fn test_g3_empty_rule_fails() {
        let g = business_rules(&json!({"rules": [{"severity": "error"}]}));
        assert_eq!(g.status, GateStatus::Fail);
        assert_eq!(g.issues, vec!["Rule 1: empty rule expression".to_string()]);
    }

    #[test]
    fn test_g3_warnings_capped() {
        let rules: Vec<_> = (0..4).map(|i| json!({"name": format!("r{i}"), "description": "x"})).collect();
        let g = business_rules(&json!({"businessRules": rules}));
        assert_eq!(g.warnings.len(), 5);
    }

    fn sample_graph() -> NormalizedGraph {
        let mut b = GraphBuilder::new("test");
        b.add_simple("A", "A", "class", "has text");
        b.add_simple("B", "B", "class", "has text");
        b.add_simple("C", "C", "class", "");
        b.add_simple("ext", "Ext", "external", "");
        b.add_edge("A", "B", "rel", EdgeType::Relationship);
        b.finish("g")
    }

    #[test]
    fn test_g2b_lists_orphans() {
        let g = entity_connectivity(Some(&sample_graph()));
        assert_eq!(g.status, GateStatus::Fail);
        assert_eq!(g.issues, vec!["C (class)".to_string()]);
        assert_eq!(g.orphaned, Some(vec!["C".to_string()]));
        assert_eq!(g.detail, "67% entities connected (2/3)");
    }

    #[test]
    fn test_g2c_counts_domain_components() {
        let g = graph_connectivity(Some(&sample_graph()));
        assert_eq!(g.status, GateStatus::Warn);
        assert_eq!(g.components, Some(2));
        assert_eq!(g.warnings, vec!["2 disconnected clusters".to_string()]);
    }

    #[test]
    fn test_g2c_meta_only_graph() {
        let mut b = GraphBuilder::new("test");
        b.add_simple("root", "Root", "core", "");
        let g = graph_connectivity(Some(&b.finish("g")));
        assert_eq!(g.status, GateStatus::Pass);
        assert_eq!(g.detail, "No domain entities");
        assert_eq!(g.components, None);
    }

    #[test]
    fn test_g4_descriptions_and_naming() {
        let mut b = GraphBuilder::new("test");
        for i in 0..6 {
            b.add_simple(&format!("n{i}"), &format!("Node{i}"), "class", "");
        }
        b.add_simple("snake", "snake_case", "class", "described");
        b.add_simple("lay", "lay_er", "layer", "described");
        let g = semantic_consistency(Some(&b.finish("g")));
        assert_eq!(g.status, GateStatus::Warn);
        assert_eq!(g.detail, "7 entities missing descriptions");
        assert_eq!(g.warnings.len(), 6);
        assert_eq!(g.warnings[5], "... and 2 more");
    }

    #[test]
    fn test_graph_gates_without_graph() {
        for g in [entity_connectivity(None), graph_connectivity(None), semantic_consistency(None)] {
            assert_eq!(g.status, GateStatus::Warn);
            assert_eq!(g.warnings, vec!["No parsed data".to_string()]);
            assert_eq!(g.detail, "Cannot validate");
        }
    }

    #[test]
    fn test_g5_metadata_and_ratio() {
        let doc = json!({"metadata": {"version": "1.0"}, "entities": [{"@id": "a"}, {"@id": "b", "@type": "X"}]});
        let mut b = GraphBuilder::new("test");
        for id in ["a", "b", "c", "d"] {
            b.add_simple(id, id, "class", "");
        }
        b.add_edge("a", "b", "", EdgeType::Relationship);
        let g = completeness(&doc, Some(&b.finish("g")));
        assert_eq!(g.warnings, vec![
            "Missing author/creator".to_string(),
            "1 entities missing @type".to_string(),
            "Low edge-to-node ratio: 0.25 (recommend ≥0.8)".to_string(),
        ]);
        assert_eq!(g.detail, "3 recommendation(s)");
    }

    #[test]
    fn test_g6_skipped_for_plain_documents() {
        let g = uni_registry(&json!({"entities": []}));
        assert!(g.skipped);
        assert_eq!(g.status, GateStatus::Pass);

        let g = uni_registry(&json!({"registryMetadata": {"createdAt": "2025"}, "ontologyDefinition": {"name": "x"}}));
        assert!(!g.skipped);
        assert_eq!(g.warnings, vec![
            "ontologyDefinition missing @graph or entities".to_string(),
            "registryMetadata missing registryId".to_string(),
        ]);
    }
}
