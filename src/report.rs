//! Audit report: the serialized verdict handed to report consumers.
//!
//! ```text
//! doc + NormalizedGraph + ValidationResult (+ AuditResult) → AuditReport → JSON
//! ```
//!
//! Gate ids and titles come from splitting gate names on the first `:`, so
//! every gate name must read `"<ID>: <Title>"`.

use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::AuditResult;
use crate::model::value::{first_field, first_text};
use crate::model::NormalizedGraph;
use crate::validation::{GateStatus, GateSummary, ValidationResult};
use crate::Result;

pub const REPORT_CONTEXT: &str = "https://oaa-ontology.org/audit/v1/";
pub const REPORT_TYPE: &str = "OAAAuditReport";
pub const OAA_VERSION: &str = "6.1.0";
pub const AUDIT_VERSION: &str = "1.0.0";
pub const GENERATED_BY: &str = concat!("ontograph v", env!("CARGO_PKG_VERSION"));

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex must compile"))
}

fn slug(name: &str) -> String {
    whitespace_re().replace_all(&name.to_lowercase(), "-").into_owned()
}

// ============================================================================
// Report shape
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub report_type: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub audit_metadata: AuditMetadata,
    pub ontology_metadata: OntologyMetadata,
    pub compliance_result: ComplianceResult,
    pub gate_results: Vec<GateReport>,
    pub graph_metrics: GraphMetrics,
    pub registry_info: RegistryInfo,
    #[serde(skip)]
    generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub oaa_version: String,
    pub audit_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyMetadata {
    pub name: String,
    pub version: String,
    pub schema_version: Option<Value>,
    pub domain: Option<Value>,
    pub previous_version: Option<Value>,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub overall_status: GateStatus,
    pub summary: GateSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReport {
    pub gate_id: String,
    pub gate_name: String,
    pub status: GateStatus,
    pub is_advisory: bool,
    pub is_skipped: bool,
    pub detail: String,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub entity_count: usize,
    pub relationship_count: usize,
    pub business_rule_count: usize,
    /// Edges per non-external node, two decimals. A graph with no
    /// non-external nodes reports `0.0` rather than an infinite ratio, so
    /// the report always serializes as finite JSON.
    pub edge_to_node_ratio: f64,
    pub connected_components: usize,
    pub orphaned_entities: Vec<String>,
}

/// Registry facts about the audited document, when it matched an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMatch {
    #[serde(default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub validated_date: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryInfo {
    pub matched: bool,
    #[serde(flatten)]
    pub entry: Option<MatchedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedEntry {
    pub entry_id: Option<String>,
    pub registry_version: Option<String>,
    pub registry_status: Option<String>,
    pub validated_date: Option<String>,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

impl From<&RegistryMatch> for RegistryInfo {
    fn from(m: &RegistryMatch) -> Self {
        Self {
            matched: true,
            entry: Some(MatchedEntry {
                entry_id: m.entry_id.clone(),
                registry_version: m.version.clone(),
                registry_status: m.status.clone(),
                validated_date: m.validated_date.clone(),
                dependencies: m.dependencies.clone(),
                dependents: m.dependents.clone(),
            }),
        }
    }
}

impl RegistryInfo {
    pub fn unmatched() -> Self {
        Self { matched: false, entry: None }
    }
}

// ============================================================================
// Generation
// ============================================================================

fn ontology_name(doc: &Value) -> String {
    first_text(doc, &["name", "rdfs:label"])
        .or_else(|| {
            first_text(doc, &["@id"])
                .and_then(|id| id.rsplit('/').next().map(str::to_owned))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "unnamed".to_owned())
}

fn list_len(doc: &Value, key: &[&str]) -> usize {
    let definition = doc.get("ontologyDefinition").unwrap_or(&Value::Null);
    first_field(doc, key)
        .or_else(|| first_field(definition, key))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Build the report for one audited document.
///
/// Without `audit`, the graph counts as one component.
pub fn generate_audit_report(
    doc: &Value,
    graph: &NormalizedGraph,
    validation: &ValidationResult,
    audit: Option<&AuditResult>,
    registry_match: Option<&RegistryMatch>,
    source_file: &str,
    generated_at: DateTime<Utc>,
) -> AuditReport {
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let name = ontology_name(doc);
    let version = first_text(doc, &["oaa:moduleVersion", "version", "owl:versionInfo"])
        .unwrap_or_else(|| "unknown".to_owned());

    let entity_count = graph.non_external_count();
    let edge_to_node_ratio = if graph.nodes.is_empty() || entity_count == 0 {
        0.0
    } else {
        round2(graph.edges.len() as f64 / entity_count as f64)
    };

    let gate_results = validation
        .gates
        .iter()
        .map(|g| GateReport {
            gate_id: g.gate_id().to_owned(),
            gate_name: g.gate_title().to_owned(),
            status: g.status,
            is_advisory: g.advisory,
            is_skipped: g.skipped,
            detail: g.detail.clone(),
            issues: g.issues.clone(),
            warnings: g.warnings.clone(),
        })
        .collect();

    let orphaned_entities = validation
        .gate("G2B")
        .and_then(|g| g.orphaned.clone())
        .unwrap_or_default();

    AuditReport {
        context: REPORT_CONTEXT.to_owned(),
        report_type: REPORT_TYPE.to_owned(),
        id: format!("audit:{}-{}", slug(&name), timestamp.replace([':', '.'], "-")),
        audit_metadata: AuditMetadata {
            generated_at: timestamp,
            generated_by: GENERATED_BY.to_owned(),
            oaa_version: OAA_VERSION.to_owned(),
            audit_version: AUDIT_VERSION.to_owned(),
        },
        ontology_metadata: OntologyMetadata {
            version,
            schema_version: first_field(doc, &["oaa:schemaVersion"]).cloned(),
            domain: first_field(doc, &["oaa:domain"]).cloned(),
            previous_version: first_field(doc, &["oaa:previousVersion"]).cloned(),
            source_file: source_file.to_owned(),
            name,
        },
        compliance_result: ComplianceResult {
            overall_status: validation.overall,
            summary: validation.summary,
        },
        gate_results,
        graph_metrics: GraphMetrics {
            total_nodes: graph.nodes.len(),
            total_edges: graph.edges.len(),
            entity_count,
            relationship_count: list_len(doc, &["relationships"]),
            business_rule_count: list_len(doc, &["businessRules", "rules"]),
            edge_to_node_ratio,
            connected_components: audit.map(|a| a.components.len()).filter(|&n| n > 0).unwrap_or(1),
            orphaned_entities,
        },
        registry_info: registry_match.map_or_else(RegistryInfo::unmatched, RegistryInfo::from),
        generated_at,
    }
}

impl AuditReport {
    /// `<name>-audit-<version>-<YYYY-MM-DD>.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-audit-{}-{}.json",
            slug(&self.ontology_metadata.name),
            self.ontology_metadata.version,
            self.generated_at.format("%Y-%m-%d")
        )
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeType, GraphBuilder};
    use crate::{audit_graph, parse_ontology, validate};
    use chrono::TimeZone;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "@context": "https://schema.org",
            "@id": "https://example.org/ontologies/vsom",
            "name": "VSOM Ontology",
            "oaa:moduleVersion": "2.1.0",
            "entities": [{"@id": "A", "name": "A"}, {"@id": "B", "name": "B"}, {"@id": "C", "name": "C"}],
            "relationships": [{"domain": "A", "range": "B", "name": "rel"}]
        })
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_report_identity_and_metadata() {
        let doc = doc();
        let graph = parse_ontology(&doc, "vsom");
        let validation = validate(&doc, Some(&graph));
        let report = generate_audit_report(&doc, &graph, &validation, None, None, "vsom.json", at());

        assert_eq!(report.id, "audit:vsom-ontology-2026-03-04T05-06-07-000Z");
        assert_eq!(report.audit_metadata.generated_at, "2026-03-04T05:06:07.000Z");
        assert_eq!(report.ontology_metadata.version, "2.1.0");
        assert_eq!(report.ontology_metadata.schema_version, None);
        assert_eq!(report.graph_metrics.relationship_count, 1);
        assert_eq!(report.graph_metrics.connected_components, 1);
        assert_eq!(report.file_name(), "vsom-ontology-audit-2.1.0-2026-03-04.json");
        assert_eq!(report.gate_results.len(), validation.gates.len());
        assert_eq!(report.gate_results[0].gate_id, "G1");
    }

    #[test]
    fn test_orphans_and_components_from_inputs() {
        let doc = doc();
        let graph = parse_ontology(&doc, "vsom");
        let validation = validate(&doc, Some(&graph));
        let audit = audit_graph(&graph);
        let report = generate_audit_report(&doc, &graph, &validation, Some(&audit), None, "vsom.json", at());

        assert_eq!(report.graph_metrics.connected_components, audit.components.len());
        assert_eq!(report.graph_metrics.orphaned_entities, vec!["C".to_string()]);
    }

    #[test]
    fn test_registry_info_serialization() {
        let doc = doc();
        let graph = parse_ontology(&doc, "vsom");
        let validation = validate(&doc, Some(&graph));

        let report = generate_audit_report(&doc, &graph, &validation, None, None, "x", at());
        let json: Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["registryInfo"], json!({"matched": false}));
        assert_eq!(json["@type"], "OAAAuditReport");

        let m = RegistryMatch {
            entry_id: Some("Entry-ONT-VSOM-001".into()),
            dependencies: vec!["Entry-ONT-ORG-001".into()],
            ..RegistryMatch::default()
        };
        let report = generate_audit_report(&doc, &graph, &validation, None, Some(&m), "x", at());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["registryInfo"]["matched"], true);
        assert_eq!(json["registryInfo"]["entryId"], "Entry-ONT-VSOM-001");
        assert_eq!(json["registryInfo"]["dependencies"], json!(["Entry-ONT-ORG-001"]));
    }

    #[test]
    fn test_generator_stamp_is_pinned() {
        let doc = doc();
        let graph = parse_ontology(&doc, "vsom");
        let validation = validate(&doc, Some(&graph));
        let report = generate_audit_report(&doc, &graph, &validation, None, None, "x", at());

        assert_eq!(GENERATED_BY, format!("ontograph v{}", env!("CARGO_PKG_VERSION")));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["auditMetadata"]["generatedBy"], GENERATED_BY);
        assert_eq!(json["auditMetadata"]["oaaVersion"], "6.1.0");
        assert_eq!(json["auditMetadata"]["auditVersion"], "1.0.0");
    }

    #[test]
    fn test_all_external_graph_has_finite_ratio() {
        let mut b = GraphBuilder::new("ext");
        b.add_simple("schema:Person", "Person", "external", "");
        b.add_simple("schema:Place", "Place", "external", "");
        b.add_edge("schema:Person", "schema:Place", "livesIn", EdgeType::Relationship);
        let graph = b.finish("ext");
        let doc = json!({"name": "ext"});
        let validation = validate(&doc, Some(&graph));
        let report = generate_audit_report(&doc, &graph, &validation, None, None, "x", at());

        assert_eq!(report.graph_metrics.entity_count, 0);
        assert_eq!(report.graph_metrics.total_edges, 1);
        assert_eq!(report.graph_metrics.edge_to_node_ratio, 0.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["graphMetrics"]["edgeToNodeRatio"], json!(0.0));
    }

    #[test]
    fn test_name_falls_back_to_id_segment() {
        assert_eq!(ontology_name(&json!({"@id": "https://x.org/onto/pfc"})), "pfc");
        assert_eq!(ontology_name(&json!({})), "unnamed");
    }
}
