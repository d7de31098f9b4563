//! # Compliance Validator
//!
//! A fixed battery of named gates evaluated against the raw document and its
//! normalized graph. Each gate yields a pass/warn/fail verdict; the overall
//! status is the worst verdict among gates that are neither advisory nor
//! skipped.
//!
//! ```text
//! G1  Schema Structure          raw doc
//! G2  Relationship Cardinality  raw doc
//! G2B Entity Connectivity       graph
//! G2C Graph Connectivity        graph
//! G3  Business Rules            raw doc
//! G4  Semantic Consistency      graph
//! G5  Completeness   (advisory) raw doc + graph
//! G6  UniRegistry    (advisory) raw doc
//! ```
//!
//! Gate names are always `"<ID>: <Title>"`; report consumers split on the
//! first `:` to recover the id.

mod gates;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::NormalizedGraph;

// ============================================================================
// Verdicts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Pass,
    Warn,
    Fail,
}

impl GateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GateStatus::Pass => "pass",
            GateStatus::Warn => "warn",
            GateStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Outcome of one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResult {
    pub gate: String,
    pub status: GateStatus,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub detail: String,
    /// Excluded from the overall status.
    #[serde(default, skip_serializing_if = "is_false")]
    pub advisory: bool,
    /// Not applicable to this document; excluded from the overall status.
    #[serde(default, skip_serializing_if = "is_false")]
    pub skipped: bool,
    /// Ids of orphaned domain entities (G2B only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphaned: Option<Vec<String>>,
    /// Number of connected components among domain entities (G2C only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<usize>,
}

impl GateResult {
    /// A gate whose status follows from its findings: fail on any issue,
    /// else warn on any warning, else pass.
    pub(crate) fn from_findings(
        gate: &str,
        issues: Vec<String>,
        warnings: Vec<String>,
        detail: impl Into<String>,
    ) -> Self {
        let status = if !issues.is_empty() {
            GateStatus::Fail
        } else if !warnings.is_empty() {
            GateStatus::Warn
        } else {
            GateStatus::Pass
        };
        Self::with_status(gate, status, issues, warnings, detail)
    }

    pub(crate) fn with_status(
        gate: &str,
        status: GateStatus,
        issues: Vec<String>,
        warnings: Vec<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            gate: gate.to_owned(),
            status,
            issues,
            warnings,
            detail: detail.into(),
            advisory: false,
            skipped: false,
            orphaned: None,
            components: None,
        }
    }

    pub(crate) fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }

    /// `"G2B: Entity Connectivity"` → `"G2B"`.
    pub fn gate_id(&self) -> &str {
        self.gate.split(':').next().unwrap_or_default().trim()
    }

    /// `"G2B: Entity Connectivity"` → `"Entity Connectivity"`.
    pub fn gate_title(&self) -> &str {
        match self.gate.split_once(':') {
            Some((_, title)) => title.trim(),
            None => &self.gate,
        }
    }

    /// Whether this gate contributes to the overall status.
    pub fn is_core(&self) -> bool {
        !self.advisory && !self.skipped
    }
}

/// Counts over core gates, plus the number of advisory gates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSummary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub advisory: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub gates: Vec<GateResult>,
    pub overall: GateStatus,
    pub summary: GateSummary,
}

impl ValidationResult {
    pub fn gate(&self, id: &str) -> Option<&GateResult> {
        self.gates.iter().find(|g| g.gate_id() == id)
    }

    fn from_gates(gates: Vec<GateResult>) -> Self {
        let mut summary = GateSummary {
            advisory: gates.iter().filter(|g| g.advisory).count(),
            ..GateSummary::default()
        };
        for gate in gates.iter().filter(|g| g.is_core()) {
            match gate.status {
                GateStatus::Pass => summary.pass += 1,
                GateStatus::Warn => summary.warn += 1,
                GateStatus::Fail => summary.fail += 1,
            }
        }

        let overall = if summary.fail > 0 {
            GateStatus::Fail
        } else if summary.warn > 0 {
            GateStatus::Warn
        } else {
            GateStatus::Pass
        };

        Self { gates, overall, summary }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Run every gate against `doc` and its normalized `graph`.
///
/// Never fails. A gate that needs the graph and gets `None` reports `warn`
/// with "No parsed data".
pub fn validate(doc: &Value, graph: Option<&NormalizedGraph>) -> ValidationResult {
    let gates = vec![
        gates::schema_structure(doc),
        gates::relationship_cardinality(doc),
        gates::entity_connectivity(graph),
        gates::graph_connectivity(graph),
        gates::business_rules(doc),
        gates::semantic_consistency(graph),
        gates::completeness(doc, graph).advisory(),
        gates::uni_registry(doc).advisory(),
    ];

    let result = ValidationResult::from_gates(gates);
    debug!(
        overall = %result.overall,
        pass = result.summary.pass,
        warn = result.summary.warn,
        fail = result.summary.fail,
        "validated ontology"
    );
    result
}
