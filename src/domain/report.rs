//! Renderer-facing report structures.
//!
//! Field names are stable across all output formats (HTML/CSV/JSON/Excel):
//! renderers serialize these structures as-is, so the camelCase serde names
//! are part of the external contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audit::{AuditResult, ComplianceSummary, RiskLevel};

/// Regulatory standard selected for the single-standard report flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplianceStandard {
    Gdpr,
    Sox,
    Iso27001,
    All,
}

impl ComplianceStandard {
    pub fn display_name(&self) -> &'static str {
        match self {
            ComplianceStandard::Gdpr => "GDPR",
            ComplianceStandard::Sox => "SOX",
            ComplianceStandard::Iso27001 => "ISO 27001",
            ComplianceStandard::All => "All standards",
        }
    }
}

/// The composed report handed to the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub summary: ComplianceSummary,
    pub recommendations: Vec<String>,
    pub user_audit: Vec<AuditResult>,
    pub group_audit: Vec<AuditResult>,
    pub permissions_audit: Vec<AuditResult>,
    pub inactive_audit: Vec<AuditResult>,
    pub generated_at: DateTime<Utc>,
}

/// One non-compliant entity in the single-standard flow.
///
/// Exactly one record per non-compliant entity, tagged with the entity's
/// final risk level; the weighted score counts records, not violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardViolationRecord {
    pub identity: String,
    pub display_name: String,
    pub requirement: String,
    pub violations: Vec<String>,
    pub risk_level: RiskLevel,
}

/// Output of the single-standard (GDPR/SOX/ISO27001) report flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardComplianceReport {
    pub standard: ComplianceStandard,
    /// Penalty-based score: max(0, 100 - 10*critical - 5*high - 2*medium).
    /// Deliberately distinct from the composed report's unweighted mean.
    pub weighted_score: u32,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub records: Vec<StandardViolationRecord>,
    pub generated_at: DateTime<Utc>,
}
