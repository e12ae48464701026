//! Audit outcome types: risk levels, per-entity results, batch summaries.

use serde::{Deserialize, Serialize};

use super::records::MemberActivity;

/// Risk classification for one evaluated entity.
///
/// The derived ordering (Low < Medium < High < Critical) is load-bearing:
/// escalation is a fold with `max`, so a later check can raise the level
/// but never lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Kind of directory entity an audit result describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Group,
}

/// Member activity counts for a group audit result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBreakdown {
    pub active: usize,
    pub inactive: usize,
    pub disabled: usize,
    /// Members that did not resolve to a user record (nested groups,
    /// dangling references). Not classified.
    pub unclassified: usize,
}

impl MemberBreakdown {
    pub fn tally(&mut self, activity: MemberActivity) {
        match activity {
            MemberActivity::Active => self.active += 1,
            MemberActivity::Inactive => self.inactive += 1,
            MemberActivity::Disabled => self.disabled += 1,
        }
    }
}

/// One entity's evaluation outcome.
///
/// Violations are kept in check-execution order and never deduplicated.
/// Sensitive-group membership is tracked separately from violations: it
/// escalates risk but does not by itself make the entity non-compliant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub identity: String,
    pub display_name: String,
    pub kind: EntityKind,
    pub violations: Vec<String>,
    pub violation_count: usize,
    pub risk_level: RiskLevel,
    pub compliant: bool,
    pub sensitive_groups: Vec<String>,
    pub has_sensitive_access: bool,
    pub recommended_action: Option<String>,
    pub member_breakdown: Option<MemberBreakdown>,
}

impl AuditResult {
    pub fn new(identity: &str, display_name: &str, kind: EntityKind) -> Self {
        Self {
            identity: identity.to_string(),
            display_name: display_name.to_string(),
            kind,
            violations: Vec::new(),
            violation_count: 0,
            risk_level: RiskLevel::Low,
            compliant: true,
            sensitive_groups: Vec::new(),
            has_sensitive_access: false,
            recommended_action: None,
            member_breakdown: None,
        }
    }

    /// Append a violation in check-execution order.
    pub fn record_violation(&mut self, message: String) {
        self.violations.push(message);
        self.violation_count = self.violations.len();
        self.compliant = false;
    }

    /// Raise the risk level to at least `level`. Never lowers it.
    pub fn escalate(&mut self, level: RiskLevel) {
        self.risk_level = self.risk_level.max(level);
    }

    /// Track membership in a sensitive group. Escalates to at least High
    /// without adding a violation.
    pub fn record_sensitive_group(&mut self, group_name: &str) {
        self.sensitive_groups.push(group_name.to_string());
        self.has_sensitive_access = true;
        self.escalate(RiskLevel::High);
    }
}

/// Output of one aggregator pass over a homogeneous entity collection.
///
/// `violation_count` counts entities with at least one violation, not
/// individual violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditBatch {
    pub results: Vec<AuditResult>,
    pub violation_count: usize,
}

impl AuditBatch {
    pub fn from_results(results: Vec<AuditResult>) -> Self {
        let violation_count = results.iter().filter(|r| !r.compliant).count();
        Self {
            results,
            violation_count,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn count_at_risk(&self, level: RiskLevel) -> usize {
        self.results.iter().filter(|r| r.risk_level == level).count()
    }
}

/// Aggregate compliance figures over the composed audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total_users: usize,
    pub non_compliant_users: usize,
    /// Percentage with two-decimal rounding; 100 when no users were
    /// evaluated.
    pub user_compliance_rate: f64,
    pub total_groups: usize,
    pub non_compliant_groups: usize,
    pub group_compliance_rate: f64,
    /// Unweighted mean of the two rates. Privileged and inactive audits do
    /// not feed this figure.
    pub overall_compliance_score: f64,
    pub privileged_users_with_issues: usize,
    pub inactive_users: usize,
}
