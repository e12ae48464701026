//! Compliance score composition.
//!
//! Two scoring formulas coexist on purpose:
//!
//! - the composed report's overall score is the unweighted mean of the user
//!   and group compliance rates; privileged and inactive audits feed only
//!   the counts and recommendations, never this average;
//! - the single-standard flow uses a penalty score over the flat
//!   non-compliant-entity list: `max(0, 100 - 10*critical - 5*high -
//!   2*medium)`.
//!
//! Unifying them would silently change report output, so both stay.

use chrono::{DateTime, Utc};

use crate::domain::{
    AuditBatch, ComplianceReport, ComplianceSummary, RiskLevel, StandardViolationRecord,
};

/// Two-decimal rounding used for every percentage in the reports.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of compliant entities; 100 when the population is empty.
pub fn compliance_rate(total: usize, non_compliant: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    round2(100.0 * (total - non_compliant) as f64 / total as f64)
}

/// Penalty score for the single-standard flow. Counts are over entity
/// records, not individual violations.
pub fn weighted_standard_score(records: &[StandardViolationRecord]) -> u32 {
    let critical = records
        .iter()
        .filter(|r| r.risk_level == RiskLevel::Critical)
        .count();
    let high = records
        .iter()
        .filter(|r| r.risk_level == RiskLevel::High)
        .count();
    let medium = records
        .iter()
        .filter(|r| r.risk_level == RiskLevel::Medium)
        .count();

    let deductions = critical * 10 + high * 5 + medium * 2;
    100u32.saturating_sub(deductions.min(100) as u32)
}

/// Combine the four independently-run audits into the composed report.
pub fn compose_report(
    users: AuditBatch,
    groups: AuditBatch,
    privileged: AuditBatch,
    inactive: AuditBatch,
    now: DateTime<Utc>,
) -> ComplianceReport {
    let user_compliance_rate = compliance_rate(users.total(), users.violation_count);
    let group_compliance_rate = compliance_rate(groups.total(), groups.violation_count);
    let overall_compliance_score = round2((user_compliance_rate + group_compliance_rate) / 2.0);

    let summary = ComplianceSummary {
        total_users: users.total(),
        non_compliant_users: users.violation_count,
        user_compliance_rate,
        total_groups: groups.total(),
        non_compliant_groups: groups.violation_count,
        group_compliance_rate,
        overall_compliance_score,
        privileged_users_with_issues: privileged.violation_count,
        inactive_users: inactive.total(),
    };

    let recommendations = build_recommendations(&summary, &inactive);

    tracing::info!(
        overall = summary.overall_compliance_score,
        recommendations = recommendations.len(),
        "Compliance report composed"
    );

    ComplianceReport {
        summary,
        recommendations,
        user_audit: users.results,
        group_audit: groups.results,
        permissions_audit: privileged.results,
        inactive_audit: inactive.results,
        generated_at: now,
    }
}

/// Ordered, independent recommendation conditions; all that match are
/// included.
fn build_recommendations(summary: &ComplianceSummary, inactive: &AuditBatch) -> Vec<String> {
    let mut recommendations = Vec::new();

    if summary.non_compliant_users > 0 {
        recommendations.push(format!(
            "fix compliance violations for {} users",
            summary.non_compliant_users
        ));
    }
    if summary.inactive_users > 0 {
        recommendations.push(format!(
            "disable or clean up {} inactive accounts",
            summary.inactive_users
        ));
    }
    let critical_risk = inactive.count_at_risk(RiskLevel::Critical);
    if critical_risk > 0 {
        recommendations.push(format!(
            "urgent: review {critical_risk} critical-risk accounts"
        ));
    }
    if summary.privileged_users_with_issues > 0 {
        recommendations.push(format!(
            "review privileged access for {} users",
            summary.privileged_users_with_issues
        ));
    }

    recommendations
}
