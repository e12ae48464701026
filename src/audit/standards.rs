//! Single-standard (GDPR/SOX/ISO 27001) report flow.
//!
//! Each standard maps to a set of evaluations producing a flat record list,
//! one record per non-compliant entity, scored with the penalty formula.
//! This flow is independent of the composed report and must stay so.

use chrono::{DateTime, Utc};

use crate::domain::{
    AuditBatch, ComplianceStandard, RiskLevel, RuleSet, StandardComplianceReport,
    StandardViolationRecord,
};
use crate::snapshot::DirectorySnapshot;

use super::aggregate::{audit_groups, audit_privileged, audit_users};
use super::compose::weighted_standard_score;

/// Build the report for one regulatory standard (or all of them).
pub fn standard_report(
    standard: ComplianceStandard,
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> StandardComplianceReport {
    let records = match standard {
        ComplianceStandard::Gdpr => gdpr_records(snapshot, rules, now),
        ComplianceStandard::Sox => sox_records(snapshot, rules, now),
        ComplianceStandard::Iso27001 => iso27001_records(snapshot, rules, now),
        ComplianceStandard::All => {
            let mut all = gdpr_records(snapshot, rules, now);
            all.extend(sox_records(snapshot, rules, now));
            all.extend(iso27001_records(snapshot, rules, now));
            all
        }
    };

    let weighted_score = weighted_standard_score(&records);
    let count_at = |level: RiskLevel| records.iter().filter(|r| r.risk_level == level).count();

    tracing::info!(
        standard = standard.display_name(),
        records = records.len(),
        score = weighted_score,
        "Standard compliance report generated"
    );

    StandardComplianceReport {
        standard,
        weighted_score,
        critical_count: count_at(RiskLevel::Critical),
        high_count: count_at(RiskLevel::High),
        medium_count: count_at(RiskLevel::Medium),
        low_count: count_at(RiskLevel::Low),
        records,
        generated_at: now,
    }
}

/// GDPR: accounts retained beyond their department's retention window.
///
/// The reference point is the last logon, falling back to the creation
/// timestamp for accounts that never logged on. Departments with no
/// configured window are not checked.
fn gdpr_records(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> Vec<StandardViolationRecord> {
    let mut records = Vec::new();

    for user in snapshot.users() {
        let Some(retention_days) = rules.retention_days_for(&user.department) else {
            continue;
        };
        let reference = user.last_logon.unwrap_or(user.created);
        let idle_days = now.signed_duration_since(reference).num_days();
        if idle_days <= i64::from(retention_days) {
            continue;
        }

        let has_sensitive_access = user.member_of.iter().any(|reference| {
            snapshot
                .resolve_group_name(reference)
                .map_or(false, |name| rules.is_sensitive_group(name))
        });

        records.push(StandardViolationRecord {
            identity: user.identity.clone(),
            display_name: user.display_name.clone(),
            requirement: format!("GDPR data retention ({})", user.department),
            violations: vec![format!("retention period exceeded ({idle_days} days idle)")],
            risk_level: if has_sensitive_access {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            },
        });
    }

    records
}

/// SOX: privileged-access review findings.
fn sox_records(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> Vec<StandardViolationRecord> {
    let batch = audit_privileged(snapshot, rules, now);
    batch_to_records(batch, "SOX privileged access review")
}

/// ISO 27001: access-control findings from the user and group audits.
fn iso27001_records(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> Vec<StandardViolationRecord> {
    let mut records = batch_to_records(
        audit_users(snapshot, rules, true, now),
        "ISO 27001 access control (users)",
    );
    records.extend(batch_to_records(
        audit_groups(snapshot, rules, now),
        "ISO 27001 access control (groups)",
    ));
    records
}

/// One record per non-compliant entity, carrying the entity's final risk
/// level.
fn batch_to_records(batch: AuditBatch, requirement: &str) -> Vec<StandardViolationRecord> {
    batch
        .results
        .into_iter()
        .filter(|r| !r.compliant)
        .map(|r| StandardViolationRecord {
            identity: r.identity,
            display_name: r.display_name,
            requirement: requirement.to_string(),
            violations: r.violations,
            risk_level: r.risk_level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DirectoryGroupRecord, DirectoryUserRecord, GroupCategory, GroupScope,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn user(identity: &str, department: &str) -> DirectoryUserRecord {
        DirectoryUserRecord {
            identity: identity.to_string(),
            display_name: identity.to_string(),
            email: format!("{identity}@example.com"),
            department: department.to_string(),
            title: "Analyst".to_string(),
            manager: Some("boss".to_string()),
            created: now() - Duration::days(3000),
            last_logon: Some(now() - Duration::days(10)),
            password_last_set: Some(now() - Duration::days(20)),
            enabled: true,
            locked: false,
            account_expires: None,
            member_of: vec![],
        }
    }

    fn group(name: &str, members: &[&str]) -> DirectoryGroupRecord {
        DirectoryGroupRecord {
            name: name.to_string(),
            description: Some(format!("{name} group")),
            scope: GroupScope::Global,
            category: GroupCategory::Security,
            created: now() - Duration::days(900),
            modified: now() - Duration::days(10),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn retention_rules() -> RuleSet {
        let mut rules = RuleSet::default();
        rules.data_retention_days.insert("Finance".to_string(), 365);
        rules
    }

    #[test]
    fn gdpr_flags_only_departments_with_configured_windows() {
        let mut retained = user("stale-fin", "Finance");
        retained.last_logon = Some(now() - Duration::days(400));
        let mut other_dept = user("stale-eng", "Engineering");
        other_dept.last_logon = Some(now() - Duration::days(400));
        let snapshot = DirectorySnapshot::new(vec![retained, other_dept], vec![]);

        let report = standard_report(ComplianceStandard::Gdpr, &snapshot, &retention_rules(), now());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].identity, "stale-fin");
        assert_eq!(report.records[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn gdpr_uses_creation_time_for_never_logged_on_accounts() {
        let mut never = user("never-fin", "Finance");
        never.last_logon = None; // created 3000 days ago
        let snapshot = DirectorySnapshot::new(vec![never], vec![]);

        let report = standard_report(ComplianceStandard::Gdpr, &snapshot, &retention_rules(), now());
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn sox_records_are_one_per_noncompliant_privileged_account() {
        let mut ghost = user("ghost", "IT");
        ghost.enabled = false;
        let clean = user("clean-admin", "IT");
        let snapshot = DirectorySnapshot::new(
            vec![ghost, clean],
            vec![group("Domain Admins", &["ghost", "clean-admin"])],
        );

        let report = standard_report(ComplianceStandard::Sox, &snapshot, &RuleSet::default(), now());
        // ghost: disabled-with-privileges; clean-admin is compliant.
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].identity, "ghost");
        assert_eq!(report.records[0].risk_level, RiskLevel::High);
        assert_eq!(report.high_count, 1);
        assert_eq!(report.weighted_score, 95);
    }

    #[test]
    fn all_concatenates_every_standard() {
        let mut retained = user("stale-fin", "Finance");
        retained.last_logon = Some(now() - Duration::days(400));
        let snapshot = DirectorySnapshot::new(
            vec![retained],
            vec![group("Empty Group", &[])],
        );

        let gdpr = standard_report(ComplianceStandard::Gdpr, &snapshot, &retention_rules(), now());
        let sox = standard_report(ComplianceStandard::Sox, &snapshot, &retention_rules(), now());
        let iso = standard_report(ComplianceStandard::Iso27001, &snapshot, &retention_rules(), now());
        let all = standard_report(ComplianceStandard::All, &snapshot, &retention_rules(), now());

        assert_eq!(
            all.records.len(),
            gdpr.records.len() + sox.records.len() + iso.records.len()
        );
    }
}
