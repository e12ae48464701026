//! Audit orchestration: fetch a snapshot through the provider, run the
//! aggregators, compose the output.
//!
//! An invocation either returns a complete result or fails as a whole. A
//! fetch failure in a composite run aborts the entire composite; there is
//! no partial-result mode.

use chrono::{DateTime, Utc};

use crate::domain::{
    AuditBatch, ComplianceReport, ComplianceStandard, RuleSet, StandardComplianceReport,
};
use crate::error::{ComplianceError, ComplianceResult};
use crate::snapshot::{DirectorySnapshot, SnapshotProvider};

use super::aggregate::{audit_groups, audit_inactive, audit_privileged, audit_users};
use super::compose::compose_report;
use super::standards::standard_report;

/// Selectable audit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditType {
    Users,
    Groups,
    Privileged,
    Inactive,
    /// Composite report across the four audits.
    Full,
    /// Single-standard (GDPR/SOX/ISO 27001) report.
    Compliance,
}

impl AuditType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditType::Users => "users",
            AuditType::Groups => "groups",
            AuditType::Privileged => "privileged",
            AuditType::Inactive => "inactive",
            AuditType::Full => "full",
            AuditType::Compliance => "compliance",
        }
    }
}

/// Per-invocation options.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Optional provider-defined sub-scope filter.
    pub scope: Option<String>,
    /// Whether the user audit evaluates disabled accounts too.
    pub include_disabled: bool,
    /// Inactivity threshold for the inactive-account audit. Independent of
    /// the rule set's `max_inactive_days`.
    pub inactive_days: u32,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            scope: None,
            include_disabled: false,
            inactive_days: 90,
        }
    }
}

/// One synchronous snapshot fetch per audit invocation.
///
/// Disabled accounts are always fetched; the user audit applies its own
/// exclude-disabled flag so the privileged audit can still see disabled
/// members of sensitive groups.
fn fetch_snapshot(
    provider: &dyn SnapshotProvider,
    audit_type: AuditType,
    options: &AuditOptions,
) -> ComplianceResult<DirectorySnapshot> {
    let scope = options.scope.as_deref();
    let users = provider
        .fetch_users(scope, true)
        .map_err(|e| ComplianceError::fetch_failure(audit_type.as_str(), "users", e))?;
    let groups = provider
        .fetch_groups(scope)
        .map_err(|e| ComplianceError::fetch_failure(audit_type.as_str(), "groups", e))?;

    tracing::info!(
        audit_type = audit_type.as_str(),
        users = users.len(),
        groups = groups.len(),
        "Directory snapshot fetched"
    );
    Ok(DirectorySnapshot::new(users, groups))
}

pub fn run_user_audit(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<AuditBatch> {
    let snapshot = fetch_snapshot(provider, AuditType::Users, options)?;
    Ok(audit_users(&snapshot, rules, options.include_disabled, now))
}

pub fn run_group_audit(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<AuditBatch> {
    let snapshot = fetch_snapshot(provider, AuditType::Groups, options)?;
    Ok(audit_groups(&snapshot, rules, now))
}

pub fn run_privileged_audit(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<AuditBatch> {
    let snapshot = fetch_snapshot(provider, AuditType::Privileged, options)?;
    Ok(audit_privileged(&snapshot, rules, now))
}

pub fn run_inactive_audit(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<AuditBatch> {
    let snapshot = fetch_snapshot(provider, AuditType::Inactive, options)?;
    Ok(audit_inactive(&snapshot, rules, options.inactive_days, now))
}

/// Run the four audits over one snapshot and compose the report handed to
/// the renderers.
pub fn run_full_report(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<ComplianceReport> {
    let snapshot = fetch_snapshot(provider, AuditType::Full, options)?;

    let users = audit_users(&snapshot, rules, options.include_disabled, now);
    let groups = audit_groups(&snapshot, rules, now);
    let privileged = audit_privileged(&snapshot, rules, now);
    let inactive = audit_inactive(&snapshot, rules, options.inactive_days, now);

    Ok(compose_report(users, groups, privileged, inactive, now))
}

/// Run the single-standard report flow.
pub fn run_standard_report(
    provider: &dyn SnapshotProvider,
    rules: &RuleSet,
    standard: ComplianceStandard,
    options: &AuditOptions,
    now: DateTime<Utc>,
) -> ComplianceResult<StandardComplianceReport> {
    let snapshot = fetch_snapshot(provider, AuditType::Compliance, options)?;
    Ok(standard_report(standard, &snapshot, rules, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DirectoryGroupRecord, DirectoryUserRecord, GroupCategory, GroupScope, RiskLevel,
    };
    use crate::snapshot::InMemorySnapshotProvider;
    use chrono::{Duration, TimeZone};

    struct FailingProvider;

    impl SnapshotProvider for FailingProvider {
        fn fetch_users(
            &self,
            _scope: Option<&str>,
            _include_disabled: bool,
        ) -> ComplianceResult<Vec<DirectoryUserRecord>> {
            Err(ComplianceError::Provider("directory unreachable".to_string()))
        }

        fn fetch_groups(
            &self,
            _scope: Option<&str>,
        ) -> ComplianceResult<Vec<DirectoryGroupRecord>> {
            Err(ComplianceError::Provider("directory unreachable".to_string()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn user(identity: &str) -> DirectoryUserRecord {
        DirectoryUserRecord {
            identity: identity.to_string(),
            display_name: identity.to_string(),
            email: format!("{identity}@example.com"),
            department: "IT".to_string(),
            title: "Engineer".to_string(),
            manager: Some("boss".to_string()),
            created: now() - Duration::days(500),
            last_logon: Some(now() - Duration::days(5)),
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

    #[test]
    fn full_report_runs_all_four_audits_over_one_snapshot() {
        let mut dormant = user("dormant-admin");
        dormant.last_logon = Some(now() - Duration::days(120));
        dormant.member_of = vec!["Domain Admins".to_string()];
        let provider = InMemorySnapshotProvider::new(
            vec![user("alice"), dormant],
            vec![group("Domain Admins", &["dormant-admin"])],
        );

        let report = run_full_report(
            &provider,
            &RuleSet::default(),
            &AuditOptions::default(),
            now(),
        )
        .unwrap();

        assert_eq!(report.user_audit.len(), 2);
        assert_eq!(report.group_audit.len(), 1);
        assert_eq!(report.permissions_audit.len(), 1);
        assert_eq!(report.inactive_audit.len(), 1);
        assert_eq!(report.inactive_audit[0].risk_level, RiskLevel::Critical);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "urgent: review 1 critical-risk accounts"));
    }

    #[test]
    fn fetch_failure_aborts_the_whole_composite() {
        let err = run_full_report(
            &FailingProvider,
            &RuleSet::default(),
            &AuditOptions::default(),
            now(),
        )
        .unwrap_err();

        match err {
            ComplianceError::SnapshotFetch {
                audit_type, stage, ..
            } => {
                assert_eq!(audit_type, "full");
                assert_eq!(stage, "users");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_inactive_threshold_runs_and_selects_all_idle_accounts() {
        let mut rules = RuleSet::default();
        rules.max_inactive_days = 0;
        let provider = InMemorySnapshotProvider::new(vec![user("alice")], vec![]);

        let batch =
            run_inactive_audit(&provider, &rules, &AuditOptions { inactive_days: 0, ..AuditOptions::default() }, now())
                .unwrap();
        // alice last logged on 5 days ago; with a zero threshold she is
        // selected rather than the configuration being rejected.
        assert_eq!(batch.total(), 1);
        assert_eq!(batch.results[0].identity, "alice");
    }

    #[test]
    fn report_serializes_with_stable_field_names() {
        let provider = InMemorySnapshotProvider::new(vec![user("alice")], vec![]);
        let report = run_full_report(
            &provider,
            &RuleSet::default(),
            &AuditOptions::default(),
            now(),
        )
        .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "summary",
            "recommendations",
            "userAudit",
            "groupAudit",
            "permissionsAudit",
            "inactiveAudit",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert!(json["summary"].get("overallComplianceScore").is_some());
    }
}
