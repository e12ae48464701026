//! Audit aggregators: run the entity evaluator across one collection.
//!
//! All four variants are pure functions of (snapshot, rules, thresholds,
//! now); none mutates its inputs. Entities are evaluated independently, in
//! snapshot order.

use chrono::{DateTime, Utc};

use crate::domain::{
    AuditBatch, AuditResult, DirectoryUserRecord, EntityKind, RiskLevel, RuleSet,
};
use crate::snapshot::DirectorySnapshot;

use super::evaluator::{evaluate_group, evaluate_user};

/// Fixed stale-logon window for the privileged audit. Deliberately tighter
/// than, and independent of, the general `max_inactive_days` rule.
pub const PRIVILEGED_STALE_LOGON_DAYS: i64 = 30;

/// Evaluate every user record, optionally skipping disabled accounts.
pub fn audit_users(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    include_disabled: bool,
    now: DateTime<Utc>,
) -> AuditBatch {
    let results: Vec<AuditResult> = snapshot
        .users()
        .iter()
        .filter(|u| include_disabled || u.enabled)
        .map(|u| evaluate_user(u, snapshot, rules, now))
        .collect();

    tracing::info!(
        total = results.len(),
        non_compliant = results.iter().filter(|r| !r.compliant).count(),
        "User audit completed"
    );
    AuditBatch::from_results(results)
}

/// Evaluate every group record.
pub fn audit_groups(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> AuditBatch {
    let results: Vec<AuditResult> = snapshot
        .groups()
        .iter()
        .map(|g| evaluate_group(g, snapshot, rules, now))
        .collect();

    tracing::info!(
        total = results.len(),
        non_compliant = results.iter().filter(|r| !r.compliant).count(),
        "Group audit completed"
    );
    AuditBatch::from_results(results)
}

/// Audit the recursively-resolved membership of the sensitive groups.
///
/// Every privileged account starts at High; the additional checks append
/// violations without further escalation.
pub fn audit_privileged(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> AuditBatch {
    // identity -> (record, sensitive groups it is reachable from), in
    // first-seen order.
    let mut order: Vec<&DirectoryUserRecord> = Vec::new();
    let mut memberships: std::collections::HashMap<&str, Vec<&str>> =
        std::collections::HashMap::new();

    for group_name in &rules.sensitive_group_names {
        for user in snapshot.resolve_group_members_recursive(group_name) {
            let entry = memberships.entry(user.identity.as_str()).or_insert_with(|| {
                order.push(user);
                Vec::new()
            });
            entry.push(group_name.as_str());
        }
    }

    let mut results = Vec::with_capacity(order.len());
    for user in order {
        let mut result = AuditResult::new(&user.identity, &user.display_name, EntityKind::User);
        result.escalate(RiskLevel::High);
        for group_name in &memberships[user.identity.as_str()] {
            result.record_sensitive_group(group_name);
        }

        if !user.enabled {
            result.record_violation("disabled account with privileges".to_string());
        }
        if user.manager.as_deref().map_or(true, |m| m.trim().is_empty()) {
            result.record_violation("missing manager".to_string());
        }
        match user.last_logon {
            Some(last_logon) => {
                let days = now.signed_duration_since(last_logon).num_days();
                if days > PRIVILEGED_STALE_LOGON_DAYS {
                    result.record_violation(format!("stale logon ({days} days)"));
                }
            }
            None => {
                result.record_violation("no recorded logon".to_string());
            }
        }

        results.push(result);
    }

    tracing::info!(
        total = results.len(),
        with_issues = results.iter().filter(|r| !r.compliant).count(),
        "Privileged account audit completed"
    );
    AuditBatch::from_results(results)
}

/// Audit enabled accounts whose last logon predates the threshold.
///
/// `inactive_days` is passed independently of the rule set's
/// `max_inactive_days`. Enabled accounts with no recorded logon are
/// included. Risk is Critical for accounts with sensitive access, else
/// Medium, with the matching recommended action.
pub fn audit_inactive(
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    inactive_days: u32,
    now: DateTime<Utc>,
) -> AuditBatch {
    let mut results = Vec::new();

    for user in snapshot.users().iter().filter(|u| u.enabled) {
        let inactivity = user
            .last_logon
            .map(|logon| now.signed_duration_since(logon).num_days());
        let selected = match inactivity {
            Some(days) => days > i64::from(inactive_days),
            None => true,
        };
        if !selected {
            continue;
        }

        let mut result = AuditResult::new(&user.identity, &user.display_name, EntityKind::User);
        match inactivity {
            Some(days) => result.record_violation(format!("inactive account ({days} days)")),
            None => result.record_violation("no recorded logon".to_string()),
        }

        for reference in &user.member_of {
            match snapshot.resolve_group_name(reference) {
                Some(name) if rules.is_sensitive_group(name) => {
                    result.record_sensitive_group(name);
                }
                _ => {}
            }
        }

        if result.has_sensitive_access {
            result.escalate(RiskLevel::Critical);
            result.recommended_action = Some("disable immediately".to_string());
        } else {
            result.escalate(RiskLevel::Medium);
            result.recommended_action = Some("disable after notification".to_string());
        }

        results.push(result);
    }

    tracing::info!(
        total = results.len(),
        critical = results
            .iter()
            .filter(|r| r.risk_level == RiskLevel::Critical)
            .count(),
        "Inactive account audit completed"
    );
    AuditBatch::from_results(results)
}
