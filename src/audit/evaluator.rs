//! Per-entity compliance evaluation.
//!
//! Maps one directory record plus the rule set to an [`AuditResult`].
//! Checks run in a fixed order; each appends at most one violation and may
//! raise the risk level. Escalation is `max`-folded on [`RiskLevel`], so
//! the monotonic-escalation invariant holds by construction. `now` is
//! always an argument: evaluating the same record twice with the same
//! inputs yields an identical result.

use chrono::{DateTime, Utc};

use crate::domain::{
    AuditResult, DirectoryGroupRecord, DirectoryUserRecord, EntityKind, MemberActivity,
    MemberBreakdown, RiskLevel, RuleSet, MEMBER_INACTIVITY_DAYS,
};
use crate::snapshot::DirectorySnapshot;

/// Evaluate one user record against the rule set.
pub fn evaluate_user(
    user: &DirectoryUserRecord,
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> AuditResult {
    let mut result = AuditResult::new(&user.identity, &user.display_name, EntityKind::User);

    // Check 1: required attributes must be non-empty.
    for name in &rules.required_user_attributes {
        match user.attribute(name) {
            Some(value) if value.trim().is_empty() => {
                result.record_violation(format!("missing attribute: {name}"));
            }
            Some(_) => {}
            None => {
                // Unknown attribute name in the configuration: soft skip.
                tracing::debug!(
                    identity = user.identity.as_str(),
                    attribute = name.as_str(),
                    "Unrecognized required attribute skipped"
                );
            }
        }
    }

    // Check 2: password age.
    if let Some(password_last_set) = user.password_last_set {
        let age = now.signed_duration_since(password_last_set).num_days();
        if age > i64::from(rules.max_password_age_days) {
            result.record_violation(format!("password too old ({age} days)"));
            result.escalate(RiskLevel::Medium);
        }
    }

    // Check 3: inactivity. Absence of a logon is a checked state of its
    // own, not a skip.
    match user.last_logon {
        Some(last_logon) => {
            let inactivity = now.signed_duration_since(last_logon).num_days();
            if inactivity > i64::from(rules.max_inactive_days) {
                result.record_violation(format!("inactive account ({inactivity} days)"));
                result.escalate(RiskLevel::High);
            }
        }
        None => {
            result.record_violation("no recorded logon".to_string());
            result.escalate(RiskLevel::Medium);
        }
    }

    // Check 4: expired account.
    if let Some(expires) = user.account_expires {
        if expires < now {
            result.record_violation("account expired".to_string());
            result.escalate(RiskLevel::High);
        }
    }

    // Check 5: sensitive-group membership. Tracked and escalated, never a
    // violation on its own. Dangling group references are skipped.
    for reference in &user.member_of {
        match snapshot.resolve_group_name(reference) {
            Some(name) if rules.is_sensitive_group(name) => {
                result.record_sensitive_group(name);
            }
            Some(_) => {}
            None => {
                tracing::debug!(
                    identity = user.identity.as_str(),
                    group = reference.as_str(),
                    "Unresolvable group reference skipped"
                );
            }
        }
    }

    result
}

/// Classify a group member that resolved to a user record.
pub fn classify_member(user: &DirectoryUserRecord, now: DateTime<Utc>) -> MemberActivity {
    if !user.enabled {
        return MemberActivity::Disabled;
    }
    match user.last_logon {
        Some(last_logon)
            if now.signed_duration_since(last_logon).num_days() <= MEMBER_INACTIVITY_DAYS =>
        {
            MemberActivity::Active
        }
        _ => MemberActivity::Inactive,
    }
}

/// Evaluate one group record against the rule set.
pub fn evaluate_group(
    group: &DirectoryGroupRecord,
    snapshot: &DirectorySnapshot,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> AuditResult {
    let mut result = AuditResult::new(&group.name, &group.name, EntityKind::Group);

    // Check 1: sensitive groups sit at High regardless of violations.
    let is_sensitive = rules.is_sensitive_group(&group.name);
    if is_sensitive {
        result.record_sensitive_group(&group.name);
    }

    // Check 2: member cap on sensitive groups.
    let member_count = group.member_count();
    if is_sensitive && member_count > rules.max_members_in_sensitive_group as usize {
        result.record_violation(format!(
            "too many members in sensitive group ({member_count})"
        ));
    }

    // Check 3: empty non-sensitive group.
    if member_count == 0 && !is_sensitive {
        result.record_violation("group has no members".to_string());
        result.escalate(RiskLevel::Medium);
    }

    // Check 4: missing description, no escalation.
    if group
        .description
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        result.record_violation("missing description".to_string());
    }

    // Check 5: member activity. Only members resolving to a user record
    // are classified; nested groups and dangling references are not.
    let mut breakdown = MemberBreakdown::default();
    for member in &group.members {
        match snapshot.user(member) {
            Some(user) => breakdown.tally(classify_member(user, now)),
            None => breakdown.unclassified += 1,
        }
    }
    if breakdown.disabled > 0 {
        result.record_violation(format!("{} disabled members", breakdown.disabled));
        result.escalate(RiskLevel::Medium);
    }
    result.member_breakdown = Some(breakdown);

    result
}
