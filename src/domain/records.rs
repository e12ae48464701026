//! Directory entity snapshots consumed by the evaluators.
//!
//! Records are read-only inputs: they are built once per audit run from the
//! directory provider and never mutated by any check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group scope as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupScope {
    DomainLocal,
    Global,
    Universal,
}

/// Group category as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupCategory {
    Security,
    Distribution,
}

/// One user account snapshot at audit time.
///
/// `identity` is the sAMAccountName-style short name and is unique within a
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUserRecord {
    pub identity: String,
    pub display_name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub manager: Option<String>,
    pub created: DateTime<Utc>,
    /// Absent means the account has never logged on; a checked state, not
    /// an error.
    pub last_logon: Option<DateTime<Utc>>,
    pub password_last_set: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub locked: bool,
    pub account_expires: Option<DateTime<Utc>>,
    /// Group identities the account belongs to, in directory order.
    pub member_of: Vec<String>,
}

impl DirectoryUserRecord {
    /// Look up a named attribute for the required-attribute check.
    ///
    /// Returns `None` for attribute names the record does not carry, which
    /// the evaluator treats as a soft skip rather than a violation.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "displayName" => Some(self.display_name.as_str()),
            "email" | "mail" => Some(self.email.as_str()),
            "department" => Some(self.department.as_str()),
            "title" => Some(self.title.as_str()),
            "manager" => Some(self.manager.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}

/// One group snapshot.
///
/// Members may include nested groups; the caller decides whether membership
/// was resolved recursively before the snapshot was handed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroupRecord {
    pub name: String,
    pub description: Option<String>,
    pub scope: GroupScope,
    pub category: GroupCategory,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Member identities: user identities and/or nested group names.
    pub members: Vec<String>,
}

impl DirectoryGroupRecord {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Activity classification of a group member that resolved to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberActivity {
    Active,
    /// No logon within the fixed 90-day classification window.
    Inactive,
    Disabled,
}

/// Fixed window used when classifying group members as inactive. Distinct
/// from the configurable `max_inactive_days` rule threshold.
pub const MEMBER_INACTIVITY_DAYS: i64 = 90;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> DirectoryUserRecord {
        DirectoryUserRecord {
            identity: "jdoe".to_string(),
            display_name: "John Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            department: "Finance".to_string(),
            title: "Analyst".to_string(),
            manager: None,
            created: Utc.with_ymd_and_hms(2023, 1, 10, 8, 0, 0).unwrap(),
            last_logon: None,
            password_last_set: None,
            enabled: true,
            locked: false,
            account_expires: None,
            member_of: vec![],
        }
    }

    #[test]
    fn attribute_lookup_maps_known_names() {
        let user = sample_user();
        assert_eq!(user.attribute("displayName"), Some("John Doe"));
        assert_eq!(user.attribute("mail"), Some("jdoe@example.com"));
        assert_eq!(user.attribute("manager"), Some(""));
        assert_eq!(user.attribute("telephoneNumber"), None);
    }
}
