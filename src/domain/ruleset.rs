//! Rule set configuration driving all compliance checks.
//!
//! Loaded once per evaluation run and immutable thereafter, so every
//! evaluator stays a pure function of (record, rules, now).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, ComplianceResult};

/// Groups treated as sensitive when the configuration does not name any.
pub static DEFAULT_SENSITIVE_GROUPS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    [
        "Domain Admins",
        "Enterprise Admins",
        "Schema Admins",
        "Administrators",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Thresholds and enumerations driving the compliance checks.
///
/// Sensitive-group membership tests are case-sensitive exact matches
/// against the group name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// Attribute names that must be non-empty on every user record.
    pub required_user_attributes: BTreeSet<String>,
    pub max_password_age_days: u32,
    pub max_inactive_days: u32,
    pub sensitive_group_names: BTreeSet<String>,
    pub max_members_in_sensitive_group: u32,
    /// Retention window per data category (department), in days. Used only
    /// by the GDPR report flow.
    pub data_retention_days: BTreeMap<String, u32>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            required_user_attributes: ["displayName", "email", "department"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_password_age_days: 90,
            max_inactive_days: 90,
            sensitive_group_names: DEFAULT_SENSITIVE_GROUPS.clone(),
            max_members_in_sensitive_group: 10,
            data_retention_days: BTreeMap::new(),
        }
    }
}

impl RuleSet {
    /// Load a rule set from a TOML configuration document.
    ///
    /// No key is required: every key falls back to its documented default.
    /// A key of the wrong type (a non-numeric threshold, a non-list group
    /// set) is a configuration error and fails the invocation before any
    /// entity is evaluated. Thresholds are unsigned, so any accepted value
    /// is non-negative; zero is valid and simply makes the check maximally
    /// strict.
    pub fn load(path: &Path) -> ComplianceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ComplianceResult<Self> {
        toml::from_str(content)
            .map_err(|e| ComplianceError::Config(format!("invalid rule set: {e}")))
    }

    /// Case-sensitive exact-match test against the sensitive group list.
    pub fn is_sensitive_group(&self, group_name: &str) -> bool {
        self.sensitive_group_names.contains(group_name)
    }

    /// Retention window for a data category, if one is configured.
    pub fn retention_days_for(&self, category: &str) -> Option<u32> {
        self.data_retention_days.get(category).copied()
    }
}
