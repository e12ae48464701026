//! Append-only audit log for mutating account-management actions.
//!
//! The evaluation core performs no mutation itself; the user-management
//! flows that do (create/update/delete/enable/disable) record one entry per
//! terminal action through this log. Entries are JSON lines, one per line,
//! appended and never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComplianceResult;

/// The fixed set of auditable mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditAction {
    AccountCreated,
    AccountUpdated,
    AccountDeleted,
    AccountEnabled,
    AccountDisabled,
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    /// Identity of the account the action was performed on.
    pub target: String,
    /// Identity of the operator who performed the action.
    pub operator: String,
    /// Opaque details payload; the log does not interpret it.
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        action: AuditAction,
        target: &str,
        operator: &str,
        details: serde_json::Value,
    ) -> Self {
        Self {
            timestamp,
            action,
            target: target.to_string(),
            operator: operator.to_string(),
            details,
        }
    }
}

/// Append-only JSON-lines audit log backed by a file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append one entry. The file is created on first use and only ever
    /// opened in append mode.
    pub fn append(&self, entry: &AuditEntry) -> ComplianceResult<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        tracing::debug!(
            action = ?entry.action,
            target = entry.target.as_str(),
            operator = entry.operator.as_str(),
            "Audit entry recorded"
        );
        Ok(())
    }

    /// Read all entries back, oldest first.
    pub fn read_all(&self) -> ComplianceResult<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let mut entries = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            entries.push(serde_json::from_str(line)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry(action: AuditAction, target: &str) -> AuditEntry {
        AuditEntry::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            action,
            target,
            "it-operator",
            json!({"template": "standard-user"}),
        )
    }

    #[test]
    fn entries_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(&dir.path().join("audit.jsonl"));

        log.append(&entry(AuditAction::AccountCreated, "jdoe")).unwrap();
        log.append(&entry(AuditAction::AccountDisabled, "jdoe")).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::AccountCreated);
        assert_eq!(entries[1].action, AuditAction::AccountDisabled);
        assert_eq!(entries[1].target, "jdoe");
    }

    #[test]
    fn existing_entries_survive_later_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        AuditLog::new(&path)
            .append(&entry(AuditAction::AccountCreated, "a"))
            .unwrap();
        // A fresh handle must not truncate.
        AuditLog::new(&path)
            .append(&entry(AuditAction::AccountDeleted, "b"))
            .unwrap();

        let entries = AuditLog::new(&path).read_all().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(&dir.path().join("nope.jsonl"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
