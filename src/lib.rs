//! Rule-based compliance evaluation for Active Directory snapshots.
//!
//! The crate is the policy-evaluation core of an account-lifecycle and
//! compliance-reporting toolkit: it consumes pre-fetched directory
//! snapshots plus a configured rule set and produces structured violation
//! and score records for external renderers (HTML/CSV/JSON/Excel) and
//! front-ends. It never talks to a directory itself and never mutates one.
//!
//! Layers, leaves first:
//!
//! - [`domain`]: records, rule set, audit results, report structures;
//! - [`snapshot`]: the directory seam, a provider trait and indexed
//!   in-memory snapshot with recursive member resolution;
//! - [`audit`]: per-entity evaluator, the four aggregators, both score
//!   composers and the audit runner;
//! - [`audit_log`]: append-only records for mutating account actions.

pub mod audit;
pub mod audit_log;
pub mod domain;
pub mod error;
pub mod logging;
pub mod snapshot;

pub use audit::{
    audit_groups, audit_inactive, audit_privileged, audit_users, compose_report, evaluate_group,
    evaluate_user, run_full_report, run_standard_report, standard_report, AuditOptions, AuditType,
};
pub use audit_log::{AuditAction, AuditEntry, AuditLog};
pub use domain::{
    AuditBatch, AuditResult, ComplianceReport, ComplianceStandard, ComplianceSummary,
    DirectoryGroupRecord, DirectoryUserRecord, RiskLevel, RuleSet, StandardComplianceReport,
};
pub use error::{ComplianceError, ComplianceResult};
pub use snapshot::{DirectorySnapshot, InMemorySnapshotProvider, SnapshotProvider};
