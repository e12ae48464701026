//! The directory seam: snapshot providers.
//!
//! The evaluation core never talks to a live directory. A provider performs
//! one synchronous fetch per entity kind and hands over plain records; the
//! production implementation wraps whatever directory client the host
//! application uses.

use crate::domain::{DirectoryGroupRecord, DirectoryUserRecord};
use crate::error::ComplianceResult;

/// Supplies directory entity snapshots for one audit invocation.
///
/// `scope` is an optional provider-defined sub-scope filter (an OU path, a
/// department, a search base). Fetch failures are fatal to the audit type
/// being run; the core never retries.
pub trait SnapshotProvider {
    fn fetch_users(
        &self,
        scope: Option<&str>,
        include_disabled: bool,
    ) -> ComplianceResult<Vec<DirectoryUserRecord>>;

    fn fetch_groups(&self, scope: Option<&str>) -> ComplianceResult<Vec<DirectoryGroupRecord>>;
}

/// Provider over records already in memory.
///
/// Backs tests and offline evaluation of exported snapshots. The scope
/// filter matches the user's department; groups ignore scope.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotProvider {
    pub users: Vec<DirectoryUserRecord>,
    pub groups: Vec<DirectoryGroupRecord>,
}

impl InMemorySnapshotProvider {
    pub fn new(users: Vec<DirectoryUserRecord>, groups: Vec<DirectoryGroupRecord>) -> Self {
        Self { users, groups }
    }
}

impl SnapshotProvider for InMemorySnapshotProvider {
    fn fetch_users(
        &self,
        scope: Option<&str>,
        include_disabled: bool,
    ) -> ComplianceResult<Vec<DirectoryUserRecord>> {
        Ok(self
            .users
            .iter()
            .filter(|u| include_disabled || u.enabled)
            .filter(|u| scope.map_or(true, |s| u.department == s))
            .cloned()
            .collect())
    }

    fn fetch_groups(&self, _scope: Option<&str>) -> ComplianceResult<Vec<DirectoryGroupRecord>> {
        Ok(self.groups.clone())
    }
}
