//! In-memory directory snapshot with identity indexes.
//!
//! Replaces live LDAP lookups with map lookups over pre-fetched records.
//! Recursive member resolution is the in-memory counterpart of transitive
//! group-membership matching on the directory side: it follows nested
//! groups with a visited set, so membership cycles terminate.

pub mod provider;

pub use provider::{InMemorySnapshotProvider, SnapshotProvider};

use std::collections::{HashMap, HashSet};

use crate::domain::{DirectoryGroupRecord, DirectoryUserRecord};

/// One audit invocation's view of the directory.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    users: Vec<DirectoryUserRecord>,
    groups: Vec<DirectoryGroupRecord>,
    user_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
}

impl DirectorySnapshot {
    pub fn new(users: Vec<DirectoryUserRecord>, groups: Vec<DirectoryGroupRecord>) -> Self {
        let user_index = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.identity.clone(), i))
            .collect();
        let group_index = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name.clone(), i))
            .collect();
        Self {
            users,
            groups,
            user_index,
            group_index,
        }
    }

    pub fn users(&self) -> &[DirectoryUserRecord] {
        &self.users
    }

    pub fn groups(&self) -> &[DirectoryGroupRecord] {
        &self.groups
    }

    pub fn user(&self, identity: &str) -> Option<&DirectoryUserRecord> {
        self.user_index.get(identity).map(|&i| &self.users[i])
    }

    pub fn group(&self, name: &str) -> Option<&DirectoryGroupRecord> {
        self.group_index.get(name).map(|&i| &self.groups[i])
    }

    /// Resolve a membership reference to a group name.
    ///
    /// Returns `None` for dangling references; callers treat that as a soft
    /// failure and skip the cross-reference.
    pub fn resolve_group_name(&self, reference: &str) -> Option<&str> {
        self.group(reference).map(|g| g.name.as_str())
    }

    /// All user records reachable through a group's membership, following
    /// nested groups.
    ///
    /// Order follows the directory's member ordering, depth-first; each
    /// user appears once even when reachable through several paths.
    /// Members that resolve to neither a user nor a group are skipped.
    pub fn resolve_group_members_recursive(&self, group_name: &str) -> Vec<&DirectoryUserRecord> {
        let mut resolved = Vec::new();
        let mut seen_users: HashSet<&str> = HashSet::new();
        let mut visited_groups: HashSet<&str> = HashSet::new();
        self.collect_members(group_name, &mut resolved, &mut seen_users, &mut visited_groups);
        resolved
    }

    fn collect_members<'a>(
        &'a self,
        group_name: &str,
        resolved: &mut Vec<&'a DirectoryUserRecord>,
        seen_users: &mut HashSet<&'a str>,
        visited_groups: &mut HashSet<&'a str>,
    ) {
        let Some(group) = self.group(group_name) else {
            tracing::debug!(group = group_name, "Unresolvable group reference skipped");
            return;
        };
        if !visited_groups.insert(group.name.as_str()) {
            return;
        }

        for member in &group.members {
            if let Some(user) = self.user(member) {
                if seen_users.insert(user.identity.as_str()) {
                    resolved.push(user);
                }
            } else if self.group(member).is_some() {
                self.collect_members(member, resolved, seen_users, visited_groups);
            } else {
                tracing::debug!(
                    group = group.name.as_str(),
                    member = member.as_str(),
                    "Unresolvable member reference skipped"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupCategory, GroupScope};
    use chrono::{TimeZone, Utc};

    fn user(identity: &str) -> DirectoryUserRecord {
        DirectoryUserRecord {
            identity: identity.to_string(),
            display_name: identity.to_uppercase(),
            email: format!("{identity}@example.com"),
            department: "IT".to_string(),
            title: "Engineer".to_string(),
            manager: None,
            created: Utc.with_ymd_and_hms(2022, 3, 1, 9, 0, 0).unwrap(),
            last_logon: None,
            password_last_set: None,
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
            created: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn recursive_resolution_follows_nesting() {
        let snapshot = DirectorySnapshot::new(
            vec![user("alice"), user("bob"), user("carol")],
            vec![
                group("Domain Admins", &["alice", "Server Operators"]),
                group("Server Operators", &["bob", "carol"]),
            ],
        );

        let members = snapshot.resolve_group_members_recursive("Domain Admins");
        let identities: Vec<_> = members.iter().map(|u| u.identity.as_str()).collect();
        assert_eq!(identities, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn membership_cycles_terminate() {
        let snapshot = DirectorySnapshot::new(
            vec![user("alice")],
            vec![
                group("A", &["alice", "B"]),
                group("B", &["A"]),
            ],
        );

        let members = snapshot.resolve_group_members_recursive("A");
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let snapshot = DirectorySnapshot::new(
            vec![user("alice")],
            vec![group("A", &["alice", "ghost-user", "ghost-group"])],
        );

        let members = snapshot.resolve_group_members_recursive("A");
        assert_eq!(members.len(), 1);
        assert!(snapshot.resolve_group_name("ghost-group").is_none());
    }
}
