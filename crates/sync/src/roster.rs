//! Family roster: the names to-dos can be assigned to.

use std::sync::Arc;

use foyer_core::validation::validate_member_name;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{StoreError, SyncError};
use crate::store::RemoteStore;

/// Shown when the store refuses a new member.
pub const MEMBER_REJECTED: &str = "Could not add the family member. Is the name unique?";

/// Snapshot of the roster form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterState {
    /// Names ascending.
    pub members: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct RosterManager {
    store: Arc<dyn RemoteStore>,
    state: watch::Sender<RosterState>,
}

impl RosterManager {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (state, _) = watch::channel(RosterState::default());
        Self { store, state }
    }

    pub fn snapshot(&self) -> RosterState {
        self.state.borrow().clone()
    }

    /// Fetch all members, name ascending. Keeps the last list on failure.
    pub async fn load(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        match self.store.list_members().await {
            Ok(members) => {
                let mut names: Vec<String> = members.into_iter().map(|m| m.name).collect();
                names.sort();
                self.state.send_modify(|s| {
                    s.members = names;
                    s.is_loading = false;
                    s.error = None;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch family members");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    /// Add a member and reload. Returns the stored (trimmed) name.
    ///
    /// Empty names and names already in the loaded list are rejected
    /// without calling the store. A rejection by the store is reported as
    /// [`MEMBER_REJECTED`].
    pub async fn add(&self, name: &str) -> Result<String, SyncError> {
        let name = {
            let state = self.state.borrow();
            validate_member_name(name, &state.members)
        };
        let name = match name {
            Ok(name) => name,
            Err(e) => {
                self.state.send_modify(|s| s.error = Some(e.user_message()));
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.insert_member(&name).await {
            tracing::warn!(member = %name, error = %e, "Failed to add family member");
            // The store's own rejection text stays in the log.
            let (err, message) = match e {
                StoreError::Rejected(_) => (
                    StoreError::Rejected(MEMBER_REJECTED.to_string()),
                    MEMBER_REJECTED.to_string(),
                ),
                other => {
                    let message = other.to_string();
                    (other, message)
                }
            };
            self.state.send_modify(|s| s.error = Some(message));
            return Err(err.into());
        }

        tracing::info!(member = %name, "Family member added");
        self.load().await;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use foyer_core::error::CoreError;
    use foyer_core::validation::{MEMBER_ALREADY_EXISTS, MEMBER_NAME_EMPTY};

    use super::*;
    use crate::memory::{MemoryStore, StoreOp};

    async fn roster(store: &Arc<MemoryStore>) -> RosterManager {
        let roster = RosterManager::new(store.clone());
        roster.load().await;
        roster
    }

    #[tokio::test]
    async fn add_reloads_sorted_roster() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let roster = roster(&store).await;

        let added = roster.add("  Bob ").await.unwrap();

        assert_eq!(added, "Bob");
        assert_eq!(roster.snapshot().members, vec!["Alice", "Bob"]);
        assert_eq!(store.call_count(StoreOp::ListMembers), 2);
    }

    #[tokio::test]
    async fn known_name_is_rejected_without_insert() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let roster = roster(&store).await;

        let err = roster.add("Alice").await.unwrap_err();

        assert_matches!(err, SyncError::Core(CoreError::Validation(msg)) if msg == MEMBER_ALREADY_EXISTS);
        assert_eq!(store.call_count(StoreOp::InsertMember), 0);
        assert_eq!(roster.snapshot().error.as_deref(), Some(MEMBER_ALREADY_EXISTS));
    }

    #[tokio::test]
    async fn matching_is_case_sensitive() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let roster = roster(&store).await;

        roster.add("alice").await.unwrap();

        assert_eq!(roster.snapshot().members, vec!["Alice", "alice"]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let roster = roster(&store).await;

        let err = roster.add("   ").await.unwrap_err();

        assert_matches!(err, SyncError::Core(CoreError::Validation(msg)) if msg == MEMBER_NAME_EMPTY);
        assert_eq!(store.call_count(StoreOp::InsertMember), 0);
    }

    #[tokio::test]
    async fn store_rejection_is_reported_generically() {
        // Another client added Bob after our list was loaded.
        let store = Arc::new(MemoryStore::new());
        let roster = roster(&store).await;
        store.insert_member("Bob").await.unwrap();

        let err = roster.add("Bob").await.unwrap_err();

        assert_matches!(err, SyncError::Store(StoreError::Rejected(msg)) if msg == MEMBER_REJECTED);
        assert_eq!(roster.snapshot().error.as_deref(), Some(MEMBER_REJECTED));
        assert!(roster.snapshot().members.is_empty());
    }

    #[tokio::test]
    async fn load_failure_keeps_last_list() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let roster = roster(&store).await;
        store.fail_on(StoreOp::ListMembers);

        roster.load().await;

        assert_eq!(roster.snapshot().members, vec!["Alice"]);
        assert!(roster.snapshot().error.is_some());
    }
}
