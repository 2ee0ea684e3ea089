//! The remote store capability shared by every component.

use async_trait::async_trait;
use foyer_core::types::DbId;
use foyer_db::models::checklist_item_state::ChecklistItemState;
use foyer_db::models::family_member::FamilyMember;
use foyer_db::models::todo::{CreateTodo, Todo};
use foyer_events::Subscription;

use crate::error::StoreError;

/// Query, write and subscribe operations against the three household tables.
///
/// Calls have no timeout: each either resolves or stays pending. No
/// implementation retries on its own.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Check the store answers. Stores without a connection are always up.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// All family members, name ascending.
    async fn list_members(&self) -> Result<Vec<FamilyMember>, StoreError>;

    /// Insert a member. Duplicate names are rejected by the store.
    async fn insert_member(&self, name: &str) -> Result<(), StoreError>;

    /// All to-dos, newest first.
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError>;

    /// Insert a new, incomplete to-do.
    async fn insert_todo(&self, todo: &CreateTodo) -> Result<(), StoreError>;

    /// Set the completion flag of the to-do matching `id`. Returns whether a
    /// row matched.
    async fn update_todo_completion(&self, id: DbId, is_completed: bool) -> Result<bool, StoreError>;

    /// All persisted checklist item states.
    async fn list_checklist_states(&self) -> Result<Vec<ChecklistItemState>, StoreError>;

    /// Insert default rows in one batch, leaving any key that already exists
    /// untouched.
    async fn seed_checklist_states(&self, rows: &[ChecklistItemState]) -> Result<(), StoreError>;

    /// Insert or overwrite one item state, keyed on `(section_id, item_id)`.
    async fn upsert_checklist_state(&self, row: &ChecklistItemState) -> Result<(), StoreError>;

    /// Open a change-feed subscription on `checklist_item_states`.
    fn subscribe_checklist(&self) -> Subscription<ChecklistItemState>;
}
