//! [`RemoteStore`] backed by PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use foyer_core::types::DbId;
use foyer_db::models::checklist_item_state::ChecklistItemState;
use foyer_db::models::family_member::FamilyMember;
use foyer_db::models::todo::{CreateTodo, Todo};
use foyer_db::repositories::{ChecklistItemStateRepo, FamilyMemberRepo, TodoRepo};
use foyer_db::DbPool;
use foyer_events::{ChangeFeed, Subscription};

use crate::error::StoreError;
use crate::store::RemoteStore;

/// Store that runs queries through the repositories and serves
/// subscriptions from a [`ChangeFeed`] fed by the `LISTEN/NOTIFY` relay.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
    feed: Arc<ChangeFeed>,
}

impl PgStore {
    pub fn new(pool: DbPool, feed: Arc<ChangeFeed>) -> Self {
        Self { pool, feed }
    }
}

#[async_trait]
impl RemoteStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(foyer_db::health_check(&self.pool).await?)
    }

    async fn list_members(&self) -> Result<Vec<FamilyMember>, StoreError> {
        Ok(FamilyMemberRepo::list(&self.pool).await?)
    }

    async fn insert_member(&self, name: &str) -> Result<(), StoreError> {
        FamilyMemberRepo::create(&self.pool, name).await?;
        Ok(())
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(TodoRepo::list(&self.pool).await?)
    }

    async fn insert_todo(&self, todo: &CreateTodo) -> Result<(), StoreError> {
        let created = TodoRepo::create(&self.pool, todo).await?;
        tracing::debug!(todo_id = created.id, "Inserted to-do");
        Ok(())
    }

    async fn update_todo_completion(&self, id: DbId, is_completed: bool) -> Result<bool, StoreError> {
        Ok(TodoRepo::set_completed(&self.pool, id, is_completed).await?)
    }

    async fn list_checklist_states(&self) -> Result<Vec<ChecklistItemState>, StoreError> {
        Ok(ChecklistItemStateRepo::list(&self.pool).await?)
    }

    async fn seed_checklist_states(&self, rows: &[ChecklistItemState]) -> Result<(), StoreError> {
        let inserted = ChecklistItemStateRepo::insert_missing(&self.pool, rows).await?;
        tracing::debug!(requested = rows.len(), inserted, "Seeded checklist item states");
        Ok(())
    }

    async fn upsert_checklist_state(&self, row: &ChecklistItemState) -> Result<(), StoreError> {
        Ok(ChecklistItemStateRepo::upsert(&self.pool, row).await?)
    }

    fn subscribe_checklist(&self) -> Subscription<ChecklistItemState> {
        self.feed.subscribe(ChecklistItemState::TABLE)
    }
}
