//! Daily to-do list: write-then-reload, no optimistic updates.

use std::sync::Arc;

use foyer_core::error::CoreError;
use foyer_core::types::DbId;
use foyer_core::validation::validate_new_todo;
use foyer_db::models::todo::{CreateTodo, Todo};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::SyncError;
use crate::store::RemoteStore;

/// Input of the new to-do form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    pub task_text: String,
    #[serde(default)]
    pub assigned_to: String,
    /// `YYYY-MM-DD`; absent or blank means no due date.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Snapshot of the to-do screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoState {
    /// Newest first.
    pub todos: Vec<Todo>,
    /// Names offered in the assignee picker, ascending.
    pub members: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl TodoState {
    /// The assignee preselected in the form: the first member by name.
    pub fn default_assignee(&self) -> Option<&str> {
        self.members.first().map(String::as_str)
    }
}

/// Owns the to-do view model of one session.
pub struct TodoListManager {
    store: Arc<dyn RemoteStore>,
    state: watch::Sender<TodoState>,
}

impl TodoListManager {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (state, _) = watch::channel(TodoState::default());
        Self { store, state }
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    /// Load the member names used by the assignee picker.
    pub async fn load_members(&self) {
        match self.store.list_members().await {
            Ok(members) => {
                let names = members.into_iter().map(|m| m.name).collect();
                self.state.send_modify(|s| s.members = names);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch family members for to-dos");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
            }
        }
    }

    /// Fetch every to-do, newest first.
    ///
    /// On failure the last loaded collection is kept and the error recorded.
    pub async fn load(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        match self.store.list_todos().await {
            Ok(todos) => self.state.send_modify(|s| {
                s.todos = todos;
                s.is_loading = false;
                s.error = None;
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch to-dos");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
            }
        }
    }

    /// Validate and insert a new, incomplete to-do, then reload.
    ///
    /// Validation failures never reach the store. A failed reload after a
    /// successful insert is recorded by [`load`](Self::load) and does not
    /// fail the add.
    pub async fn add(&self, input: &NewTodo) -> Result<(), SyncError> {
        let roster_size = self.state.borrow().members.len();
        let validated = match validate_new_todo(
            &input.task_text,
            &input.assigned_to,
            input.due_date.as_deref(),
            roster_size,
        ) {
            Ok(v) => v,
            Err(e) => {
                self.state.send_modify(|s| s.error = Some(e.user_message()));
                return Err(e.into());
            }
        };

        let todo = CreateTodo {
            task_text: validated.task_text,
            assigned_to_member_name: validated.assigned_to,
            due_date: validated.due_date,
        };

        if let Err(e) = self.store.insert_todo(&todo).await {
            tracing::warn!(error = %e, "Failed to add to-do");
            self.state.send_modify(|s| s.error = Some(e.to_string()));
            return Err(e.into());
        }

        tracing::info!(task = %todo.task_text, assignee = %todo.assigned_to_member_name, "To-do added");
        self.load().await;
        Ok(())
    }

    /// Set the completion of `id` to `!current_status`, then reload.
    ///
    /// The list only changes once the store confirms. An id no longer in the
    /// store is reported as not found and the list is reloaded all the same.
    pub async fn toggle_completion(&self, id: DbId, current_status: bool) -> Result<(), SyncError> {
        match self.store.update_todo_completion(id, !current_status).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(todo_id = id, "Completion update matched no row");
                let err = CoreError::NotFound { entity: "Todo", id };
                self.load().await;
                self.state.send_modify(|s| s.error = Some(err.user_message()));
                return Err(err.into());
            }
            Err(e) => {
                tracing::warn!(todo_id = id, error = %e, "Failed to update to-do completion");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
                return Err(e.into());
            }
        }

        self.load().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use foyer_core::validation::{ASSIGNEE_REQUIRED, TASK_TEXT_EMPTY};

    use super::*;
    use crate::error::StoreError;
    use crate::memory::{MemoryStore, StoreOp};

    fn form(task_text: &str, assigned_to: &str, due_date: Option<&str>) -> NewTodo {
        NewTodo {
            task_text: task_text.to_string(),
            assigned_to: assigned_to.to_string(),
            due_date: due_date.map(str::to_string),
        }
    }

    async fn manager(store: &Arc<MemoryStore>) -> TodoListManager {
        let todos = TodoListManager::new(store.clone());
        todos.load_members().await;
        todos.load().await;
        todos
    }

    #[tokio::test]
    async fn add_inserts_incomplete_row_and_reloads() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let todos = manager(&store).await;

        todos.add(&form("Pay rent", "Alice", None)).await.unwrap();

        let rows = store.todo_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_text, "Pay rent");
        assert_eq!(rows[0].assigned_to_member_name, "Alice");
        assert_eq!(rows[0].due_date, None);
        assert!(!rows[0].is_completed);

        assert_eq!(store.call_count(StoreOp::ListTodos), 2);
        assert_eq!(todos.snapshot().todos, rows);
    }

    #[tokio::test]
    async fn blank_due_date_is_absent_and_valid_date_is_parsed() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let todos = manager(&store).await;

        todos.add(&form("Water plants", "Alice", Some("  "))).await.unwrap();
        todos.add(&form("Renew passport", "Alice", Some("2026-11-03"))).await.unwrap();

        let state = todos.snapshot();
        assert_eq!(state.todos[0].task_text, "Renew passport");
        assert_eq!(state.todos[0].due_date, NaiveDate::from_ymd_opt(2026, 11, 3));
        assert_eq!(state.todos[1].due_date, None);
    }

    #[tokio::test]
    async fn empty_task_text_never_reaches_store() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let todos = manager(&store).await;

        let err = todos.add(&form("   ", "Alice", None)).await.unwrap_err();

        assert_matches!(err, SyncError::Core(CoreError::Validation(msg)) if msg == TASK_TEXT_EMPTY);
        assert_eq!(store.call_count(StoreOp::InsertTodo), 0);
        assert_eq!(todos.snapshot().error.as_deref(), Some(TASK_TEXT_EMPTY));
    }

    #[tokio::test]
    async fn assignee_required_only_when_roster_is_not_empty() {
        let store = Arc::new(MemoryStore::new().with_members(["Alice"]));
        let todos = manager(&store).await;
        let err = todos.add(&form("Pay rent", "", None)).await.unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::Validation(msg)) if msg == ASSIGNEE_REQUIRED);

        let empty = Arc::new(MemoryStore::new());
        let todos = manager(&empty).await;
        todos.add(&form("Pay rent", "", None)).await.unwrap();
        assert_eq!(empty.todo_rows()[0].assigned_to_member_name, "");
    }

    #[tokio::test]
    async fn malformed_due_date_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let todos = manager(&store).await;

        let err = todos.add(&form("Pay rent", "", Some("03/11/2026"))).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.call_count(StoreOp::InsertTodo), 0);
    }

    #[tokio::test]
    async fn insert_failure_is_reported_verbatim() {
        let store = Arc::new(MemoryStore::new());
        let todos = manager(&store).await;
        store.fail_on(StoreOp::InsertTodo);

        let err = todos.add(&form("Pay rent", "", None)).await.unwrap_err();

        assert_matches!(err, SyncError::Store(StoreError::Unavailable(_)));
        assert_eq!(todos.snapshot().error, Some(err.to_string()));
        assert!(todos.snapshot().todos.is_empty());
    }

    #[tokio::test]
    async fn toggle_completion_updates_only_after_store_confirms() {
        let store = Arc::new(MemoryStore::new());
        let todos = manager(&store).await;
        todos.add(&form("Pay rent", "", None)).await.unwrap();
        let id = todos.snapshot().todos[0].id;

        store.fail_on(StoreOp::UpdateTodo);
        assert!(todos.toggle_completion(id, false).await.is_err());
        assert!(!todos.snapshot().todos[0].is_completed);
        assert!(todos.snapshot().error.is_some());

        store.recover(StoreOp::UpdateTodo);
        todos.toggle_completion(id, false).await.unwrap();
        assert!(todos.snapshot().todos[0].is_completed);
    }

    #[tokio::test]
    async fn toggle_of_vanished_todo_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let todos = manager(&store).await;
        todos.add(&form("Pay rent", "", None)).await.unwrap();

        let err = todos.toggle_completion(99, false).await.unwrap_err();

        assert_matches!(err, SyncError::Core(CoreError::NotFound { entity: "Todo", id: 99 }));
        assert_eq!(store.call_count(StoreOp::UpdateTodo), 1);
        let state = todos.snapshot();
        assert_eq!(state.todos.len(), 1);
        assert!(!state.todos[0].is_completed);
        assert_eq!(state.error.as_deref(), Some("Entity not found: Todo with id 99"));
    }

    #[tokio::test]
    async fn load_failure_keeps_last_collection() {
        let store = Arc::new(MemoryStore::new());
        let todos = manager(&store).await;
        todos.add(&form("Pay rent", "", None)).await.unwrap();

        store.fail_on(StoreOp::ListTodos);
        todos.load().await;

        let state = todos.snapshot();
        assert_eq!(state.todos.len(), 1);
        assert!(!state.is_loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn default_assignee_is_first_member_by_name() {
        let store = Arc::new(MemoryStore::new().with_members(["Charlie", "Alice"]));
        let todos = manager(&store).await;

        assert_eq!(todos.snapshot().default_assignee(), Some("Alice"));
        assert_eq!(TodoState::default().default_assignee(), None);
    }
}
