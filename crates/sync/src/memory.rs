//! In-memory [`RemoteStore`] for tests and local development.
//!
//! Behaves like the PostgreSQL store, including change notifications on its
//! own [`ChangeFeed`], and adds two test hooks: per-operation failure
//! injection ([`MemoryStore::fail_on`]) and call counters
//! ([`MemoryStore::call_count`]).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use foyer_core::change::ChangeKind;
use foyer_core::types::DbId;
use foyer_db::models::checklist_item_state::ChecklistItemState;
use foyer_db::models::family_member::FamilyMember;
use foyer_db::models::todo::{CreateTodo, Todo};
use foyer_events::{ChangeFeed, Subscription, TableChange};
use serde::Serialize;

use crate::error::StoreError;
use crate::store::RemoteStore;

/// Store operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Ping,
    ListMembers,
    InsertMember,
    ListTodos,
    InsertTodo,
    UpdateTodo,
    ListChecklist,
    SeedChecklist,
    UpsertChecklist,
}

#[derive(Default)]
struct Tables {
    members: Vec<FamilyMember>,
    todos: Vec<Todo>,
    next_todo_id: DbId,
    checklist: BTreeMap<(String, String), bool>,
}

/// A [`RemoteStore`] holding all rows in process memory.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<StoreOp>>,
    calls: Mutex<HashMap<StoreOp, usize>>,
    feed: Arc<ChangeFeed>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_feed(Arc::new(ChangeFeed::default()))
    }

    /// Create a store publishing its changes on `feed`.
    pub fn with_feed(feed: Arc<ChangeFeed>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_todo_id: 1,
                ..Tables::default()
            }),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
            feed,
        }
    }

    /// The feed this store publishes row changes on.
    pub fn feed(&self) -> Arc<ChangeFeed> {
        Arc::clone(&self.feed)
    }

    /// Pre-populate roster rows without counting calls or notifying.
    pub fn with_members<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.tables)
            .members
            .extend(names.into_iter().map(|name| FamilyMember { name: name.into() }));
        self
    }

    /// Pre-populate checklist rows without counting calls or notifying.
    pub fn with_checklist_rows<I>(self, rows: I) -> Self
    where
        I: IntoIterator<Item = ChecklistItemState>,
    {
        lock(&self.tables).checklist.extend(
            rows.into_iter()
                .map(|r| ((r.section_id, r.item_id), r.is_checked)),
        );
        self
    }

    /// Make every subsequent call of `op` fail until [`recover`](Self::recover).
    pub fn fail_on(&self, op: StoreOp) {
        lock(&self.failing).insert(op);
    }

    /// Let `op` succeed again.
    pub fn recover(&self, op: StoreOp) {
        lock(&self.failing).remove(&op);
    }

    /// How many times `op` has been called, including failed calls.
    pub fn call_count(&self, op: StoreOp) -> usize {
        lock(&self.calls).get(&op).copied().unwrap_or(0)
    }

    /// Current checklist rows, sorted by key.
    pub fn checklist_rows(&self) -> Vec<ChecklistItemState> {
        lock(&self.tables)
            .checklist
            .iter()
            .map(|((section_id, item_id), checked)| {
                ChecklistItemState::new(section_id.as_str(), item_id.as_str(), *checked)
            })
            .collect()
    }

    /// Current to-do rows in insertion order.
    pub fn todo_rows(&self) -> Vec<Todo> {
        lock(&self.tables).todos.clone()
    }

    /// Remove one checklist row, notifying subscribers as a delete.
    pub fn delete_checklist_row(&self, section_id: &str, item_id: &str) -> bool {
        let removed = lock(&self.tables)
            .checklist
            .remove(&(section_id.to_string(), item_id.to_string()));

        match removed {
            Some(checked) => {
                let old = ChecklistItemState::new(section_id, item_id, checked);
                self.notify(ChecklistItemState::TABLE, ChangeKind::Delete, None, Some(&old));
                true
            }
            None => false,
        }
    }

    /// Record a call and fail it if `op` is marked failing.
    fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        *lock(&self.calls).entry(op).or_insert(0) += 1;
        if lock(&self.failing).contains(&op) {
            return Err(StoreError::Unavailable(format!("{op:?} failed")));
        }
        Ok(())
    }

    fn notify<T: Serialize>(&self, table: &str, kind: ChangeKind, new: Option<&T>, old: Option<&T>) {
        match TableChange::from_rows(table, kind, new, old) {
            Ok(change) => self.feed.publish(change),
            Err(e) => tracing::warn!(table, error = %e, "Could not encode change"),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.enter(StoreOp::Ping)
    }

    async fn list_members(&self) -> Result<Vec<FamilyMember>, StoreError> {
        self.enter(StoreOp::ListMembers)?;
        let mut members = lock(&self.tables).members.clone();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn insert_member(&self, name: &str) -> Result<(), StoreError> {
        self.enter(StoreOp::InsertMember)?;
        let member = {
            let mut tables = lock(&self.tables);
            if tables.members.iter().any(|m| m.name == name) {
                return Err(StoreError::Rejected(format!(
                    "duplicate key value violates unique constraint \"uq_family_members_name\" ({name})"
                )));
            }
            let member = FamilyMember {
                name: name.to_string(),
            };
            tables.members.push(member.clone());
            member
        };
        self.notify(FamilyMember::TABLE, ChangeKind::Insert, Some(&member), None);
        Ok(())
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        self.enter(StoreOp::ListTodos)?;
        let mut todos = lock(&self.tables).todos.clone();
        todos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(todos)
    }

    async fn insert_todo(&self, todo: &CreateTodo) -> Result<(), StoreError> {
        self.enter(StoreOp::InsertTodo)?;
        let row = {
            let mut tables = lock(&self.tables);
            let row = Todo {
                id: tables.next_todo_id,
                task_text: todo.task_text.clone(),
                assigned_to_member_name: todo.assigned_to_member_name.clone(),
                due_date: todo.due_date,
                is_completed: false,
                created_at: Utc::now(),
            };
            tables.next_todo_id += 1;
            tables.todos.push(row.clone());
            row
        };
        self.notify(Todo::TABLE, ChangeKind::Insert, Some(&row), None);
        Ok(())
    }

    async fn update_todo_completion(&self, id: DbId, is_completed: bool) -> Result<bool, StoreError> {
        self.enter(StoreOp::UpdateTodo)?;
        let changed = {
            let mut tables = lock(&self.tables);
            tables.todos.iter_mut().find(|t| t.id == id).map(|todo| {
                let old = todo.clone();
                todo.is_completed = is_completed;
                (old, todo.clone())
            })
        };
        match changed {
            Some((old, new)) => {
                self.notify(Todo::TABLE, ChangeKind::Update, Some(&new), Some(&old));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_checklist_states(&self) -> Result<Vec<ChecklistItemState>, StoreError> {
        self.enter(StoreOp::ListChecklist)?;
        Ok(self.checklist_rows())
    }

    async fn seed_checklist_states(&self, rows: &[ChecklistItemState]) -> Result<(), StoreError> {
        self.enter(StoreOp::SeedChecklist)?;
        let inserted: Vec<ChecklistItemState> = {
            let mut tables = lock(&self.tables);
            rows.iter()
                .filter(|row| {
                    let key = (row.section_id.clone(), row.item_id.clone());
                    if tables.checklist.contains_key(&key) {
                        false
                    } else {
                        tables.checklist.insert(key, row.is_checked);
                        true
                    }
                })
                .cloned()
                .collect()
        };
        for row in &inserted {
            self.notify(ChecklistItemState::TABLE, ChangeKind::Insert, Some(row), None);
        }
        Ok(())
    }

    async fn upsert_checklist_state(&self, row: &ChecklistItemState) -> Result<(), StoreError> {
        self.enter(StoreOp::UpsertChecklist)?;
        let previous = lock(&self.tables)
            .checklist
            .insert((row.section_id.clone(), row.item_id.clone()), row.is_checked);

        match previous {
            Some(was_checked) => {
                let old = ChecklistItemState::new(row.section_id.as_str(), row.item_id.as_str(), was_checked);
                self.notify(ChecklistItemState::TABLE, ChangeKind::Update, Some(row), Some(&old));
            }
            None => self.notify(ChecklistItemState::TABLE, ChangeKind::Insert, Some(row), None),
        }
        Ok(())
    }

    fn subscribe_checklist(&self) -> Subscription<ChecklistItemState> {
        self.feed.subscribe(ChecklistItemState::TABLE)
    }
}
