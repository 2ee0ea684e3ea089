//! Shared to-do model and DTOs.

use chrono::NaiveDate;
use foyer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: DbId,
    pub task_text: String,
    /// Name of the assigned family member. Not a foreign key.
    pub assigned_to_member_name: String,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    /// Used only for newest-first ordering.
    pub created_at: Timestamp,
}

impl Todo {
    pub const TABLE: &'static str = "todos";
}

/// DTO for inserting a to-do. New to-dos always start incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    pub task_text: String,
    pub assigned_to_member_name: String,
    pub due_date: Option<NaiveDate>,
}
