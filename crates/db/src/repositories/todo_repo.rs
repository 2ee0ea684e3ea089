//! Repository for the `todos` table.

use foyer_core::types::DbId;
use sqlx::PgPool;

use crate::models::todo::{CreateTodo, Todo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_text, assigned_to_member_name, due_date, is_completed, created_at";

/// Provides list/insert/complete operations for to-dos.
pub struct TodoRepo;

impl TodoRepo {
    /// List all to-dos, newest first.
    ///
    /// Ties on `created_at` (same transaction) fall back to id descending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Todo>(&query).fetch_all(pool).await
    }

    /// Insert a new, incomplete to-do, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (task_text, assigned_to_member_name, due_date, is_completed)
             VALUES ($1, $2, $3, FALSE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.task_text)
            .bind(&input.assigned_to_member_name)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Set the completion flag. Returns `true` if a row matched `id`.
    pub async fn set_completed(
        pool: &PgPool,
        id: DbId,
        is_completed: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE todos SET is_completed = $2 WHERE id = $1")
            .bind(id)
            .bind(is_completed)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
