//! Repository for the `checklist_item_states` table.

use sqlx::PgPool;

use crate::models::checklist_item_state::ChecklistItemState;

/// Checked-state persistence keyed on `(section_id, item_id)`.
pub struct ChecklistItemStateRepo;

impl ChecklistItemStateRepo {
    /// Fetch every stored item state.
    pub async fn list(pool: &PgPool) -> Result<Vec<ChecklistItemState>, sqlx::Error> {
        sqlx::query_as::<_, ChecklistItemState>(
            "SELECT section_id, item_id, is_checked FROM checklist_item_states",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert a batch of rows in one statement, skipping keys that already
    /// exist. Returns the number of rows actually inserted.
    ///
    /// Existing rows keep their checked state, so two clients seeding at the
    /// same time cannot reset each other's checks.
    pub async fn insert_missing(
        pool: &PgPool,
        rows: &[ChecklistItemState],
    ) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let section_ids: Vec<&str> = rows.iter().map(|r| r.section_id.as_str()).collect();
        let item_ids: Vec<&str> = rows.iter().map(|r| r.item_id.as_str()).collect();
        let checked: Vec<bool> = rows.iter().map(|r| r.is_checked).collect();

        let result = sqlx::query(
            "INSERT INTO checklist_item_states (section_id, item_id, is_checked)
             SELECT * FROM UNNEST($1::text[], $2::text[], $3::bool[])
             ON CONFLICT (section_id, item_id) DO NOTHING",
        )
        .bind(&section_ids)
        .bind(&item_ids)
        .bind(&checked)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert or overwrite the checked state of one item.
    pub async fn upsert(pool: &PgPool, row: &ChecklistItemState) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO checklist_item_states (section_id, item_id, is_checked)
             VALUES ($1, $2, $3)
             ON CONFLICT (section_id, item_id)
             DO UPDATE SET is_checked = EXCLUDED.is_checked, updated_at = NOW()",
        )
        .bind(&row.section_id)
        .bind(&row.item_id)
        .bind(row.is_checked)
        .execute(pool)
        .await?;
        Ok(())
    }
}
