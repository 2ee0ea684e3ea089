//! Persisted checked state of one checklist template item.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `checklist_item_states` table.
///
/// `(section_id, item_id)` is unique and refers to the compiled-in template
/// by convention only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow, Serialize, Deserialize)]
pub struct ChecklistItemState {
    pub section_id: String,
    pub item_id: String,
    pub is_checked: bool,
}

impl ChecklistItemState {
    pub const TABLE: &'static str = "checklist_item_states";

    pub fn new(section_id: impl Into<String>, item_id: impl Into<String>, is_checked: bool) -> Self {
        Self {
            section_id: section_id.into(),
            item_id: item_id.into(),
            is_checked,
        }
    }

    /// Borrowed `(section_id, item_id)` key.
    pub fn key(&self) -> (&str, &str) {
        (&self.section_id, &self.item_id)
    }
}
