//! Row-level change notifications delivered by the change feed.

use serde::{Deserialize, Serialize};

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A decoded change to one row of a table.
///
/// Inserts and updates carry `new_row`; deletes carry `old_row`. Updates may
/// carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    pub kind: ChangeKind,
    pub new_row: Option<T>,
    pub old_row: Option<T>,
}

impl<T> ChangeEvent<T> {
    pub fn inserted(row: T) -> Self {
        Self {
            kind: ChangeKind::Insert,
            new_row: Some(row),
            old_row: None,
        }
    }

    pub fn updated(old: Option<T>, new: T) -> Self {
        Self {
            kind: ChangeKind::Update,
            new_row: Some(new),
            old_row: old,
        }
    }

    pub fn deleted(row: T) -> Self {
        Self {
            kind: ChangeKind::Delete,
            new_row: None,
            old_row: Some(row),
        }
    }
}
