//! Family member (roster) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `family_members` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct FamilyMember {
    /// Display name; unique across the household.
    pub name: String,
}

impl FamilyMember {
    pub const TABLE: &'static str = "family_members";
}

/// DTO for adding a family member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFamilyMember {
    pub name: String,
}
