//! Repository for the `family_members` table.

use sqlx::PgPool;

use crate::models::family_member::FamilyMember;

/// Roster queries. Members are never updated or deleted.
pub struct FamilyMemberRepo;

impl FamilyMemberRepo {
    /// List all members ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<FamilyMember>, sqlx::Error> {
        sqlx::query_as::<_, FamilyMember>("SELECT name FROM family_members ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }

    /// Insert a member. Fails with a `uq_family_members_name` violation if the
    /// name is taken.
    pub async fn create(pool: &PgPool, name: &str) -> Result<FamilyMember, sqlx::Error> {
        sqlx::query_as::<_, FamilyMember>(
            "INSERT INTO family_members (name) VALUES ($1) RETURNING name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
