use foyer_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// A failed call to the remote store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store refused the write, e.g. a uniqueness constraint.
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached or failed to answer.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Rejected(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Error reported by a component operation.
///
/// Validation failures never reached the store; store failures have already
/// been recovered locally (rolled back or left at the last good state).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        SyncError::Core(CoreError::Validation(msg.into()))
    }

    /// `true` for client-side validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Core(CoreError::Validation(_)))
    }
}
