//! Client-side state for the household screens.
//!
//! - [`RemoteStore`] — the store capability every component talks to, with a
//!   PostgreSQL implementation ([`PgStore`]) and an in-memory one
//!   ([`memory::MemoryStore`]).
//! - [`ChecklistReconciler`] — optimistic edits with rollback, seeding, and
//!   live patches from the change feed.
//! - [`TodoListManager`] and [`RosterManager`] — write-then-reload managers.
//!
//! The checklist is optimistic while to-dos and the roster are not.

pub mod checklist;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod roster;
pub mod store;
pub mod todos;

pub use checklist::{ChecklistReconciler, ChecklistState};
pub use error::{StoreError, SyncError};
pub use postgres::PgStore;
pub use roster::{RosterManager, RosterState};
pub use store::RemoteStore;
pub use todos::{NewTodo, TodoListManager, TodoState};
