//! Foyer change feed.
//!
//! - [`ChangeFeed`] — in-process publish/subscribe hub for row-level table
//!   changes, backed by `tokio::sync::broadcast`.
//! - [`Subscription`] — a typed, table-scoped receiver. Dropping it
//!   unsubscribes. A lagging receiver is told so it can reload.
//! - [`PgChangeRelay`] — background task forwarding PostgreSQL
//!   `LISTEN/NOTIFY` payloads onto the feed.

pub mod feed;
pub mod relay;

pub use feed::{ChangeFeed, RecvError, Subscription, TableChange};
pub use relay::PgChangeRelay;
