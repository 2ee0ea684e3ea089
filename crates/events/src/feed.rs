//! In-process change feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeFeed`] fans out every [`TableChange`] to all subscribers. It is
//! designed to be shared via `Arc<ChangeFeed>` between the relay that
//! publishes and the sessions that consume.

use std::marker::PhantomData;

use foyer_core::change::{ChangeEvent, ChangeKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TableChange
// ---------------------------------------------------------------------------

/// An undecoded row change, as emitted by the `notify_foyer_change` trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableChange {
    /// Table the row belongs to, e.g. `"checklist_item_states"`.
    pub table: String,

    pub kind: ChangeKind,

    /// Row after the change (inserts and updates).
    #[serde(rename = "new", default)]
    pub new_row: Option<serde_json::Value>,

    /// Row before the change (updates and deletes).
    #[serde(rename = "old", default)]
    pub old_row: Option<serde_json::Value>,
}

impl TableChange {
    /// Build a change from typed rows.
    pub fn from_rows<T: Serialize>(
        table: impl Into<String>,
        kind: ChangeKind,
        new_row: Option<&T>,
        old_row: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            table: table.into(),
            kind,
            new_row: new_row.map(serde_json::to_value).transpose()?,
            old_row: old_row.map(serde_json::to_value).transpose()?,
        })
    }

    /// Decode the row payloads into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<ChangeEvent<T>, serde_json::Error> {
        let decode_row = |row: &Option<serde_json::Value>| -> Result<Option<T>, serde_json::Error> {
            row.as_ref()
                .map(|v| serde_json::from_value(v.clone()))
                .transpose()
        };

        Ok(ChangeEvent {
            kind: self.kind,
            new_row: decode_row(&self.new_row)?,
            old_row: decode_row(&self.old_row)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ChangeFeed
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus of table changes.
pub struct ChangeFeed {
    sender: broadcast::Sender<TableChange>,
}

impl ChangeFeed {
    /// Create a feed with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed changes are dropped and
    /// slow subscribers skip ahead with a warning.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// With no subscribers the change is dropped.
    pub fn publish(&self, change: TableChange) {
        let _ = self.sender.send(change);
    }

    /// Subscribe to decoded changes of one table.
    pub fn subscribe<T: DeserializeOwned>(&self, table: &'static str) -> Subscription<T> {
        tracing::debug!(table, "Change feed subscription opened");
        Subscription {
            table,
            receiver: self.sender.subscribe(),
            _row: PhantomData,
        }
    }

    /// Number of live subscriptions across all tables.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Why [`Subscription::recv`] returned no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecvError {
    /// The subscriber fell behind and this many changes were dropped. The
    /// next call resumes with the oldest change still buffered.
    #[error("Subscription lagged, {0} changes skipped")]
    Lagged(u64),

    /// The feed has been dropped.
    #[error("Change feed closed")]
    Closed,
}

/// A scoped, typed subscription to one table's changes.
///
/// Holding it keeps the subscription alive; dropping it (or calling
/// [`unsubscribe`](Subscription::unsubscribe)) releases it.
pub struct Subscription<T> {
    table: &'static str,
    receiver: broadcast::Receiver<TableChange>,
    _row: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    /// Wait for the next change to this subscription's table.
    ///
    /// Changes to other tables and rows that fail to decode are skipped.
    /// A lagging subscriber gets [`RecvError::Lagged`] once and should
    /// re-read whatever state it mirrors.
    pub async fn recv(&mut self) -> Result<ChangeEvent<T>, RecvError> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.table == self.table => match change.decode::<T>() {
                    Ok(event) => return Ok(event),
                    Err(e) => {
                        tracing::debug!(
                            table = self.table,
                            error = %e,
                            "Skipping undecodable change"
                        );
                    }
                },
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        table = self.table,
                        skipped = n,
                        "Change feed subscriber lagged, some changes were skipped"
                    );
                    return Err(RecvError::Lagged(n));
                }
                Err(broadcast::error::RecvError::Closed) => return Err(RecvError::Closed),
            }
        }
    }
}

impl<T> Subscription<T> {
    /// Release the subscription.
    pub fn unsubscribe(self) {
        tracing::debug!(table = self.table, "Change feed subscription released");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
