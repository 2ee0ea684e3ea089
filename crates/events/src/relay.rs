//! PostgreSQL `LISTEN/NOTIFY` relay.
//!
//! [`PgChangeRelay`] listens on the channel the `notify_foyer_change` trigger
//! publishes to and forwards every decoded payload onto the
//! [`ChangeFeed`](crate::feed::ChangeFeed). It runs as a long-lived
//! background task and stops when its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use foyer_db::{DbPool, CHANGE_CHANNEL};
use sqlx::postgres::PgListener;
use tokio_util::sync::CancellationToken;

use crate::feed::{ChangeFeed, TableChange};

/// Pause before retrying after the listener connection fails.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Background service relaying database notifications to the change feed.
pub struct PgChangeRelay;

impl PgChangeRelay {
    /// Run the relay loop until `cancel` fires.
    ///
    /// Fails only if the initial `LISTEN` cannot be established. Once
    /// running, connection errors are logged and retried; notifications
    /// raised while disconnected are lost and clients catch up on their
    /// next full load.
    pub async fn run(
        pool: DbPool,
        feed: Arc<ChangeFeed>,
        cancel: CancellationToken,
    ) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tracing::info!(channel = CHANGE_CHANNEL, "Change relay listening");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Change relay cancelled, shutting down");
                    break;
                }
                received = listener.recv() => match received {
                    Ok(notification) => Self::forward(&feed, notification.payload()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Change relay lost its connection, retrying");
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                },
            }
        }

        Ok(())
    }

    /// Decode one notification payload and publish it.
    fn forward(feed: &ChangeFeed, payload: &str) {
        match serde_json::from_str::<TableChange>(payload) {
            Ok(change) => {
                tracing::trace!(table = %change.table, kind = ?change.kind, "Relaying change");
                feed.publish(change);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed change notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use foyer_core::change::ChangeKind;

    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Row {
        item_id: String,
    }

    #[tokio::test]
    async fn forward_publishes_decoded_payload() {
        let feed = ChangeFeed::default();
        let mut sub = feed.subscribe::<Row>("checklist_item_states");

        PgChangeRelay::forward(
            &feed,
            r#"{"table":"checklist_item_states","kind":"INSERT","new":{"item_id":"eau"},"old":null}"#,
        );

        let event = sub.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(event.new_row.unwrap().item_id, "eau");
    }

    #[test]
    fn forward_drops_malformed_payload() {
        let feed = ChangeFeed::default();
        let _sub = feed.subscribe::<Row>("checklist_item_states");

        // Must not panic.
        PgChangeRelay::forward(&feed, "not json");
    }
}
