//! One live checklist session.
//!
//! A session owns a [`ChecklistReconciler`] for the lifetime of its
//! connection. It subscribes to the change feed, loads and seeds, then
//! multiplexes four sources in one loop: client frames, feed events, state
//! changes to push, and toggles still waiting on the store. A session that
//! falls behind the feed reloads the whole checklist.

use axum::extract::ws::Message;
use foyer_events::RecvError;
use foyer_sync::{ChecklistReconciler, ChecklistState, SyncError};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::ws::manager::WsSender;

/// Command sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Toggle {
        section_id: String,
        item_id: String,
        previous_checked: bool,
    },
    /// Fetch and seed again.
    Reload,
    /// Hide the current error message.
    DismissError,
}

/// Frame pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    Checklist(&'a ChecklistState),
    Error { message: String },
}

/// A finished toggle: the item it targeted and the store outcome.
type ToggleOutcome = (String, String, Result<(), SyncError>);

/// Run the session until the client disconnects or the outbound channel
/// closes. The feed subscription is released on return.
pub async fn run_session<S>(
    conn_id: &str,
    checklist: &ChecklistReconciler,
    mut inbound: S,
    outbound: WsSender,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut subscription = checklist.subscribe();
    let mut updates = checklist.watch();

    checklist.load_and_seed().await;
    let initial = updates.borrow_and_update().clone();
    if !push(&outbound, &ServerMessage::Checklist(&initial)) {
        return;
    }

    let mut toggles: FuturesUnordered<BoxFuture<'_, ToggleOutcome>> = FuturesUnordered::new();
    let mut feed_open = true;

    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(ClientMessage::Toggle { section_id, item_id, previous_checked }) => {
                            toggles.push(Box::pin(async move {
                                let result = checklist
                                    .toggle(&section_id, &item_id, previous_checked)
                                    .await;
                                (section_id, item_id, result)
                            }));
                        }
                        Ok(ClientMessage::Reload) => checklist.load_and_seed().await,
                        Ok(ClientMessage::DismissError) => checklist.clear_error(),
                        Err(e) => {
                            tracing::debug!(conn_id, error = %e, "Unreadable client message");
                            let message = format!("Invalid message: {e}");
                            if !push(&outbound, &ServerMessage::Error { message }) {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id, "Pong received");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
            received = subscription.recv(), if feed_open => match received {
                Ok(event) => {
                    checklist.apply_remote_event(&event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::info!(conn_id, skipped, "Session fell behind the change feed, reloading");
                    checklist.load_and_seed().await;
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(conn_id, "Change feed closed");
                    feed_open = false;
                }
            },
            Ok(()) = updates.changed() => {
                let state = updates.borrow_and_update().clone();
                if !push(&outbound, &ServerMessage::Checklist(&state)) {
                    break;
                }
            }
            Some((section_id, item_id, result)) = toggles.next(), if !toggles.is_empty() => {
                match result {
                    Ok(()) => tracing::debug!(conn_id, section_id = %section_id, item_id = %item_id, "Checklist item toggled"),
                    // Store failures were rolled back and reach the client
                    // through the state's error.
                    Err(e) if e.is_validation() => {
                        let message = e.to_string();
                        if !push(&outbound, &ServerMessage::Error { message }) {
                            break;
                        }
                    }
                    Err(e) => tracing::debug!(
                        conn_id,
                        section_id = %section_id,
                        item_id = %item_id,
                        error = %e,
                        "Toggle rolled back"
                    ),
                }
            }
        }
    }

    subscription.unsubscribe();
}

/// Serialize and queue one frame. Returns `false` once the connection is gone.
fn push(outbound: &WsSender, message: &ServerMessage<'_>) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => outbound.send(Message::Text(json.into())).is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode WebSocket frame");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use foyer_core::template::CHECKLIST_TEMPLATE;
    use foyer_db::models::checklist_item_state::ChecklistItemState;
    use foyer_events::ChangeFeed;
    use foyer_sync::memory::{MemoryStore, StoreOp};
    use foyer_sync::RemoteStore;
    use futures::channel::mpsc as client;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    use super::*;

    type ClientSender = client::UnboundedSender<Result<Message, axum::Error>>;

    fn text(value: Value) -> Result<Message, axum::Error> {
        Ok(Message::Text(value.to_string().into()))
    }

    async fn next_frame(rx: &mut mpsc::UnboundedReceiver<Message>) -> Value {
        match rx.recv().await {
            Some(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    fn checked(frame: &Value, section_id: &str, item_id: &str) -> Option<bool> {
        frame["data"]["sections"]
            .as_array()?
            .iter()
            .find(|s| s["id"] == section_id)?["items"]
            .as_array()?
            .iter()
            .find(|i| i["id"] == item_id)?["checked"]
            .as_bool()
    }

    /// Read frames until one shows `section_id/item_id` as `expected`.
    async fn wait_for(
        rx: &mut mpsc::UnboundedReceiver<Message>,
        section_id: &str,
        item_id: &str,
        expected: bool,
    ) -> Value {
        loop {
            let frame = next_frame(rx).await;
            if frame["type"] == "checklist" && checked(&frame, section_id, item_id) == Some(expected) {
                return frame;
            }
        }
    }

    type ClientReceiver = client::UnboundedReceiver<Result<Message, axum::Error>>;

    fn session_parts() -> (ClientSender, ClientReceiver, WsSender, mpsc::UnboundedReceiver<Message>) {
        let (client_tx, client_rx) = client::unbounded();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        (client_tx, client_rx, out_tx, out_rx)
    }

    #[test]
    fn client_toggle_message_parses() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "toggle",
            "section_id": "abonnements",
            "item_id": "eau",
            "previous_checked": false,
        }))
        .unwrap();

        assert_eq!(
            msg,
            ClientMessage::Toggle {
                section_id: "abonnements".into(),
                item_id: "eau".into(),
                previous_checked: false,
            }
        );
    }

    #[tokio::test]
    async fn initial_state_is_seeded_and_pushed() {
        let store = Arc::new(MemoryStore::new());
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let driver = async move {
            let frame = next_frame(&mut out_rx).await;
            drop(client_tx);
            frame
        };
        let ((), frame) = tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert_eq!(frame["type"], "checklist");
        assert_eq!(frame["data"]["is_loading"], false);
        assert_eq!(checked(&frame, "abonnements", "eau"), Some(false));
        assert_eq!(store.call_count(StoreOp::SeedChecklist), 1);
    }

    #[tokio::test]
    async fn client_toggle_is_persisted_and_pushed() {
        let store = Arc::new(MemoryStore::new());
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let driver = async move {
            next_frame(&mut out_rx).await;
            client_tx
                .unbounded_send(text(json!({
                    "type": "toggle",
                    "section_id": "abonnements",
                    "item_id": "eau",
                    "previous_checked": false,
                })))
                .unwrap();
            wait_for(&mut out_rx, "abonnements", "eau", true).await;
            drop(client_tx);
        };
        tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert!(store
            .checklist_rows()
            .contains(&ChecklistItemState::new("abonnements", "eau", true)));
    }

    #[tokio::test]
    async fn failed_toggle_is_pushed_then_rolled_back() {
        let store = Arc::new(MemoryStore::new());
        store.fail_on(StoreOp::UpsertChecklist);
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let driver = async move {
            next_frame(&mut out_rx).await;
            client_tx
                .unbounded_send(text(json!({
                    "type": "toggle",
                    "section_id": "abonnements",
                    "item_id": "eau",
                    "previous_checked": false,
                })))
                .unwrap();
            let rolled_back = loop {
                let frame = wait_for(&mut out_rx, "abonnements", "eau", false).await;
                if !frame["data"]["error"].is_null() {
                    break frame;
                }
            };
            drop(client_tx);
            rolled_back
        };
        let ((), frame) = tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert!(frame["data"]["error"].is_string());
    }

    #[tokio::test]
    async fn change_from_another_client_is_pushed() {
        let store = Arc::new(MemoryStore::new());
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let other = store.clone();
        let driver = async move {
            next_frame(&mut out_rx).await;
            other
                .upsert_checklist_state(&ChecklistItemState::new("abonnements", "internet", true))
                .await
                .unwrap();
            wait_for(&mut out_rx, "abonnements", "internet", true).await;
            drop(client_tx);
        };
        tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);
    }

    #[tokio::test]
    async fn malformed_and_unknown_commands_report_errors() {
        let store = Arc::new(MemoryStore::new());
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let driver = async move {
            next_frame(&mut out_rx).await;
            client_tx.unbounded_send(text(json!({ "type": "dance" }))).unwrap();
            let invalid = next_frame(&mut out_rx).await;

            client_tx
                .unbounded_send(text(json!({
                    "type": "toggle",
                    "section_id": "abonnements",
                    "item_id": "gaz",
                    "previous_checked": false,
                })))
                .unwrap();
            let unknown = next_frame(&mut out_rx).await;
            drop(client_tx);
            (invalid, unknown)
        };
        let ((), (invalid, unknown)) =
            tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert_eq!(invalid["type"], "error");
        assert_eq!(unknown["type"], "error");
        assert_eq!(store.call_count(StoreOp::UpsertChecklist), 0);
    }

    #[tokio::test]
    async fn session_that_falls_behind_the_feed_reloads() {
        let rows = CHECKLIST_TEMPLATE.iter().flat_map(|section| {
            section
                .items
                .iter()
                .map(move |item| ChecklistItemState::new(section.id, item.id, false))
        });
        let store = Arc::new(
            MemoryStore::with_feed(Arc::new(ChangeFeed::new(1))).with_checklist_rows(rows),
        );
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let other = store.clone();
        let driver = async move {
            next_frame(&mut out_rx).await;
            // Three changes land before the session reads any of them.
            for item_id in ["eau", "energie", "internet"] {
                other
                    .upsert_checklist_state(&ChecklistItemState::new("abonnements", item_id, true))
                    .await
                    .unwrap();
            }
            tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    let frame = wait_for(&mut out_rx, "abonnements", "eau", true).await;
                    if checked(&frame, "abonnements", "energie") == Some(true)
                        && checked(&frame, "abonnements", "internet") == Some(true)
                    {
                        break;
                    }
                }
            })
            .await
            .expect("session should catch up after lagging");
            drop(client_tx);
        };
        tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert_eq!(store.call_count(StoreOp::SeedChecklist), 0);
        assert_eq!(store.call_count(StoreOp::ListChecklist), 2);
    }

    #[tokio::test]
    async fn dismiss_error_clears_the_message() {
        let store = Arc::new(MemoryStore::new());
        store.fail_on(StoreOp::UpsertChecklist);
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, mut out_rx) = session_parts();

        let driver = async move {
            next_frame(&mut out_rx).await;
            client_tx
                .unbounded_send(text(json!({
                    "type": "toggle",
                    "section_id": "abonnements",
                    "item_id": "eau",
                    "previous_checked": false,
                })))
                .unwrap();
            loop {
                let frame = next_frame(&mut out_rx).await;
                if frame["type"] == "checklist" && frame["data"]["error"].is_string() {
                    break;
                }
            }

            client_tx
                .unbounded_send(text(json!({ "type": "dismiss_error" })))
                .unwrap();
            let cleared = loop {
                let frame = next_frame(&mut out_rx).await;
                if frame["type"] == "checklist" && frame["data"]["error"].is_null() {
                    break frame;
                }
            };
            drop(client_tx);
            cleared
        };
        let ((), frame) = tokio::join!(run_session("test", &checklist, client_rx, out_tx), driver);

        assert_eq!(checked(&frame, "abonnements", "eau"), Some(false));
    }

    #[tokio::test]
    async fn subscription_is_released_on_disconnect() {
        let store = Arc::new(MemoryStore::new());
        let feed = store.feed();
        let checklist = ChecklistReconciler::new(store.clone());
        let (client_tx, client_rx, out_tx, _out_rx) = session_parts();
        client_tx.unbounded_send(Ok(Message::Close(None))).unwrap();

        run_session("test", &checklist, client_rx, out_tx).await;

        assert_eq!(feed.subscriber_count(), 0);
    }
}
