use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use foyer_sync::ChecklistReconciler;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::session::run_session;

/// HTTP handler that upgrades the connection to a live checklist session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Register the connection, forward outbound frames from the manager
/// channel to the socket, and run the session on the inbound half until the
/// client leaves.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (tx, mut rx) = state.ws_manager.add(conn_id.clone()).await;
    let (mut sink, stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    let checklist = ChecklistReconciler::new(state.store.clone());
    run_session(&conn_id, &checklist, stream, tx).await;

    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
