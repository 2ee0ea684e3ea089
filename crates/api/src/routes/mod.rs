pub mod checklist;
pub mod family;
pub mod health;
pub mod members;
pub mod todos;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                          live checklist session (WebSocket)
///
/// /family                      family name and application list
/// /members                     list, add
/// /todos                       list, add
/// /todos/{id}/toggle           flip completion
/// /checklist                   load and seed
/// /checklist/toggle            optimistic item toggle
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/family", family::router())
        .nest("/members", members::router())
        .nest("/todos", todos::router())
        .nest("/checklist", checklist::router())
}
