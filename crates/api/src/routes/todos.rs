use axum::routing::{get, post};
use axum::Router;

use crate::handlers::todos;
use crate::state::AppState;

/// Routes mounted at `/todos`.
///
/// ```text
/// GET  /              -> list_todos
/// POST /              -> add_todo
/// POST /{id}/toggle   -> toggle_todo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list_todos).post(todos::add_todo))
        .route("/{id}/toggle", post(todos::toggle_todo))
}
