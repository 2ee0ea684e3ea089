use axum::routing::get;
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Routes mounted at `/members`.
///
/// ```text
/// GET  /   -> list_members
/// POST /   -> add_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(members::list_members).post(members::add_member))
}
