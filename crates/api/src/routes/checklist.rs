use axum::routing::{get, post};
use axum::Router;

use crate::handlers::checklist;
use crate::state::AppState;

/// Routes mounted at `/checklist`.
///
/// ```text
/// GET  /         -> get_checklist
/// POST /toggle   -> toggle_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checklist::get_checklist))
        .route("/toggle", post(checklist::toggle_item))
}
