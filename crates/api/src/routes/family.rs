use axum::routing::get;
use axum::Router;

use crate::handlers::family;
use crate::state::AppState;

/// Routes mounted at `/family`.
///
/// ```text
/// GET /    -> get_family
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(family::get_family))
}
