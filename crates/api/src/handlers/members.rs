use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foyer_db::models::family_member::CreateFamilyMember;
use foyer_sync::RosterManager;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/members
///
/// Roster, name ascending. A store failure is reported in `error` next to
/// whatever could be loaded.
pub async fn list_members(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roster = RosterManager::new(state.store.clone());
    roster.load().await;

    Ok(Json(DataResponse {
        data: roster.snapshot(),
    }))
}

/// POST /api/v1/members
///
/// Add a member; responds with the reloaded roster.
pub async fn add_member(
    State(state): State<AppState>,
    Json(input): Json<CreateFamilyMember>,
) -> AppResult<impl IntoResponse> {
    let roster = RosterManager::new(state.store.clone());
    roster.load().await;
    roster.add(&input.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: roster.snapshot(),
        }),
    ))
}
