use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use foyer_sync::ChecklistReconciler;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /checklist/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub section_id: String,
    pub item_id: String,
    /// Checked state the client displayed before the click.
    pub previous_checked: bool,
}

/// GET /api/v1/checklist
///
/// Seeds any template item without a row, then returns the merged view.
pub async fn get_checklist(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let checklist = ChecklistReconciler::new(state.store.clone());
    checklist.load_and_seed().await;

    Ok(Json(DataResponse {
        data: checklist.snapshot(),
    }))
}

/// POST /api/v1/checklist/toggle
///
/// Store failures are rolled back and returned as errors.
pub async fn toggle_item(
    State(state): State<AppState>,
    Json(input): Json<ToggleItemRequest>,
) -> AppResult<impl IntoResponse> {
    let checklist = ChecklistReconciler::new(state.store.clone());
    checklist.load_and_seed().await;
    checklist
        .toggle(&input.section_id, &input.item_id, input.previous_checked)
        .await?;

    Ok(Json(DataResponse {
        data: checklist.snapshot(),
    }))
}
