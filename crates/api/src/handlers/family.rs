//! Home page data: family name, applications and roster.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use foyer_sync::{RosterManager, RosterState};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// An application linked from the home page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Application {
    pub name: &'static str,
    pub path: &'static str,
}

pub const APPLICATIONS: &[Application] = &[
    Application {
        name: "Checklist",
        path: "/checklist",
    },
    Application {
        name: "Daily to-dos",
        path: "/daily-todo",
    },
];

#[derive(Debug, Serialize)]
pub struct FamilyOverview {
    pub family_name: String,
    pub applications: &'static [Application],
    pub roster: RosterState,
}

/// GET /api/v1/family
pub async fn get_family(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roster = RosterManager::new(state.store.clone());
    roster.load().await;

    Ok(Json(DataResponse {
        data: FamilyOverview {
            family_name: state.config.family_name.clone(),
            applications: APPLICATIONS,
            roster: roster.snapshot(),
        },
    }))
}
