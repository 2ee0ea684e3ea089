use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foyer_core::types::DbId;
use foyer_sync::{NewTodo, TodoListManager, TodoState};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// To-do screen: the list plus the form's preselected assignee.
#[derive(Debug, Serialize)]
pub struct TodoPage {
    #[serde(flatten)]
    pub state: TodoState,
    pub default_assignee: Option<String>,
}

impl From<TodoState> for TodoPage {
    fn from(state: TodoState) -> Self {
        let default_assignee = state.default_assignee().map(str::to_string);
        Self {
            state,
            default_assignee,
        }
    }
}

/// Body of `POST /todos/{id}/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleTodoRequest {
    /// Completion as currently displayed; the stored value becomes its negation.
    pub is_completed: bool,
}

async fn loaded_manager(state: &AppState) -> TodoListManager {
    let todos = TodoListManager::new(state.store.clone());
    todos.load_members().await;
    todos.load().await;
    todos
}

/// GET /api/v1/todos
pub async fn list_todos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let todos = loaded_manager(&state).await;

    Ok(Json(DataResponse {
        data: TodoPage::from(todos.snapshot()),
    }))
}

/// POST /api/v1/todos
pub async fn add_todo(
    State(state): State<AppState>,
    Json(input): Json<NewTodo>,
) -> AppResult<impl IntoResponse> {
    let todos = TodoListManager::new(state.store.clone());
    todos.load_members().await;
    todos.add(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TodoPage::from(todos.snapshot()),
        }),
    ))
}

/// POST /api/v1/todos/{id}/toggle
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
    Json(input): Json<ToggleTodoRequest>,
) -> AppResult<impl IntoResponse> {
    let todos = TodoListManager::new(state.store.clone());
    todos.load_members().await;
    todos.toggle_completion(todo_id, input.is_completed).await?;

    tracing::info!(todo_id, is_completed = !input.is_completed, "To-do completion toggled");

    Ok(Json(DataResponse {
        data: TodoPage::from(todos.snapshot()),
    }))
}
