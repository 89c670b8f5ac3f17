use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::{
        Json as ResponseJson,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use board::{MoveRequest, Selection, TaskDraft, UserContext, state::parse_tasks};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use store::TaskDocument;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskDocument>>>, ApiError> {
    let tasks = parse_tasks(&state.tasks.snapshot().await);
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

/// SSE feed of the parsed task list: the current state first, then one
/// event per store change, each carrying the full collection.
pub async fn stream_tasks(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state.tasks.subscribe().map(|item| match item {
        Ok(snapshot) => Event::default().json_data(parse_tasks(&snapshot)),
        Err(err) => Ok(Event::default().event("error").data(err.to_string())),
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(draft): Json<TaskDraft>,
) -> Result<ResponseJson<ApiResponse<TaskDocument>>, ApiError> {
    let task = state.ops.create(&user, &state.roster, draft).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(task_id): Path<Uuid>,
    Json(draft): Json<TaskDraft>,
) -> Result<ResponseJson<ApiResponse<TaskDocument>>, ApiError> {
    let task = state.ops.update(&user, &state.roster, task_id, draft).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

/// Responds with the moved document, or no data when the drop was back
/// onto its own position.
pub async fn move_task(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<ResponseJson<ApiResponse<Option<TaskDocument>>>, ApiError> {
    let moved = state.ops.move_task(&user, task_id, request).await?;
    Ok(ResponseJson(ApiResponse::success(moved)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(task_id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    let removed = state.ops.delete(&user, task_id, query.confirm).await?;
    Ok(ResponseJson(ApiResponse::success(removed)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteBatchRequest {
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub confirm: bool,
}

pub async fn delete_batch(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(payload): Json<DeleteBatchRequest>,
) -> Result<ResponseJson<ApiResponse<usize>>, ApiError> {
    let mut selection = Selection::default();
    selection.select_all(&payload.ids);
    let removed = state
        .ops
        .delete_selected(&user, &mut selection, payload.confirm)
        .await?;
    Ok(ResponseJson(ApiResponse::success(removed)))
}

pub fn router() -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", put(update_task).delete(delete_task))
        .route("/move", post(move_task));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route("/stream", get(stream_tasks))
        .route("/delete-batch", post(delete_batch))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}
