use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::{
        Json as ResponseJson,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, put},
};
use board::UserContext;
use classes::parse_classes;
use futures::{Stream, StreamExt};
use store::{ClassDocument, ClassEdit, NewClass};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_classes(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ClassDocument>>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(state.classes.list().await)))
}

pub async fn stream_classes(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let subscription = state.classes.subscribe(Some(&user)).map_err(ApiError::Class)?;
    let stream = subscription.map(|item| match item {
        Ok(snapshot) => Event::default().json_data(parse_classes(&snapshot)),
        Err(err) => Ok(Event::default().event("error").data(err.to_string())),
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn create_class(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(new): Json<NewClass>,
) -> Result<ResponseJson<ApiResponse<ClassDocument>>, ApiError> {
    let created = state.classes.add(&user, new).await?;
    Ok(ResponseJson(ApiResponse::success(created)))
}

pub async fn update_class(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(class_id): Path<Uuid>,
    Json(edit): Json<ClassEdit>,
) -> Result<ResponseJson<ApiResponse<ClassDocument>>, ApiError> {
    let updated = state.classes.update(&user, class_id, edit).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(class_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    let removed = state.classes.delete(&user, class_id).await?;
    Ok(ResponseJson(ApiResponse::success(removed)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(get_classes).post(create_class))
        .route("/classes/stream", get(stream_classes))
        .route("/classes/{class_id}", put(update_class).delete(delete_class))
}
