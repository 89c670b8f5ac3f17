use std::collections::HashMap;

use axum::{
    Router,
    extract::State,
    response::{
        Json as ResponseJson,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use board::{BoardState, CardFlags};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// The reconciled board plus the derived per-card flags, computed against
/// today's local calendar at request time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub board: BoardState,
    pub flags: HashMap<Uuid, CardFlags>,
}

pub async fn get_board(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<BoardView>>, ApiError> {
    let board = BoardState::reconcile(&state.tasks.snapshot().await);
    let flags = board
        .tasks_by_id
        .values()
        .map(|task| (task.id, CardFlags::compute_now(task)))
        .collect();
    Ok(ResponseJson(ApiResponse::success(BoardView { board, flags })))
}

/// SSE feed of board phases from the shared watcher: Ready with a fully
/// rebuilt board after every store change, Failed once if the feed breaks.
pub async fn stream_board(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.board.watch()).map(|phase| Event::default().json_data(&phase));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/board", get(get_board))
        .route("/board/stream", get(stream_board))
}
