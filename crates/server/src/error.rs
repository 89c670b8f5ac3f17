use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use board::BoardError;
use classes::ClassError;
use store::StoreError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Class(#[from] ClassError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Unauthorized")]
    Unauthorized,
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        // The document store is an upstream service.
        StoreError::BatchFailed(_) | StoreError::SubscriptionLost => StatusCode::BAD_GATEWAY,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::Board(err) => match err {
                BoardError::Unauthenticated => StatusCode::UNAUTHORIZED,
                BoardError::Forbidden(_) => StatusCode::FORBIDDEN,
                BoardError::Validation(_) => StatusCode::BAD_REQUEST,
                BoardError::Store(store_err) => store_status(store_err),
            },
            ApiError::Class(err) => match err {
                ClassError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ClassError::Store(store_err) => store_status(store_err),
            },
            ApiError::Store(err) => store_status(err),
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&self.to_string());
        (status_code, Json(response)).into_response()
    }
}
