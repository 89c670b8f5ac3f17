use std::str::FromStr;

use axum::{
    Json,
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use board::{Role, UserContext};
use utils::response::ApiResponse;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The caller's identity, asserted by the fronting auth proxy via headers.
/// Missing or malformed identity ends the request here; no handler and no
/// store call ever runs for it.
pub fn extract_user(headers: &HeaderMap) -> Option<UserContext> {
    let id = Uuid::parse_str(header_str(headers, USER_ID_HEADER)?).ok()?;
    let name = header_str(headers, USER_NAME_HEADER)?.to_string();
    let role = Role::from_str(header_str(headers, USER_ROLE_HEADER)?).ok()?;
    Some(UserContext { id, name, role })
}

pub async fn require_user(mut req: Request, next: Next) -> Response {
    let Some(user) = extract_user(req.headers()) else {
        let response = ApiResponse::<()>::error("Unauthorized");
        return (axum::http::StatusCode::UNAUTHORIZED, Json(response)).into_response();
    };
    req.extensions_mut().insert(user);
    next.run(req).await
}
