use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, routes};

pub mod auth;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::tasks::router())
        .merge(routes::board::router())
        .merge(routes::classes::router())
        .layer(from_fn(auth::require_user));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use board::{Role, RosterUser, UserContext};
    use serde_json::{Value, json};
    use store::{ClassStore, MemoryStore, TaskStore};
    use test_support::{roster_of, user};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::auth;
    use crate::AppState;

    fn app_with(roster: Vec<RosterUser>) -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::spawn(
            store.clone() as Arc<dyn TaskStore>,
            store as Arc<dyn ClassStore>,
            roster,
        );
        super::router(state)
    }

    fn authed(
        builder: axum::http::request::Builder,
        user: &UserContext,
    ) -> axum::http::request::Builder {
        builder
            .header(auth::USER_ID_HEADER, user.id.to_string())
            .header(auth::USER_NAME_HEADER, user.name.clone())
            .header(auth::USER_ROLE_HEADER, user.role.to_string())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn draft_body(assignee: Uuid, title: &str) -> Body {
        Body::from(
            json!({ "title": title, "assigneeId": assignee, "description": "" }).to_string(),
        )
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app_with(Vec::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_identity_headers() {
        let app = app_with(Vec::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let coordinator = user(Role::Coordenador);
        let app = app_with(roster_of(&[&coordinator]));

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .method("POST")
                    .uri("/api/tasks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(draft_body(coordinator.id, "Prepare open day"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["data"]["status"], "todo");

        let response = app
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
        assert_eq!(listed["data"][0]["title"], "Prepare open day");
    }

    #[tokio::test]
    async fn guardians_get_403_on_create() {
        let guardian = user(Role::Responsavel);
        let app = app_with(roster_of(&[&guardian]));

        let response = app
            .oneshot(
                authed(Request::builder(), &guardian)
                    .method("POST")
                    .uri("/api/tasks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(draft_body(guardian.id, "nope"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn task_stream_answers_server_sent_events() {
        let teacher = user(Role::Professor);
        let app = app_with(roster_of(&[&teacher]));

        let response = app
            .oneshot(
                authed(Request::builder(), &teacher)
                    .uri("/api/tasks/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap(),
            "text/event-stream"
        );
    }

    #[tokio::test]
    async fn unconfirmed_batch_delete_is_a_bad_request() {
        let director = user(Role::Diretor);
        let app = app_with(roster_of(&[&director]));

        let response = app
            .oneshot(
                authed(Request::builder(), &director)
                    .method("POST")
                    .uri("/api/tasks/delete-batch")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "ids": [Uuid::new_v4()], "confirm": false }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn confirmed_batch_delete_empties_the_board() {
        let director = user(Role::Diretor);
        let app = app_with(roster_of(&[&director]));

        let mut ids = Vec::new();
        for title in ["one", "two"] {
            let response = app
                .clone()
                .oneshot(
                    authed(Request::builder(), &director)
                        .method("POST")
                        .uri("/api/tasks")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(draft_body(director.id, title))
                        .unwrap(),
                )
                .await
                .unwrap();
            let body = body_json(response).await;
            ids.push(body["data"]["id"].as_str().unwrap().to_string());
        }

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &director)
                    .method("POST")
                    .uri("/api/tasks/delete-batch")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "ids": ids, "confirm": true }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], 2);

        let response = app
            .oneshot(
                authed(Request::builder(), &director)
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn moving_a_task_lands_it_in_the_target_column() {
        let coordinator = user(Role::Coordenador);
        let app = app_with(roster_of(&[&coordinator]));

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .method("POST")
                    .uri("/api/tasks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(draft_body(coordinator.id, "movable"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .method("POST")
                    .uri(format!("/api/tasks/{id}/move"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "from": "todo", "to": "inprogress",
                            "fromIndex": 0, "toIndex": 0
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "inprogress");

        let response = app
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .uri("/api/board")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        let columns = body["data"]["board"]["columns"].as_array().unwrap();
        let in_progress = columns
            .iter()
            .find(|c| c["id"] == "inprogress")
            .unwrap();
        assert_eq!(in_progress["taskIds"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn class_crud_over_http() {
        let coordinator = user(Role::Coordenador);
        let app = app_with(roster_of(&[&coordinator]));

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .method("POST")
                    .uri("/api/classes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "name": "Turma A", "grade": "5º ano", "teacherName": "Marta"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .method("DELETE")
                    .uri(format!("/api/classes/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"], 1);

        let response = app
            .oneshot(
                authed(Request::builder(), &coordinator)
                    .uri("/api/classes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
    }
}
