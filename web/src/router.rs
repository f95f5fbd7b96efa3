use crate::controller::{
    event_controller, health_check_controller, webhook_controller, StatusResponse,
};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Git Activity Feed API"
        ),
        paths(
            event_controller::index,
            health_check_controller::health_check,
            health_check_controller::root,
            webhook_controller::receive,
        ),
        components(
            schemas(
                domain::ActivityRecord,
                domain::EventType,
                StatusResponse,
            )
        ),
        tags(
            (name = "git_activity_feed", description = "Repository activity ingestion and feed API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(webhook_routes(app_state.clone()))
        .merge(event_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new()
        .route("/", get(health_check_controller::root))
        .route("/health", get(health_check_controller::health_check))
}

/// Provider payloads are capped at 25 MiB, above axum's default body limit
const MAX_WEBHOOK_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Provider deliveries are authenticated by their signature, not by a session
fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_controller::receive))
        .layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY_BYTES))
        .with_state(app_state)
}

fn event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(event_controller::index))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::{app, SECRET};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain::InMemoryEventStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();

        for path in ["/", "/health", "/webhook", "/api/events"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let request = Request::builder()
            .uri("/api/nothing")
            .body(Body::empty())
            .unwrap();

        let response = app(Arc::new(InMemoryEventStore::new()), SECRET)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn webhook_only_accepts_post() {
        let request = Request::builder()
            .uri("/webhook")
            .body(Body::empty())
            .unwrap();

        let response = app(Arc::new(InMemoryEventStore::new()), SECRET)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
