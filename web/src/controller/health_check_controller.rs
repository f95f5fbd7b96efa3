use crate::controller::StatusResponse;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// GET liveness of the API router
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = StatusResponse),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusResponse::new("ok")))
}

/// GET basic service status
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse),
    )
)]
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusResponse::new("running")))
}
