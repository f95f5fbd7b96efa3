use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::*;
use serde_json::json;

use domain::error::{
    DomainErrorKind, Error as DomainError, InternalErrorKind, PayloadErrorKind, StoreErrorKind,
};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Payload(payload_error_kind) => match payload_error_kind {
                    PayloadErrorKind::MissingField(path) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Missing required field: {path}"),
                    ),
                    PayloadErrorKind::Malformed => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Malformed webhook payload".to_string(),
                    ),
                    PayloadErrorKind::InvalidTimestamp => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Invalid event timestamp".to_string(),
                    ),
                },
                InternalErrorKind::Store(StoreErrorKind::Unavailable) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Event store unavailable".to_string(),
                ),
                InternalErrorKind::Store(_) | InternalErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!("Request failed with {status}: {}", self.0);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
