use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod event_controller;
pub(crate) mod health_check_controller;
pub(crate) mod webhook_controller;

/// Body of every non-error response that only reports a status.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct StatusResponse {
    pub(crate) status: String,
}

impl StatusResponse {
    pub(crate) fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
