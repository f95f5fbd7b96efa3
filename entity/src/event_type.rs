use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Classification outcome of a webhook delivery. This is not the raw provider
/// event name: a closed-and-merged pull request is stored as `Merge`.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_type")]
pub enum EventType {
    #[sea_orm(string_value = "push")]
    Push,
    #[sea_orm(string_value = "merge")]
    Merge,
    #[sea_orm(string_value = "pull_request")]
    PullRequest,
}

impl EventType {
    /// Human readable name used in ingestion status messages, e.g. "pull request stored".
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Push => "push",
            EventType::Merge => "merge",
            EventType::PullRequest => "pull request",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Push => write!(fmt, "push"),
            EventType::Merge => write!(fmt, "merge"),
            EventType::PullRequest => write!(fmt, "pull_request"),
        }
    }
}
