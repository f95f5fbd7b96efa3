//! The subset of the provider's webhook payloads read during classification.
//!
//! Every field is optional so that an absent field is detected explicitly and
//! reported with its dotted path instead of failing deserialization as a whole.

use crate::error::{Error, PayloadErrorKind};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct PushPayload {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub pusher: Option<Pusher>,
    pub head_commit: Option<HeadCommit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pusher {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeadCommit {
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequestPayload {
    /// Kept untyped: an action of any JSON type is ignored rather than rejected.
    pub action: Option<Value>,
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequest {
    pub user: Option<PullRequestUser>,
    pub head: Option<BranchRef>,
    pub base: Option<BranchRef>,
    pub merged: Option<Value>,
    pub merged_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequestUser {
    pub login: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

/// Reads a payload tree out of a parsed JSON document. Fields of the wrong JSON
/// type (e.g. a numeric `ref`) are reported as malformed.
pub fn from_value<T: DeserializeOwned>(payload: &Value) -> Result<T, Error> {
    T::deserialize(payload).map_err(|e| {
        Error::payload(
            PayloadErrorKind::Malformed,
            format!("Malformed webhook payload: {e}"),
        )
    })
}

/// Unwraps a required, non-empty string field or reports `path` as missing.
pub fn required<'a>(value: Option<&'a String>, path: &str) -> Result<&'a str, Error> {
    value
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::missing_field(path))
}

impl PushPayload {
    pub fn pusher_name(&self) -> Result<&str, Error> {
        required(
            self.pusher.as_ref().and_then(|p| p.name.as_ref()),
            "pusher.name",
        )
    }

    pub fn git_ref(&self) -> Result<&str, Error> {
        required(self.git_ref.as_ref(), "ref")
    }

    pub fn head_commit_timestamp(&self) -> Result<&str, Error> {
        required(
            self.head_commit.as_ref().and_then(|c| c.timestamp.as_ref()),
            "head_commit.timestamp",
        )
    }
}

impl PullRequestPayload {
    /// The action name as reported back to the sender. An absent or null
    /// action reads as `None`; non-string actions are rendered as text.
    pub fn action(&self) -> String {
        match &self.action {
            None | Some(Value::Null) => "None".to_string(),
            Some(Value::String(action)) => action.clone(),
            Some(Value::Bool(true)) => "True".to_string(),
            Some(Value::Bool(false)) => "False".to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn pull_request(&self) -> Result<&PullRequest, Error> {
        self.pull_request
            .as_ref()
            .ok_or_else(|| Error::missing_field("pull_request"))
    }
}

impl PullRequest {
    pub fn author(&self) -> Result<&str, Error> {
        required(
            self.user.as_ref().and_then(|u| u.login.as_ref()),
            "pull_request.user.login",
        )
    }

    pub fn head_ref(&self) -> Result<&str, Error> {
        required(
            self.head.as_ref().and_then(|h| h.git_ref.as_ref()),
            "pull_request.head.ref",
        )
    }

    pub fn base_ref(&self) -> Result<&str, Error> {
        required(
            self.base.as_ref().and_then(|b| b.git_ref.as_ref()),
            "pull_request.base.ref",
        )
    }

    /// Only a literal JSON `true` counts; any other value means not merged.
    pub fn is_merged(&self) -> bool {
        matches!(self.merged, Some(Value::Bool(true)))
    }

    pub fn merged_at(&self) -> Result<&str, Error> {
        required(self.merged_at.as_ref(), "pull_request.merged_at")
    }

    pub fn created_at(&self) -> Result<&str, Error> {
        required(self.created_at.as_ref(), "pull_request.created_at")
    }
}
