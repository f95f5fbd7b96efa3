//! Maps a delivery's event kind and payload to zero or one activity records.
//!
//! | event kind     | action               | outcome                    |
//! |----------------|----------------------|----------------------------|
//! | `push`         |                      | `push` record              |
//! | `pull_request` | `closed` + merged    | `merge` record             |
//! | `pull_request` | `opened`/`reopened`  | `pull_request` record      |
//! | `pull_request` | anything else        | ignored, action reported   |
//! | anything else  |                      | ignored, kind reported     |
//!
//! A recognized delivery that lacks a required field is an error, never an
//! ignored event.

use crate::activity::ActivityRecord;
use crate::error::{Error, PayloadErrorKind};
use crate::formatter::format_timestamp;
use crate::payload::{self, PullRequestPayload, PushPayload};
use crate::EventType;
use serde_json::Value;
use std::fmt;

pub const PUSH_EVENT: &str = "push";
pub const PULL_REQUEST_EVENT: &str = "pull_request";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Stored(ActivityRecord),
    Ignored(IgnoreReason),
}

/// Why a delivery produced no record. Ignoring is a normal outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A pull request action other than open, reopen or merge
    PullRequestAction(String),
    /// An event kind other than push or pull_request
    Event(String),
}

impl Classification {
    /// Status text reported back to the provider, e.g. `merge stored`.
    pub fn status(&self) -> String {
        match self {
            Classification::Stored(record) => format!("{} stored", record.event_type.label()),
            Classification::Ignored(reason) => format!("ignored {reason}"),
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::PullRequestAction(action) => {
                write!(f, "{PULL_REQUEST_EVENT} action {action}")
            }
            IgnoreReason::Event(kind) => write!(f, "event {kind}"),
        }
    }
}

pub fn classify(event_kind: &str, payload: &Value) -> Result<Classification, Error> {
    match event_kind {
        PUSH_EVENT => classify_push(&payload::from_value(payload)?),
        PULL_REQUEST_EVENT => classify_pull_request(&payload::from_value(payload)?),
        other => Ok(Classification::Ignored(IgnoreReason::Event(
            other.to_string(),
        ))),
    }
}

fn classify_push(payload: &PushPayload) -> Result<Classification, Error> {
    let author = payload.pusher_name()?;
    let to_branch = branch_name(payload.git_ref()?)?;
    let timestamp = payload.head_commit_timestamp()?;

    let message = format!(
        "{author} pushed to \"{to_branch}\" on {}",
        format_timestamp(timestamp)?
    );

    Ok(Classification::Stored(ActivityRecord {
        event_type: EventType::Push,
        author: author.to_string(),
        from_branch: None,
        to_branch: to_branch.to_string(),
        timestamp: timestamp.to_string(),
        message,
    }))
}

fn classify_pull_request(payload: &PullRequestPayload) -> Result<Classification, Error> {
    let action = payload.action();
    let pr = payload.pull_request()?;
    let author = pr.author()?;
    let from_branch = pr.head_ref()?;
    let to_branch = pr.base_ref()?;

    let (event_type, timestamp, message) = match action.as_str() {
        "closed" if pr.is_merged() => {
            let merged_at = pr.merged_at()?;
            let message = format!(
                "{author} merged branch \"{from_branch}\" to \"{to_branch}\" on {}",
                format_timestamp(merged_at)?
            );
            (EventType::Merge, merged_at, message)
        }
        "opened" | "reopened" => {
            let created_at = pr.created_at()?;
            let message = format!(
                "{author} submitted a pull request from \"{from_branch}\" to \"{to_branch}\" on {}",
                format_timestamp(created_at)?
            );
            (EventType::PullRequest, created_at, message)
        }
        other => {
            return Ok(Classification::Ignored(IgnoreReason::PullRequestAction(
                other.to_string(),
            )))
        }
    };

    Ok(Classification::Stored(ActivityRecord {
        event_type,
        author: author.to_string(),
        from_branch: Some(from_branch.to_string()),
        to_branch: to_branch.to_string(),
        timestamp: timestamp.to_string(),
        message,
    }))
}

/// The last `/`-separated segment of a ref, e.g. `main` for `refs/heads/main`.
fn branch_name(git_ref: &str) -> Result<&str, Error> {
    git_ref
        .rsplit('/')
        .next()
        .filter(|branch| !branch.is_empty())
        .ok_or_else(|| {
            Error::payload(
                PayloadErrorKind::MissingField("ref".to_string()),
                format!("Ref {git_ref:?} does not name a branch"),
            )
        })
}
