use crate::classifier::{classify, Classification};
use crate::error::Error;
use crate::event_store::EventStore;
use crate::EventType;
use entity_api::activity_records;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A normalized repository activity, as stored and as returned by the events API.
///
/// Records are immutable once created. `message` is rendered once at
/// classification time and never recomputed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityRecord {
    pub event_type: EventType,
    /// Identity of the actor who triggered the event
    pub author: String,
    /// Source branch; always null for pushes
    pub from_branch: Option<String>,
    /// Destination branch
    pub to_branch: String,
    /// ISO-8601 event time as delivered: commit time for pushes, merge time
    /// for merges, creation time for pull requests
    pub timestamp: String,
    /// Precomputed human readable summary
    pub message: String,
}

impl From<activity_records::Model> for ActivityRecord {
    fn from(model: activity_records::Model) -> Self {
        Self {
            event_type: model.event_type,
            author: model.author,
            from_branch: model.from_branch,
            to_branch: model.to_branch,
            timestamp: model.timestamp,
            message: model.message,
        }
    }
}

/// Classifies a delivery that has already been authenticated and parsed, and
/// appends the resulting record to `store`.
///
/// Nothing is written when classification fails or the delivery is ignored.
pub async fn record_delivery(
    store: &dyn EventStore,
    event_kind: &str,
    payload: &Value,
) -> Result<Classification, Error> {
    let classification = classify(event_kind, payload)?;

    match &classification {
        Classification::Stored(record) => {
            store.insert(record.clone()).await?;
            info!(
                "Stored {} activity by {} on {}",
                record.event_type, record.author, record.to_branch
            );
        }
        Classification::Ignored(reason) => {
            debug!("Delivery ignored: {reason}");
        }
    }

    Ok(classification)
}
