//! Webhook ingestion domain: turning authenticated deliveries into activity
//! records and reading them back.
//!
//! Consumers of this crate do not depend on `entity_api` or `webhook-auth`
//! directly; the items they need are re-exported here.
pub use entity_api::{event_type::EventType, Id};

pub mod activity;
pub mod classifier;
pub mod error;
pub mod event_store;
pub mod formatter;
pub mod payload;
pub mod signature;

pub use activity::ActivityRecord;
pub use classifier::{classify, Classification, IgnoreReason};
pub use event_store::{DatabaseEventStore, EventStore, InMemoryEventStore};
