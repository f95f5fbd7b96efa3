//! SeaORM Entity for the activity_records table.
//! One row per classified webhook delivery. Rows are append-only.

use crate::event_type::EventType;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_records")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub event_type: EventType,

    /// Identity of the actor who triggered the event
    pub author: String,

    /// Source branch; always `None` for pushes
    pub from_branch: Option<String>,

    /// Destination branch
    pub to_branch: String,

    /// ISO-8601 event time exactly as delivered by the provider
    pub timestamp: String,

    /// `timestamp` as an absolute instant, used for ordering
    pub occurred_at: DateTimeWithTimeZone,

    /// Human readable summary generated at classification time
    #[sea_orm(column_type = "Text")]
    pub message: String,

    #[serde(skip_deserializing)]
    pub recorded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
