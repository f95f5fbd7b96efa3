//! Persistence seam for activity records.
//!
//! `DatabaseEventStore` is what the server runs against. `InMemoryEventStore`
//! backs the tests of every layer above this one.

use crate::activity::ActivityRecord;
use crate::error::Error;
use crate::formatter::parse_timestamp;
use crate::Id;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use entity_api::{activity_record, activity_records};
use log::*;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends one record. Either the whole record is stored or nothing is.
    async fn insert(&self, record: ActivityRecord) -> Result<(), Error>;

    /// Returns at most `limit` records, most recent event time first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, Error>;
}

pub struct DatabaseEventStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseEventStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStore for DatabaseEventStore {
    async fn insert(&self, record: ActivityRecord) -> Result<(), Error> {
        let occurred_at = parse_timestamp(&record.timestamp)?;

        let model = activity_records::Model {
            id: Id::nil(),
            event_type: record.event_type,
            author: record.author,
            from_branch: record.from_branch,
            to_branch: record.to_branch,
            timestamp: record.timestamp,
            occurred_at,
            message: record.message,
            recorded_at: Utc::now().into(),
        };

        let inserted = activity_record::create(&self.db, model).await?;
        debug!("Activity record {} inserted", inserted.id);

        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, Error> {
        Ok(activity_record::find_recent(&self.db, limit)
            .await?
            .into_iter()
            .map(ActivityRecord::from)
            .collect())
    }
}

/// Process-local store. Contents are lost on drop.
#[derive(Default)]
pub struct InMemoryEventStore {
    records: Mutex<Vec<(DateTime<FixedOffset>, ActivityRecord)>>,
    inserts: AtomicUsize,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts since creation.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, record: ActivityRecord) -> Result<(), Error> {
        let occurred_at = parse_timestamp(&record.timestamp)?;

        self.records.lock().await.push((occurred_at, record));
        self.inserts.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<ActivityRecord>, Error> {
        let records = self.records.lock().await;

        // Reverse first so that equal event times list the latest insert first
        let mut ordered: Vec<_> = records.iter().rev().collect();
        ordered.sort_by(|(a, _), (b, _)| b.cmp(a));

        Ok(ordered
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(_, record)| record.clone())
            .collect())
    }
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod database_tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind, StoreErrorKind};
    use crate::EventType;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};

    fn merge_model() -> activity_records::Model {
        activity_records::Model {
            id: Id::new_v4(),
            event_type: EventType::Merge,
            author: "bob".to_owned(),
            from_branch: Some("feature/login".to_owned()),
            to_branch: "main".to_owned(),
            timestamp: "2024-03-05T10:15:00Z".to_owned(),
            occurred_at: parse_timestamp("2024-03-05T10:15:00Z").unwrap(),
            message: "bob merged branch \"feature/login\" to \"main\" on 5th March 2024 - 10:15 AM UTC"
                .to_owned(),
            recorded_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn database_insert_writes_one_row() -> Result<(), Error> {
        let model = merge_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();
        let db = Arc::new(db);
        let store = DatabaseEventStore::new(db.clone());

        store.insert(ActivityRecord::from(model)).await?;

        drop(store);
        let Ok(db) = Arc::try_unwrap(db) else {
            panic!("store still holds its connection");
        };
        assert_eq!(db.into_transaction_log().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn database_list_maps_rows_to_records() -> Result<(), Error> {
        let model = merge_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();
        let store = DatabaseEventStore::new(Arc::new(db));

        let records = store.list_recent(20).await?;

        assert_eq!(records, vec![ActivityRecord::from(model)]);
        assert_eq!(records[0].from_branch.as_deref(), Some("feature/login"));

        Ok(())
    }

    #[tokio::test]
    async fn database_failures_surface_as_store_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "relation does not exist".to_owned(),
            ))])
            .into_connection();
        let store = DatabaseEventStore::new(Arc::new(db));

        let err = store.list_recent(20).await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Store(StoreErrorKind::Other))
        );
    }
}
