//! Append and query operations for the activity_records table.
//! Records are immutable: there is no update or delete.

use super::error::{EntityApiErrorKind, Error};
use entity::activity_records::{ActiveModel, Column, Entity, Model};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, QuerySelect,
    TryIntoModel,
};

/// Appends a new activity record. The `id` and `recorded_at` fields of the
/// given model are ignored and assigned at insert time.
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!(
        "New activity record to be inserted: {} by {} at {}",
        model.event_type, model.author, model.timestamp
    );

    if model.author.is_empty() || model.to_branch.is_empty() || model.message.is_empty() {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::ValidationError,
        });
    }

    let active_model = ActiveModel {
        event_type: Set(model.event_type),
        author: Set(model.author),
        from_branch: Set(model.from_branch),
        to_branch: Set(model.to_branch),
        timestamp: Set(model.timestamp),
        occurred_at: Set(model.occurred_at),
        message: Set(model.message),
        recorded_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?.try_into_model()?)
}

/// Returns at most `limit` records ordered by event time, newest first.
/// Callers are responsible for bounding `limit`.
pub async fn find_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, Error> {
    debug!("Finding the {limit} most recent activity records");

    Ok(Entity::find()
        .order_by_desc(Column::OccurredAt)
        .limit(limit)
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use entity::{event_type::EventType, Id};
    use sea_orm::sea_query::{Value, Values};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn push_model(timestamp: &str) -> Model {
        let occurred_at = DateTime::<FixedOffset>::parse_from_rfc3339(timestamp).unwrap();
        Model {
            id: Id::new_v4(),
            event_type: EventType::Push,
            author: "alice".to_owned(),
            from_branch: None,
            to_branch: "main".to_owned(),
            timestamp: timestamp.to_owned(),
            occurred_at,
            message: "alice pushed to \"main\"".to_owned(),
            recorded_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_inserted_record() -> Result<(), Error> {
        let record = push_model("2024-03-03T17:30:00+00:00");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[record.clone()]])
            .into_connection();

        let inserted = create(&db, record.clone()).await?;

        assert_eq!(inserted.id, record.id);
        assert_eq!(inserted.event_type, EventType::Push);
        assert_eq!(inserted.from_branch, None);

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_a_record_without_an_author() {
        let mut record = push_model("2024-03-03T17:30:00+00:00");
        record.author = String::new();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = create(&db, record).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::ValidationError
        );
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn find_recent_orders_by_event_time_and_limits() -> Result<(), Error> {
        let newer = push_model("2024-03-04T09:00:00+00:00");
        let older = push_model("2024-03-03T17:30:00+00:00");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[newer.clone(), older.clone()]])
            .into_connection();

        let records = find_recent(&db, 2).await?;

        assert_eq!(records, vec![newer, older]);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);

        let statement = &log[0].statements()[0];
        assert!(
            statement
                .sql
                .contains(r#"ORDER BY "activity_records"."occurred_at" DESC"#),
            "{}",
            statement.sql
        );
        assert!(statement.sql.contains("LIMIT $1"), "{}", statement.sql);
        assert_eq!(
            statement.values,
            Some(Values(vec![Value::BigUnsigned(Some(2))]))
        );

        Ok(())
    }
}
