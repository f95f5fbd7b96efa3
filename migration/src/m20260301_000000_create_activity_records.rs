use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Objects are created unqualified so they land in the schema selected by the
// connection's search_path.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DO $$ BEGIN
                    CREATE TYPE event_type AS ENUM ('push', 'merge', 'pull_request');
                EXCEPTION
                    WHEN duplicate_object THEN NULL;
                END $$;",
            )
            .await?;

        let create_activity_records_sql = r#"
            CREATE TABLE IF NOT EXISTS activity_records (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                event_type event_type NOT NULL,
                author VARCHAR(255) NOT NULL CHECK (author <> ''),
                from_branch VARCHAR(255),
                to_branch VARCHAR(255) NOT NULL CHECK (to_branch <> ''),
                "timestamp" VARCHAR(64) NOT NULL,
                occurred_at TIMESTAMPTZ NOT NULL,
                message TEXT NOT NULL CHECK (message <> ''),
                recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT activity_records_push_has_no_source_branch
                    CHECK ((event_type = 'push') = (from_branch IS NULL))
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_activity_records_sql)
            .await?;

        // Serves "most recent N" reads
        manager
            .create_index(
                Index::create()
                    .name("activity_records_occurred_at_desc")
                    .table(Alias::new("activity_records"))
                    .col((Alias::new("occurred_at"), IndexOrder::Desc))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("activity_records_occurred_at_desc")
                    .table(Alias::new("activity_records"))
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS activity_records")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS event_type")
            .await?;

        Ok(())
    }
}
