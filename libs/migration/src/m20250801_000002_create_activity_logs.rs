use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // event/kind are plain text, not enums: historical rows written
        // by other catalogue versions must keep loading.
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(pk_uuid(ActivityLogs::Id))
                    .col(text(ActivityLogs::Event))
                    .col(text(ActivityLogs::Kind))
                    .col(uuid_null(ActivityLogs::Actor))
                    .col(json_binary(ActivityLogs::Data))
                    .col(boolean(ActivityLogs::UnDelete).default(false))
                    .col(timestamp_with_time_zone(ActivityLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_event")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Event)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_actor")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Actor)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Indirect course/group filters reach into the payload
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_activity_logs_data_course_id \
                 ON activity_logs ((data->>'course_id'))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    Event,
    Kind,
    Actor,
    Data,
    UnDelete,
    CreatedAt,
}
