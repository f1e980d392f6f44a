use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250801_000000_create_lifecycle_enums::{
    EntityStatusEnum, ParentKindEnum, UnitKindEnum,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn status_col<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .custom(EntityStatusEnum::Enum)
        .not_null()
        .to_owned()
}

fn parent_kind_col<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .custom(ParentKindEnum::Enum)
        .null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(text_uniq(Users::Username))
                    .col(text(Users::Email))
                    .col(text(Users::FirstName))
                    .col(text(Users::LastName))
                    .col(status_col(Users::Status))
                    .col(parent_kind_col(Users::DeletedParentKind))
                    .col(uuid_null(Users::DeletedParentId))
                    .col(text_null(Users::BackupEmail))
                    .col(text_null(Users::BackupUsername))
                    .col(timestamp_with_time_zone_null(Users::LastLoginAt))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_uuid(Courses::Id))
                    .col(text(Courses::Name))
                    .col(text_uniq(Courses::Code))
                    .col(text(Courses::Description))
                    .col(boolean(Courses::Intake).default(false))
                    .col(status_col(Courses::Status))
                    .col(parent_kind_col(Courses::DeletedParentKind))
                    .col(uuid_null(Courses::DeletedParentId))
                    .col(timestamp_with_time_zone(Courses::CreatedAt))
                    .col(timestamp_with_time_zone(Courses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(pk_uuid(Units::Id))
                    .col(uuid(Units::CourseId))
                    .col(text(Units::Name))
                    .col(
                        ColumnDef::new(Units::Kind)
                            .custom(UnitKindEnum::Enum)
                            .not_null()
                            .to_owned(),
                    )
                    .col(status_col(Units::Status))
                    .col(parent_kind_col(Units::DeletedParentKind))
                    .col(uuid_null(Units::DeletedParentId))
                    .col(timestamp_with_time_zone(Units::CreatedAt))
                    .col(timestamp_with_time_zone(Units::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_course_id")
                    .table(Units::Table)
                    .col(Units::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseGroups::Table)
                    .if_not_exists()
                    .col(pk_uuid(CourseGroups::Id))
                    .col(uuid(CourseGroups::CourseId))
                    .col(text(CourseGroups::Name))
                    .col(status_col(CourseGroups::Status))
                    .col(parent_kind_col(CourseGroups::DeletedParentKind))
                    .col(uuid_null(CourseGroups::DeletedParentId))
                    .col(timestamp_with_time_zone(CourseGroups::CreatedAt))
                    .col(timestamp_with_time_zone(CourseGroups::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCourseGroups::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserCourseGroups::Id))
                    .col(uuid(UserCourseGroups::GroupId))
                    .col(uuid(UserCourseGroups::UserId))
                    .col(status_col(UserCourseGroups::Status))
                    .col(parent_kind_col(UserCourseGroups::DeletedParentKind))
                    .col(uuid_null(UserCourseGroups::DeletedParentId))
                    .col(timestamp_with_time_zone(UserCourseGroups::CreatedAt))
                    .col(timestamp_with_time_zone(UserCourseGroups::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_course_groups_group_id")
                    .table(UserCourseGroups::Table)
                    .col(UserCourseGroups::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Discussions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Discussions::Id))
                    .col(uuid(Discussions::CourseId))
                    .col(uuid(Discussions::AuthorId))
                    .col(text(Discussions::Title))
                    .col(text(Discussions::Body))
                    .col(status_col(Discussions::Status))
                    .col(parent_kind_col(Discussions::DeletedParentKind))
                    .col(uuid_null(Discussions::DeletedParentId))
                    .col(timestamp_with_time_zone(Discussions::CreatedAt))
                    .col(timestamp_with_time_zone(Discussions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk_uuid(Notifications::Id))
                    .col(text(Notifications::Title))
                    .col(text(Notifications::Body))
                    .col(status_col(Notifications::Status))
                    .col(parent_kind_col(Notifications::DeletedParentKind))
                    .col(uuid_null(Notifications::DeletedParentId))
                    .col(timestamp_with_time_zone(Notifications::CreatedAt))
                    .col(timestamp_with_time_zone(Notifications::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserEvents::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserEvents::Id))
                    .col(uuid(UserEvents::UserId))
                    .col(uuid(UserEvents::UnitId))
                    .col(text(UserEvents::Title))
                    .col(timestamp_with_time_zone(UserEvents::StartsAt))
                    .col(status_col(UserEvents::Status))
                    .col(parent_kind_col(UserEvents::DeletedParentKind))
                    .col(uuid_null(UserEvents::DeletedParentId))
                    .col(timestamp_with_time_zone(UserEvents::CreatedAt))
                    .col(timestamp_with_time_zone(UserEvents::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_events_unit_id")
                    .table(UserEvents::Table)
                    .col(UserEvents::UnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionUsers::Table)
                    .if_not_exists()
                    .col(pk_uuid(SessionUsers::Id))
                    .col(uuid(SessionUsers::UnitId))
                    .col(uuid(SessionUsers::UserId))
                    .col(float_null(SessionUsers::Grade))
                    .col(status_col(SessionUsers::Status))
                    .col(parent_kind_col(SessionUsers::DeletedParentKind))
                    .col(uuid_null(SessionUsers::DeletedParentId))
                    .col(timestamp_with_time_zone(SessionUsers::CreatedAt))
                    .col(timestamp_with_time_zone(SessionUsers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_users_unit_id")
                    .table(SessionUsers::Table)
                    .col(SessionUsers::UnitId)
                    .to_owned(),
            )
            .await?;

        // The undo engine derives cascade sets from provenance; index
        // the (kind, id) pair on every cascade-receiving table.
        manager
            .create_index(
                Index::create()
                    .name("idx_units_deleted_parent")
                    .table(Units::Table)
                    .col(Units::DeletedParentKind)
                    .col(Units::DeletedParentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_course_groups_deleted_parent")
                    .table(UserCourseGroups::Table)
                    .col(UserCourseGroups::DeletedParentKind)
                    .col(UserCourseGroups::DeletedParentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_events_deleted_parent")
                    .table(UserEvents::Table)
                    .col(UserEvents::DeletedParentKind)
                    .col(UserEvents::DeletedParentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_session_users_deleted_parent")
                    .table(SessionUsers::Table)
                    .col(SessionUsers::DeletedParentKind)
                    .col(SessionUsers::DeletedParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Discussions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserCourseGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Status,
    DeletedParentKind,
    DeletedParentId,
    BackupEmail,
    BackupUsername,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    Name,
    Code,
    Description,
    Intake,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
    CourseId,
    Name,
    Kind,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseGroups {
    Table,
    Id,
    CourseId,
    Name,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserCourseGroups {
    Table,
    Id,
    GroupId,
    UserId,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Discussions {
    Table,
    Id,
    CourseId,
    AuthorId,
    Title,
    Body,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Title,
    Body,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserEvents {
    Table,
    Id,
    UserId,
    UnitId,
    Title,
    StartsAt,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SessionUsers {
    Table,
    Id,
    UnitId,
    UserId,
    Grade,
    Status,
    DeletedParentKind,
    DeletedParentId,
    CreatedAt,
    UpdatedAt,
}
