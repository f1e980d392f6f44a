use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lifecycle status shared by every soft-deletable table
        manager
            .create_type(
                Type::create()
                    .as_enum(EntityStatusEnum::Enum)
                    .values([
                        EntityStatusEnum::Active,
                        EntityStatusEnum::Inactive,
                        EntityStatusEnum::Draft,
                        EntityStatusEnum::Deleted,
                    ])
                    .to_owned(),
            )
            .await?;

        // Cascade provenance parent kinds
        manager
            .create_type(
                Type::create()
                    .as_enum(ParentKindEnum::Enum)
                    .values([
                        ParentKindEnum::Course,
                        ParentKindEnum::Unit,
                        ParentKindEnum::Group,
                        ParentKindEnum::Event,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(UnitKindEnum::Enum)
                    .values([
                        UnitKindEnum::Lesson,
                        UnitKindEnum::Assessment,
                        UnitKindEnum::Resource,
                    ])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_type(Type::drop().name(UnitKindEnum::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(ParentKindEnum::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(EntityStatusEnum::Enum).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EntityStatusEnum {
    #[sea_orm(iden = "entity_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "inactive")]
    Inactive,
    #[sea_orm(iden = "draft")]
    Draft,
    #[sea_orm(iden = "deleted")]
    Deleted,
}

#[derive(DeriveIden)]
pub enum ParentKindEnum {
    #[sea_orm(iden = "parent_kind")]
    Enum,
    #[sea_orm(iden = "course")]
    Course,
    #[sea_orm(iden = "unit")]
    Unit,
    #[sea_orm(iden = "group")]
    Group,
    #[sea_orm(iden = "event")]
    Event,
}

#[derive(DeriveIden)]
pub enum UnitKindEnum {
    #[sea_orm(iden = "unit_kind")]
    Enum,
    #[sea_orm(iden = "lesson")]
    Lesson,
    #[sea_orm(iden = "assessment")]
    Assessment,
    #[sea_orm(iden = "resource")]
    Resource,
}
