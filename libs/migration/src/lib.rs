pub use sea_orm_migration::prelude::*;

mod m20250801_000000_create_lifecycle_enums;
mod m20250801_000001_create_lms_tables;
mod m20250801_000002_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000000_create_lifecycle_enums::Migration),
            Box::new(m20250801_000001_create_lms_tables::Migration),
            Box::new(m20250801_000002_create_activity_logs::Migration),
        ]
    }
}
