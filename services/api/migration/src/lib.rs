use sea_orm_migration::prelude::*;

mod m20260601_000001_create_samples;
mod m20260601_000002_create_users;
mod m20260601_000003_create_farms;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_samples::Migration),
            Box::new(m20260601_000002_create_users::Migration),
            Box::new(m20260601_000003_create_farms::Migration),
        ]
    }
}
