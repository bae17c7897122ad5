pub use sea_orm_migration::prelude::*;

mod m20260705_000001_users;
mod m20260705_000002_taxonomy;
mod m20260708_000001_expenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260705_000001_users::Migration),
            Box::new(m20260705_000002_taxonomy::Migration),
            Box::new(m20260708_000001_expenses::Migration),
        ]
    }
}
