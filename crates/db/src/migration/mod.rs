//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Tables are declared with
//! the schema builder so the same migrations run on PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20261019_000001_initial;
mod m20261019_000002_open_termination_index;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_initial::Migration),
            Box::new(m20261019_000002_open_termination_index::Migration),
        ]
    }
}
