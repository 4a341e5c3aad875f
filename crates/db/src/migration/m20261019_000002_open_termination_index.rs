//! At most one open termination request per contract.
//!
//! Partial unique index. Both PostgreSQL and SQLite accept the same
//! statement, which the schema builder cannot express.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(OPEN_REQUEST_INDEX_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS uq_termination_requests_open_contract;")
            .await?;
        Ok(())
    }
}

const OPEN_REQUEST_INDEX_SQL: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS uq_termination_requests_open_contract
    ON termination_requests (contract_id)
    WHERE status IN ('pending', 'accountant_approved', 'owner_approved');
";
