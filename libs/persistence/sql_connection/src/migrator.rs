use deadpool_postgres::Pool;
use tracing::info;

use crate::ConnectError;

/// A named block of SQL applied at most once per database.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self { name, sql }
    }
}

/// Applies plain SQL migrations in order, recording each in `_migrations`.
pub struct SqlMigrator {
    pool: Pool,
}

impl SqlMigrator {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn run_all_migrations(
        &self, migrations: &[Migration],
    ) -> Result<usize, ConnectError> {
        self.create_migration_table().await?;

        let mut applied = 0;
        for migration in migrations {
            if self.is_migration_applied(migration.name).await? {
                info!("Migration {} already applied, skipping", migration.name);
                continue;
            }

            info!("Running migration: {}", migration.name);
            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;
            tx.batch_execute(migration.sql).await?;
            tx.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES ($1, NOW())",
                &[&migration.name],
            )
            .await?;
            tx.commit().await?;
            applied += 1;
        }

        Ok(applied)
    }

    async fn create_migration_table(&self) -> Result<(), ConnectError> {
        let client = self.pool.get().await?;
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS _migrations (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL UNIQUE,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .await?;
        Ok(())
    }

    async fn is_migration_applied(
        &self, name: &str,
    ) -> Result<bool, ConnectError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT COUNT(*) FROM _migrations WHERE name = $1",
                &[&name],
            )
            .await?;
        let count: i64 = row.get(0);
        Ok(count > 0)
    }
}
