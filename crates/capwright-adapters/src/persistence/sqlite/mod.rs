mod alert;
mod document_cache;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use capwright_ports::error::PortError;

#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    pub async fn new(url: &str) -> Result<Self, PortError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), PortError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS alerts (
                identifier TEXT PRIMARY KEY,
                sender TEXT NOT NULL,
                status TEXT NOT NULL,
                msg_type TEXT NOT NULL,
                scope TEXT NOT NULL,
                sent TEXT NOT NULL,
                expires TEXT,
                data TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_alerts_status_scope ON alerts(status, scope)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                identifier TEXT PRIMARY KEY,
                content BLOB NOT NULL,
                signed INTEGER NOT NULL DEFAULT 0,
                cached_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
