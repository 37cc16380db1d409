use async_trait::async_trait;
use chrono::{DateTime, Utc};

use capwright_ports::error::PortError;
use capwright_ports::outbound::DocumentCache;
use capwright_ports::types::CachedDocument;

use super::SqliteDb;

#[async_trait]
impl DocumentCache for SqliteDb {
    async fn get(&self, identifier: &str) -> Result<Option<CachedDocument>, PortError> {
        let row: Option<(Vec<u8>, i64, String)> = sqlx::query_as(
            "SELECT content, signed, cached_at FROM documents WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(|(content, signed, cached_at)| {
            let cached_at = DateTime::parse_from_rfc3339(&cached_at)
                .map_err(|e| PortError::Persistence(e.to_string()))?
                .with_timezone(&Utc);
            Ok(CachedDocument {
                identifier: identifier.to_string(),
                content,
                signed: signed != 0,
                cached_at,
            })
        })
        .transpose()
    }

    async fn store(&self, document: &CachedDocument) -> Result<(), PortError> {
        // write-once: a document is immutable for its identifier's lifetime
        sqlx::query(
            "INSERT INTO documents (identifier, content, signed, cached_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(identifier) DO NOTHING",
        )
        .bind(&document.identifier)
        .bind(&document.content)
        .bind(document.signed as i64)
        .bind(document.cached_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn invalidate(&self, identifier: &str) -> Result<(), PortError> {
        sqlx::query("DELETE FROM documents WHERE identifier = ?")
            .bind(identifier)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(())
    }
}
