use async_trait::async_trait;

use capwright_core::alert::Alert;
use capwright_core::ids::Reference;
use capwright_ports::error::PortError;
use capwright_ports::outbound::AlertRepository;
use capwright_ports::types::AlertFilter;

use super::SqliteDb;

#[async_trait]
impl AlertRepository for SqliteDb {
    async fn save(&self, alert: &Alert) -> Result<(), PortError> {
        let identifier = alert.identifier.to_string();
        let status = alert.status.as_str();
        let msg_type = alert.msg_type.as_str();
        let scope = alert.scope.as_str();
        let sent = alert.sent.to_rfc3339();
        // latest expiry across info blocks, for the active-at filter
        let expires = alert
            .info
            .iter()
            .map(|i| i.expires)
            .max()
            .map(|e| e.to_rfc3339());
        let data =
            serde_json::to_string(alert).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO alerts (identifier, sender, status, msg_type, scope, sent, expires, data)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(identifier) DO UPDATE SET
                sender = excluded.sender,
                status = excluded.status,
                msg_type = excluded.msg_type,
                scope = excluded.scope,
                sent = excluded.sent,
                expires = excluded.expires,
                data = excluded.data",
        )
        .bind(&identifier)
        .bind(&alert.sender)
        .bind(status)
        .bind(msg_type)
        .bind(scope)
        .bind(&sent)
        .bind(&expires)
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Alert>, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM alerts WHERE identifier = ?")
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(|(data,)| {
            serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
        })
        .transpose()
    }

    async fn find_by_reference(&self, reference: &Reference) -> Result<Option<Alert>, PortError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT data FROM alerts WHERE sender = ? AND identifier = ? AND sent = ? LIMIT 1",
        )
        .bind(&reference.sender)
        .bind(reference.identifier.as_str())
        .bind(reference.sent.to_rfc3339())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(|(data,)| {
            serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
        })
        .transpose()
    }

    async fn find_by_filter(&self, filter: &AlertFilter) -> Result<Vec<Alert>, PortError> {
        let mut sql = String::from("SELECT data FROM alerts WHERE 1=1");
        let mut binds: Vec<String> = Vec::new();

        if filter.actual_public_only {
            sql.push_str(" AND status = 'Actual' AND scope = 'Public'");
        }
        if let Some(active_at) = &filter.active_at {
            sql.push_str(" AND expires > ?");
            binds.push(active_at.to_rfc3339());
        }
        sql.push_str(" ORDER BY sent DESC");

        let mut query = sqlx::query_as::<_, (String,)>(&sql);
        for b in &binds {
            query = query.bind(b);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut alerts = Vec::with_capacity(rows.len());
        for (data,) in rows {
            let alert: Alert =
                serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))?;
            alerts.push(alert);
        }
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capwright_core::alert::{MsgType, Scope, Status};
    use capwright_core::area::Area;
    use capwright_core::info::Info;
    use capwright_core::taxonomy::{Category, Certainty, Severity, Urgency};

    fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn make_alert(expires: &str) -> Alert {
        let mut alert = Alert::new(
            "alerts@example.org",
            ts("2025-01-15T10:00:00Z"),
            Status::Actual,
            MsgType::Alert,
            Scope::Public,
            None,
        );
        let mut info = Info::new(
            Category::Met,
            "Flood",
            Urgency::Immediate,
            Severity::Extreme,
            Certainty::Observed,
            ts(expires),
        );
        info.area.push(Area::circle("Zone A", 10.0, 20.0, 5.0));
        alert.info.push(info);
        alert
    }

    #[tokio::test]
    async fn save_and_find_by_identifier() {
        let db = db().await;
        let alert = make_alert("2025-01-16T10:00:00Z");

        db.save(&alert).await.unwrap();

        let found = db
            .find_by_identifier(alert.identifier.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, alert);
    }

    #[tokio::test]
    async fn find_by_identifier_returns_none() {
        let db = db().await;
        let found = db.find_by_identifier("missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn reference_triple_resolves_stored_alert() {
        let db = db().await;
        let alert = make_alert("2025-01-16T10:00:00Z");
        db.save(&alert).await.unwrap();

        let found = db.find_by_reference(&alert.reference()).await.unwrap();
        assert_eq!(found, Some(alert.clone()));

        // same identifier but different sent must not match
        let mut stale = alert.reference();
        stale.sent = ts("2020-01-01T00:00:00Z");
        assert!(db.find_by_reference(&stale).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_updates_existing_row() {
        let db = db().await;
        let mut alert = make_alert("2025-01-16T10:00:00Z");
        db.save(&alert).await.unwrap();

        alert.status = Status::Test;
        db.save(&alert).await.unwrap();

        let found = db
            .find_by_identifier(alert.identifier.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.status, Status::Test);
    }

    #[tokio::test]
    async fn filter_actual_public_only() {
        let db = db().await;
        db.save(&make_alert("2025-01-16T10:00:00Z")).await.unwrap();

        let mut draft = make_alert("2025-01-16T10:00:00Z");
        draft.status = Status::Draft;
        db.save(&draft).await.unwrap();

        let filter = AlertFilter {
            actual_public_only: true,
            ..Default::default()
        };
        let results = db.find_by_filter(&filter).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Actual);
    }

    #[tokio::test]
    async fn filter_active_at_excludes_expired() {
        let db = db().await;
        db.save(&make_alert("2025-01-16T10:00:00Z")).await.unwrap();
        db.save(&make_alert("2025-01-15T12:00:00Z")).await.unwrap();

        let filter = AlertFilter {
            active_at: Some(ts("2025-01-15T18:00:00Z")),
            ..Default::default()
        };
        let results = db.find_by_filter(&filter).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].info[0].expires, ts("2025-01-16T10:00:00Z"));
    }
}
