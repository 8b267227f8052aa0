use crate::error::EventsError;
use crate::event::{CanonicalEvent, NewEvent};
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

// Helper struct to map DB row to CanonicalEvent
#[derive(FromRow)]
struct EventRow {
    id: String,
    request_id: String,
    author: String,
    action: String,
    from_branch: Option<String>,
    to_branch: String,
    timestamp: String,
}

impl TryFrom<EventRow> for CanonicalEvent {
    type Error = EventsError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(CanonicalEvent {
            id: row.id,
            request_id: row.request_id,
            author: row.author,
            action: row.action.parse()?,
            from_branch: row.from_branch,
            to_branch: row.to_branch,
            timestamp: row.timestamp,
        })
    }
}

/// Persistent storage for canonical events using SQLite
#[derive(Clone)]
pub struct SqlEventStore {
    pool: SqlitePool,
}

impl SqlEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an event and return its newly assigned id
    pub async fn append(&self, event: &NewEvent) -> Result<String, EventsError> {
        let id = Uuid::now_v7().to_string();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, request_id, author, action,
                from_branch, to_branch, timestamp, received_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&event.request_id)
        .bind(&event.author)
        .bind(event.action.as_str())
        .bind(&event.from_branch)
        .bind(&event.to_branch)
        .bind(&event.timestamp)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| EventsError::DatabaseError(format!("Failed to insert event: {}", e)))?;

        Ok(id)
    }

    /// Get up to `limit` events, newest first.
    ///
    /// "Newest" is descending order of the display timestamp string, so
    /// `31 May` sorts above `01 June`. Ties fall back to insertion order.
    pub async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, EventsError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT
                id, request_id, author, action,
                from_branch, to_branch, timestamp
            FROM events
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventsError::DatabaseError(format!("Failed to fetch recent events: {}", e)))?;

        rows.into_iter().map(CanonicalEvent::try_from).collect()
    }

    /// Count stored events
    pub async fn count(&self) -> Result<i64, EventsError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EventsError::DatabaseError(format!("Failed to count events: {}", e)))?;

        Ok(count.0)
    }

    /// Release all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
