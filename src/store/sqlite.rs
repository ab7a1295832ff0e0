use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::FeedbackError;
use crate::record::FeedbackRecord;
use crate::stamp::RecordStamp;
use crate::store::{FeedbackStore, LabelCounts};

/// Embedded single-file backend. WAL mode so readers never block the
/// single writer.
#[derive(Clone)]
pub struct SqliteFeedbackStore {
    pool: SqlitePool,
}

impl SqliteFeedbackStore {
    pub async fn connect(path: &Path, acquire_timeout: Duration) -> Result<Self, FeedbackError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(acquire_timeout);
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;
        Ok(SqliteFeedbackStore { pool })
    }

    pub fn new(pool: SqlitePool) -> Self {
        SqliteFeedbackStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn init_schema(&self) -> Result<(), FeedbackError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                satisfacao TEXT NOT NULL,
                data TEXT NOT NULL,
                hora TEXT NOT NULL,
                dia_semana INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_feedback_history ON feedback (data, hora)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, label: &str, stamp: &RecordStamp) -> Result<i64, FeedbackError> {
        let result = sqlx::query(
            "INSERT INTO feedback (satisfacao, data, hora, dia_semana) VALUES (?, ?, ?, ?)",
        )
        .bind(label)
        .bind(stamp.date_string())
        .bind(stamp.time_string())
        .bind(stamp.weekday as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn count_by_label(&self, date: Option<NaiveDate>) -> Result<LabelCounts, FeedbackError> {
        let rows: Vec<(String, i64)> = match date {
            Some(date) => {
                sqlx::query_as(
                    "SELECT satisfacao, COUNT(*) FROM feedback WHERE data = ? GROUP BY satisfacao",
                )
                .bind(date.format("%Y-%m-%d").to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT satisfacao, COUNT(*) FROM feedback GROUP BY satisfacao")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().collect())
    }

    async fn total_count(&self) -> Result<i64, FeedbackError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        let rows: Vec<(i64, String, String, String, i64)> = sqlx::query_as(
            "SELECT id, satisfacao, data, hora, dia_semana FROM feedback
             ORDER BY data DESC, hora DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(id, label, date, time, weekday)| {
                FeedbackRecord::from_columns(id, label, date, time, weekday)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_store, stamp_at};

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = memory_store().await;
        let mut last = 0;
        for label in ["Satisfeito", "Neutro", "Insatisfeito"] {
            let id = store
                .insert(label, &stamp_at("2025-03-10", "09:00:00"))
                .await
                .unwrap();
            assert!(id > last);
            last = id;
        }
        assert_eq!(store.total_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_by_label_filters_by_date() {
        let store = memory_store().await;
        store
            .insert("Satisfeito", &stamp_at("2025-03-10", "09:00:00"))
            .await
            .unwrap();
        store
            .insert("Satisfeito", &stamp_at("2025-03-10", "10:00:00"))
            .await
            .unwrap();
        store
            .insert("Satisfeito", &stamp_at("2025-03-11", "09:00:00"))
            .await
            .unwrap();

        let day = store
            .count_by_label(Some("2025-03-10".parse().unwrap()))
            .await
            .unwrap();
        assert_eq!(day.get("Satisfeito"), Some(&2));

        let all = store.count_by_label(None).await.unwrap();
        assert_eq!(all.get("Satisfeito"), Some(&3));

        let empty = store
            .count_by_label(Some("2025-03-12".parse().unwrap()))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_page_orders_by_date_time_then_id() {
        let store = memory_store().await;
        // Same instant twice so the id tiebreak is exercised
        let a = store
            .insert("Satisfeito", &stamp_at("2025-03-10", "09:00:00"))
            .await
            .unwrap();
        let b = store
            .insert("Neutro", &stamp_at("2025-03-10", "09:00:00"))
            .await
            .unwrap();
        let c = store
            .insert("Insatisfeito", &stamp_at("2025-03-09", "23:00:00"))
            .await
            .unwrap();
        let d = store
            .insert("Satisfeito", &stamp_at("2025-03-10", "11:30:00"))
            .await
            .unwrap();

        let records = store.page(10, 0).await.unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![d, b, a, c]);

        let second = store.page(2, 2).await.unwrap();
        let ids: Vec<i64> = second.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test]
    async fn test_failed_insert_reports_unavailable() {
        let store = memory_store().await;
        store.pool().close().await;
        let result = store
            .insert("Satisfeito", &stamp_at("2025-03-10", "09:00:00"))
            .await;
        assert!(matches!(
            result,
            Err(crate::error::FeedbackError::StorageUnavailable(_))
        ));
    }
}
