use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::FeedbackError;
use crate::record::FeedbackRecord;
use crate::stamp::RecordStamp;
use crate::store::{FeedbackStore, LabelCounts};

/// Networked backend. Column layout matches the SQLite backend so the two
/// are interchangeable behind the trait.
#[derive(Clone)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub async fn connect(url: &str, acquire_timeout: Duration) -> Result<Self, FeedbackError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        Ok(PgFeedbackStore { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        PgFeedbackStore { pool }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn init_schema(&self) -> Result<(), FeedbackError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS feedback (
                id BIGSERIAL PRIMARY KEY,
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
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feedback (satisfacao, data, hora, dia_semana)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(label)
        .bind(stamp.date_string())
        .bind(stamp.time_string())
        .bind(stamp.weekday as i32)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn count_by_label(&self, date: Option<NaiveDate>) -> Result<LabelCounts, FeedbackError> {
        let rows: Vec<(String, i64)> = match date {
            Some(date) => {
                sqlx::query_as(
                    "SELECT satisfacao, COUNT(*) FROM feedback WHERE data = $1 GROUP BY satisfacao",
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
        let rows: Vec<(i64, String, String, String, i32)> = sqlx::query_as(
            "SELECT id, satisfacao, data, hora, dia_semana FROM feedback
             ORDER BY data DESC, hora DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(id, label, date, time, weekday)| {
                FeedbackRecord::from_columns(id, label, date, time, weekday as i64)
            })
            .collect()
    }
}
