use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{Storage, StorageEngine};
use crate::error::FeedbackError;
use crate::record::FeedbackRecord;
use crate::stamp::RecordStamp;

mod postgres;
mod sqlite;

pub use postgres::PgFeedbackStore;
pub use sqlite::SqliteFeedbackStore;

pub type LabelCounts = HashMap<String, i64>;

/// The primary store: single source of truth for feedback records and the
/// sole assigner of record ids. Implementations exist for an embedded
/// SQLite file and a networked PostgreSQL server; the backend is chosen
/// once, from configuration, at startup.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Creates the feedback table and its history index if missing.
    async fn init_schema(&self) -> Result<(), FeedbackError>;

    /// Commits one record and returns the engine-assigned id. Atomic: on
    /// failure no row exists.
    async fn insert(&self, label: &str, stamp: &RecordStamp) -> Result<i64, FeedbackError>;

    /// Counts rows per satisfaction label, optionally restricted to one
    /// calendar date. Labels with no rows are absent from the map.
    async fn count_by_label(&self, date: Option<NaiveDate>) -> Result<LabelCounts, FeedbackError>;

    async fn total_count(&self) -> Result<i64, FeedbackError>;

    /// Rows ordered by (date, time) descending, id descending as tiebreak.
    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<FeedbackRecord>, FeedbackError>;
}

#[derive(Clone)]
pub enum StoreBackend {
    Sqlite(SqliteFeedbackStore),
    Postgres(PgFeedbackStore),
}

impl StoreBackend {
    pub async fn connect(storage: &Storage) -> Result<StoreBackend, FeedbackError> {
        match storage.engine {
            StorageEngine::Sqlite => {
                let store =
                    SqliteFeedbackStore::connect(&storage.sqlite_path(), storage.acquire_timeout())
                        .await?;
                Ok(StoreBackend::Sqlite(store))
            }
            StorageEngine::Postgres => {
                let url = storage.database_url.as_deref().ok_or_else(|| {
                    FeedbackError::Config(
                        "database_url is required when storage engine is postgres".to_string(),
                    )
                })?;
                let store = PgFeedbackStore::connect(url, storage.acquire_timeout()).await?;
                Ok(StoreBackend::Postgres(store))
            }
        }
    }
}

#[async_trait]
impl FeedbackStore for StoreBackend {
    async fn init_schema(&self) -> Result<(), FeedbackError> {
        match self {
            StoreBackend::Sqlite(store) => store.init_schema().await,
            StoreBackend::Postgres(store) => store.init_schema().await,
        }
    }

    async fn insert(&self, label: &str, stamp: &RecordStamp) -> Result<i64, FeedbackError> {
        match self {
            StoreBackend::Sqlite(store) => store.insert(label, stamp).await,
            StoreBackend::Postgres(store) => store.insert(label, stamp).await,
        }
    }

    async fn count_by_label(&self, date: Option<NaiveDate>) -> Result<LabelCounts, FeedbackError> {
        match self {
            StoreBackend::Sqlite(store) => store.count_by_label(date).await,
            StoreBackend::Postgres(store) => store.count_by_label(date).await,
        }
    }

    async fn total_count(&self) -> Result<i64, FeedbackError> {
        match self {
            StoreBackend::Sqlite(store) => store.total_count().await,
            StoreBackend::Postgres(store) => store.total_count().await,
        }
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        match self {
            StoreBackend::Sqlite(store) => store.page(limit, offset).await,
            StoreBackend::Postgres(store) => store.page(limit, offset).await,
        }
    }
}
