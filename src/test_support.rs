use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::mirror::{CsvMirror, TextMirror};
use crate::record::FeedbackRecord;
use crate::stamp::{RecordClock, RecordStamp};
use crate::store::{FeedbackStore, SqliteFeedbackStore, StoreBackend};

pub(crate) async fn memory_store() -> SqliteFeedbackStore {
    // A single connection so every query sees the same in-memory database
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    let store = SqliteFeedbackStore::new(pool);
    store.init_schema().await.unwrap();
    store
}

pub(crate) async fn memory_backend() -> StoreBackend {
    StoreBackend::Sqlite(memory_store().await)
}

pub(crate) fn temp_mirrors(dir: &Path) -> (CsvMirror, TextMirror) {
    (
        CsvMirror::new(dir.join("feedback.csv")),
        TextMirror::new(dir.join("feedback.txt")),
    )
}

pub(crate) fn stamp_at(date: &str, time: &str) -> RecordStamp {
    let date_time =
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap();
    RecordStamp::from_datetime(date_time)
}

pub(crate) fn record_at(id: i64, label: &str, date: &str, time: &str) -> FeedbackRecord {
    FeedbackRecord::new(id, label.to_string(), &stamp_at(date, time))
}

/// Clock that advances by one minute per call, so submissions get distinct,
/// increasing times.
pub(crate) struct StepClock {
    base: NaiveDateTime,
    calls: AtomicI64,
}

impl RecordClock for StepClock {
    fn now(&self) -> NaiveDateTime {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.base + Duration::minutes(call)
    }
}

pub(crate) fn step_clock(base: &str) -> Box<dyn RecordClock> {
    let base = NaiveDateTime::parse_from_str(base, "%Y-%m-%d %H:%M:%S").unwrap();
    Box::new(StepClock {
        base,
        calls: AtomicI64::new(0),
    })
}
