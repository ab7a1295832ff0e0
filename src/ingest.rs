use spdlog::{debug, warn};

use crate::error::FeedbackError;
use crate::mirror::{CsvMirror, MirrorSink, TextMirror};
use crate::record::FeedbackRecord;
use crate::stamp::{RecordClock, RecordStamp, SystemClock};
use crate::store::{FeedbackStore, StoreBackend};

/// Entry point for "a satisfaction rating arrived": stamps the submission,
/// commits it to the primary store, then mirrors it to the CSV sink and the
/// text sink, in that order.
pub struct IngestionService {
    store: StoreBackend,
    mirrors: Vec<Box<dyn MirrorSink>>,
    clock: Box<dyn RecordClock>,
}

impl IngestionService {
    pub fn new(store: StoreBackend, csv: CsvMirror, text: TextMirror) -> Self {
        Self::with_clock(store, csv, text, Box::new(SystemClock))
    }

    pub fn with_clock(
        store: StoreBackend,
        csv: CsvMirror,
        text: TextMirror,
        clock: Box<dyn RecordClock>,
    ) -> Self {
        IngestionService {
            store,
            mirrors: vec![Box::new(csv), Box::new(text)],
            clock,
        }
    }

    /// Stores one rating and returns the assigned id.
    ///
    /// The label is opaque text; the only check is that it is not empty.
    /// A primary-store failure aborts before any mirror write. A mirror
    /// failure is logged and swallowed: the record is already durable in
    /// the primary store, so the call still succeeds.
    pub async fn record(&self, raw_label: &str) -> Result<i64, FeedbackError> {
        let label = raw_label.trim();
        if label.is_empty() {
            return Err(FeedbackError::EmptyLabel);
        }

        let stamp = RecordStamp::from_datetime(self.clock.now());
        let id = self.store.insert(label, &stamp).await?;
        let record = FeedbackRecord::new(id, label.to_string(), &stamp);

        for mirror in &self.mirrors {
            match mirror.append(&record) {
                Ok(()) => debug!("Record {} mirrored to {}", id, mirror.name()),
                Err(err) => warn!("{} mirror missed record {}: {}", mirror.name(), id, err),
            }
        }

        Ok(id)
    }
}
