use std::path::{Path, PathBuf};

use crate::error::FeedbackError;
use crate::mirror::{append_payload, MirrorSink};
use crate::record::FeedbackRecord;

/// Human-readable mirror: one `ID:<id> | <label> | <date> <time> |
/// Dia:<weekday>` line per record.
pub struct TextMirror {
    path: PathBuf,
}

impl TextMirror {
    pub fn new(path: PathBuf) -> Self {
        TextMirror { path }
    }

    fn write_failed(&self, source: std::io::Error) -> FeedbackError {
        FeedbackError::MirrorWriteFailed {
            sink: self.name(),
            source,
        }
    }
}

impl MirrorSink for TextMirror {
    fn name(&self) -> &'static str {
        "text"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_created(&self) -> Result<(), FeedbackError> {
        if !self.path.exists() {
            append_payload(&self.path, "").map_err(|e| self.write_failed(e))?;
        }
        Ok(())
    }

    fn append(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let line = format!(
            "ID:{} | {} | {} {} | Dia:{}\n",
            record.id,
            record.label,
            record.date_string(),
            record.time_string(),
            record.weekday
        );
        append_payload(&self.path, &line).map_err(|e| self.write_failed(e))
    }
}
