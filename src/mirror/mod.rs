use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::{fs, io};

use crate::error::FeedbackError;
use crate::record::FeedbackRecord;

mod csv_sink;
mod text_sink;

pub use csv_sink::{CsvMirror, CSV_HEADER};
pub use text_sink::TextMirror;

/// An append-only, best-effort file replica of every accepted record.
/// Mirrors are redundancy, not a source of truth: a failed append leaves
/// that sink permanently missing the entry and is never retried.
pub trait MirrorSink: Send + Sync {
    fn name(&self) -> &'static str;

    fn path(&self) -> &Path;

    /// Creates the backing file (with its header, if the format has one)
    /// if it does not exist yet.
    fn ensure_created(&self) -> Result<(), FeedbackError>;

    /// Appends one entry for an already-committed record and flushes
    /// before returning.
    fn append(&self, record: &FeedbackRecord) -> Result<(), FeedbackError>;

    /// The sink's current bytes, verbatim, for bulk export.
    fn export(&self) -> io::Result<Vec<u8>> {
        fs::read(self.path())
    }
}

// One write_all call per append so concurrent writers cannot interleave
// partial lines.
pub(crate) fn append_payload(path: &Path, payload: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(payload.as_bytes())?;
    file.flush()
}
