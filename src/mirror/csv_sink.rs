use std::path::{Path, PathBuf};

use crate::error::FeedbackError;
use crate::mirror::{append_payload, MirrorSink};
use crate::record::FeedbackRecord;

pub const CSV_HEADER: &str = "ID;Satisfacao;Data;Hora;DiaSemana";

/// Semicolon-delimited mirror. The header row is written once, when the
/// file is first created, before any data row.
pub struct CsvMirror {
    path: PathBuf,
}

impl CsvMirror {
    pub fn new(path: PathBuf) -> Self {
        CsvMirror { path }
    }

    fn write_failed(&self, source: std::io::Error) -> FeedbackError {
        FeedbackError::MirrorWriteFailed {
            sink: self.name(),
            source,
        }
    }
}

impl MirrorSink for CsvMirror {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_created(&self) -> Result<(), FeedbackError> {
        if !self.path.exists() {
            append_payload(&self.path, &format!("{}\n", CSV_HEADER))
                .map_err(|e| self.write_failed(e))?;
        }
        Ok(())
    }

    fn append(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let mut payload = String::new();
        if !self.path.exists() {
            payload.push_str(CSV_HEADER);
            payload.push('\n');
        }
        payload.push_str(&format!(
            "{};{};{};{};{}\n",
            record.id,
            record.label,
            record.date_string(),
            record.time_string(),
            record.weekday
        ));
        append_payload(&self.path, &payload).map_err(|e| self.write_failed(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_at;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = CsvMirror::new(dir.path().join("feedback.csv"));

        mirror
            .append(&record_at(1, "Satisfeito", "2025-03-10", "09:00:00"))
            .unwrap();
        mirror
            .append(&record_at(2, "Neutro", "2025-03-10", "09:05:30"))
            .unwrap();

        let contents = String::from_utf8(mirror.export().unwrap()).unwrap();
        assert_eq!(
            contents,
            "ID;Satisfacao;Data;Hora;DiaSemana\n\
             1;Satisfeito;2025-03-10;09:00:00;0\n\
             2;Neutro;2025-03-10;09:05:30;0\n"
        );
    }

    #[test]
    fn test_ensure_created_only_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = CsvMirror::new(dir.path().join("feedback.csv"));

        mirror.ensure_created().unwrap();
        mirror.ensure_created().unwrap();

        let contents = String::from_utf8(mirror.export().unwrap()).unwrap();
        assert_eq!(contents, "ID;Satisfacao;Data;Hora;DiaSemana\n");
    }

    #[test]
    fn test_append_fails_on_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself cannot be opened as a file
        let mirror = CsvMirror::new(dir.path().to_path_buf());
        let result = mirror.append(&record_at(1, "Satisfeito", "2025-03-10", "09:00:00"));
        assert!(matches!(
            result,
            Err(FeedbackError::MirrorWriteFailed { sink: "csv", .. })
        ));
    }
}
