use chrono::{NaiveDate, NaiveTime};

use crate::error::FeedbackError;
use crate::stamp::RecordStamp;

/// One accepted satisfaction rating. Never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub id: i64,
    pub label: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub weekday: u8,
}

impl FeedbackRecord {
    pub fn new(id: i64, label: String, stamp: &RecordStamp) -> Self {
        FeedbackRecord {
            id,
            label,
            date: stamp.date,
            time: stamp.time,
            weekday: stamp.weekday,
        }
    }

    /// Decodes the TEXT/INTEGER columns both store backends persist.
    pub(crate) fn from_columns(
        id: i64,
        label: String,
        date: String,
        time: String,
        weekday: i64,
    ) -> Result<Self, FeedbackError> {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
            FeedbackError::MalformedRecord(format!("record {}: date '{}': {}", id, date, e))
        })?;
        let time = NaiveTime::parse_from_str(&time, "%H:%M:%S").map_err(|e| {
            FeedbackError::MalformedRecord(format!("record {}: time '{}': {}", id, time, e))
        })?;
        let weekday = u8::try_from(weekday)
            .ok()
            .filter(|w| *w <= 6)
            .ok_or_else(|| {
                FeedbackError::MalformedRecord(format!("record {}: weekday {}", id, weekday))
            })?;
        Ok(FeedbackRecord {
            id,
            label,
            date,
            time,
            weekday,
        })
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns() {
        let record = FeedbackRecord::from_columns(
            7,
            "Satisfeito".to_string(),
            "2025-03-10".to_string(),
            "12:45:00".to_string(),
            0,
        )
        .unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.date_string(), "2025-03-10");
        assert_eq!(record.time_string(), "12:45:00");
        assert_eq!(record.weekday, 0);
    }

    #[test]
    fn test_from_columns_rejects_bad_values() {
        let bad_date = FeedbackRecord::from_columns(
            1,
            "x".to_string(),
            "10/03/2025".to_string(),
            "12:45:00".to_string(),
            0,
        );
        assert!(matches!(bad_date, Err(FeedbackError::MalformedRecord(_))));

        let bad_weekday = FeedbackRecord::from_columns(
            2,
            "x".to_string(),
            "2025-03-10".to_string(),
            "12:45:00".to_string(),
            7,
        );
        assert!(matches!(bad_weekday, Err(FeedbackError::MalformedRecord(_))));
    }
}
