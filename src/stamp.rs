use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub trait RecordClock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl RecordClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Submission-time values stamped onto a record before it is stored.
/// Weekday is 0-6 with Monday as 0, the numbering the persisted data uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordStamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub weekday: u8,
}

impl RecordStamp {
    pub fn from_datetime(date_time: NaiveDateTime) -> Self {
        let time = date_time.time();
        RecordStamp {
            date: date_time.date(),
            // Sub-second precision is never stored
            time: time.with_nanosecond(0).unwrap_or(time),
            weekday: date_time.weekday().num_days_from_monday() as u8,
        }
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}
