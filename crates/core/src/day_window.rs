//! Calendar-day windows used by the daily rating limit.

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

/// Half-open interval `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    /// The local day (at `offset`) that contains `instant`.
    pub fn containing(instant: Timestamp, offset: FixedOffset) -> Self {
        let date = instant.with_timezone(&offset).date_naive();
        let next = date.succ_opt().unwrap_or(date);
        Self {
            start: local_midnight(date, offset),
            end: local_midnight(next, offset),
        }
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Timestamp {
    let utc = date.and_time(NaiveTime::MIN)
        - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}
