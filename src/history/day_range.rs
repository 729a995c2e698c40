//! Local calendar day to absolute UTC bounds.
//!
//! The backend stores naive UTC timestamps, so a day picked on the calendar
//! has to be translated into the UTC instants of its local midnight and its
//! last local second. Each endpoint gets its own offset lookup: on a DST
//! transition day the two ends sit on different sides of the shift.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Seconds from local midnight to local 23:59:59.
const LAST_SECOND_OF_DAY: i64 = 86_399;

/// Longest wall-clock gap we step over when a local time does not exist.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Layout of range bounds in `/api/history` queries.
const QUERY_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayRange {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

impl DayRange {
    /// Resolve the local calendar day `date` in zone `tz`.
    ///
    /// A start that falls in a DST gap moves to the first instant that
    /// exists after it; an end in a gap moves to the last instant before
    /// it. Ambiguous wall times pick the earliest mapping for the start and
    /// the latest for the end, so the range always covers the whole day.
    pub fn for_date<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        let last_second = midnight + Duration::seconds(LAST_SECOND_OF_DAY);

        Self {
            start_utc: first_instant_at_or_after(tz, midnight),
            end_utc: last_instant_at_or_before(tz, last_second),
        }
    }

    /// Resolve `date` in the process-local timezone.
    #[must_use]
    pub fn local(date: NaiveDate) -> Self {
        Self::for_date(&chrono::Local, date)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_utc - self.start_utc
    }

    /// Inclusive containment, matching the backend's `>= start AND <= end`.
    #[must_use]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start_utc && *at <= self.end_utc
    }

    /// `(start, end)` formatted for the history query string.
    #[must_use]
    pub fn query_bounds(&self) -> (String, String) {
        (
            self.start_utc.format(QUERY_LAYOUT).to_string(),
            self.end_utc.format(QUERY_LAYOUT).to_string(),
        )
    }
}

fn first_instant_at_or_after<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|step| {
            tz.from_local_datetime(&(local + Duration::minutes(step)))
                .earliest()
        })
        .map_or_else(|| local.and_utc(), |dt| dt.with_timezone(&Utc))
}

fn last_instant_at_or_before<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|step| {
            tz.from_local_datetime(&(local - Duration::minutes(step)))
                .latest()
        })
        .map_or_else(|| local.and_utc(), |dt| dt.with_timezone(&Utc))
}
