//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use std::fmt;

use autofarm_history::history::SensorSample;

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

pub fn hours_west(h: i32) -> FixedOffset {
    FixedOffset::west_opt(h * 3600).unwrap()
}

/// Sample at `at` with every channel set to `v`.
pub fn sample(at: DateTime<Utc>, v: f64) -> SensorSample {
    SensorSample {
        temp_f: Some(v),
        humidity: Some(v),
        hydrometer_a: Some(v),
        hydrometer_b: Some(v),
        ..SensorSample::at(at)
    }
}

/// A zone with one daylight-saving period between two UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftZone {
    standard: FixedOffset,
    daylight: FixedOffset,
    dst_start: i64,
    dst_end: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOffset {
    zone: ShiftZone,
    offset: FixedOffset,
}

impl Offset for ShiftOffset {
    fn fix(&self) -> FixedOffset {
        self.offset
    }
}

impl fmt::Display for ShiftOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.offset, f)
    }
}

impl ShiftZone {
    /// US Eastern for 2024: EDT from 2024-03-10 02:00 EST to 2024-11-03 02:00 EDT.
    pub fn us_eastern_2024() -> Self {
        Self {
            standard: hours_west(5),
            daylight: hours_west(4),
            dst_start: utc(2024, 3, 10, 7, 0, 0).timestamp(),
            dst_end: utc(2024, 11, 3, 6, 0, 0).timestamp(),
        }
    }

    /// Shifts at local midnight: 2024-09-08 00:00 jumps to 01:00 and
    /// 2025-04-06 00:00 falls back to 2025-04-05 23:00.
    pub fn midnight_shift() -> Self {
        Self {
            standard: hours_west(4),
            daylight: hours_west(3),
            dst_start: utc(2024, 9, 8, 4, 0, 0).timestamp(),
            dst_end: utc(2025, 4, 6, 3, 0, 0).timestamp(),
        }
    }

    fn offset_at(&self, utc_ts: i64) -> FixedOffset {
        if utc_ts >= self.dst_start && utc_ts < self.dst_end {
            self.daylight
        } else {
            self.standard
        }
    }

    fn wrap(&self, offset: FixedOffset) -> ShiftOffset {
        ShiftOffset { zone: *self, offset }
    }
}

impl TimeZone for ShiftZone {
    type Offset = ShiftOffset;

    fn from_offset(offset: &ShiftOffset) -> Self {
        offset.zone
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<ShiftOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<ShiftOffset> {
        let wall = local.and_utc().timestamp();
        let mut candidates: Vec<(i64, FixedOffset)> = [self.standard, self.daylight]
            .into_iter()
            .filter_map(|offset| {
                let at = wall - i64::from(offset.local_minus_utc());
                (self.offset_at(at) == offset).then_some((at, offset))
            })
            .collect();
        candidates.sort_by_key(|(at, _)| *at);
        candidates.dedup();

        match candidates.as_slice() {
            [] => LocalResult::None,
            [(_, only)] => LocalResult::Single(self.wrap(*only)),
            [(_, early), (_, late), ..] => LocalResult::Ambiguous(self.wrap(*early), self.wrap(*late)),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> ShiftOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> ShiftOffset {
        self.wrap(self.offset_at(utc.and_utc().timestamp()))
    }
}
