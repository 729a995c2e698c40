//! Hour-of-day sub-slicing of a loaded day.
//!
//! Filtering works on data already in memory; moving the slider never
//! goes back to the backend.

use chrono::{TimeZone, Timelike};
use serde::Serialize;

use crate::history::align::{TriggerColors, TriggerSeries, align_triggers};
use crate::history::sample::{DayData, SensorSample};

pub const FIRST_HOUR: u8 = 0;
pub const HOURS_PER_DAY: u8 = 24;

/// Half-open local hour range `[start_hour, end_hour)`.
///
/// Always `start_hour < end_hour` with both in `0..=24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HourWindow {
    start_hour: u8,
    end_hour: u8,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

impl HourWindow {
    pub const FULL_DAY: Self = Self {
        start_hour: FIRST_HOUR,
        end_hour: HOURS_PER_DAY,
    };

    /// `None` unless `start_hour < end_hour <= 24`.
    #[must_use]
    pub fn new(start_hour: u8, end_hour: u8) -> Option<Self> {
        (start_hour < end_hour && end_hour <= HOURS_PER_DAY).then_some(Self {
            start_hour,
            end_hour,
        })
    }

    #[must_use]
    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    #[must_use]
    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    #[must_use]
    pub fn is_full_day(&self) -> bool {
        *self == Self::FULL_DAY
    }

    #[must_use]
    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= u32::from(self.start_hour) && hour < u32::from(self.end_hour)
    }

    /// Move the start handle. The end is pushed up to keep one hour open.
    #[must_use]
    pub fn with_start(self, hour: i32) -> Self {
        let start = clamp_hour(hour, 0, i32::from(HOURS_PER_DAY) - 1);
        let end = self.end_hour.max(start + 1);
        Self {
            start_hour: start,
            end_hour: end,
        }
    }

    /// Move the end handle. The start is pushed down to keep one hour open.
    #[must_use]
    pub fn with_end(self, hour: i32) -> Self {
        let end = clamp_hour(hour, 1, i32::from(HOURS_PER_DAY));
        let start = self.start_hour.min(end - 1);
        Self {
            start_hour: start,
            end_hour: end,
        }
    }
}

fn clamp_hour(hour: i32, lo: i32, hi: i32) -> u8 {
    // lo/hi are within 0..=24, so the cast cannot truncate
    hour.clamp(lo, hi) as u8
}

impl std::fmt::Display for HourWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00–{:02}:00", self.start_hour, self.end_hour)
    }
}

/// The visible part of a loaded day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySlice {
    pub window: HourWindow,
    pub samples: Vec<SensorSample>,
    pub triggers: Vec<TriggerSeries>,
}

impl DaySlice {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Keep the samples whose local hour lies in `window` and realign triggers on them.
pub fn filter_day<Tz: TimeZone>(
    day: &DayData,
    colors: &TriggerColors,
    window: HourWindow,
    tz: &Tz,
) -> DaySlice {
    let samples: Vec<SensorSample> = if window.is_full_day() {
        day.samples.clone()
    } else {
        day.samples
            .iter()
            .filter(|s| window.contains_hour(s.timestamp.with_timezone(tz).hour()))
            .copied()
            .collect()
    };

    let triggers = align_triggers(&samples, &day.triggers, colors);

    DaySlice {
        window,
        samples,
        triggers,
    }
}
