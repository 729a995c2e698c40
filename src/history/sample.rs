use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Naive layouts the backend emits (Python `isoformat()` on naive UTC values).
const NAIVE_LAYOUTS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a backend timestamp into a canonical UTC instant.
///
/// Accepts RFC 3339 (with `Z` or an explicit offset) and naive ISO-8601
/// with optional fractional seconds, which is read as UTC.
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

/// The four charted sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorChannel {
    Temperature,
    Humidity,
    SoilMoistureA,
    SoilMoistureB,
}

impl SensorChannel {
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::Humidity,
        Self::SoilMoistureA,
        Self::SoilMoistureB,
    ];

    /// Field name in backend records and CSV headers.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temp_f",
            Self::Humidity => "humidity",
            Self::SoilMoistureA => "hydrometer_a",
            Self::SoilMoistureB => "hydrometer_b",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature (°F)",
            Self::Humidity => "Humidity (%)",
            Self::SoilMoistureA => "Soil Moisture A (%)",
            Self::SoilMoistureB => "Soil Moisture B (%)",
        }
    }
}

/// One timestamped sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSample {
    pub timestamp: DateTime<Utc>,
    pub temp_f: Option<f64>,
    pub humidity: Option<f64>,
    pub hydrometer_a: Option<f64>,
    pub hydrometer_b: Option<f64>,
    /// Carried from the backend record; not a charted channel.
    pub fan_signal: Option<f64>,
}

impl SensorSample {
    /// A sample with no readings at `timestamp`.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temp_f: None,
            humidity: None,
            hydrometer_a: None,
            hydrometer_b: None,
            fan_signal: None,
        }
    }

    #[must_use]
    pub fn channel(&self, channel: SensorChannel) -> Option<f64> {
        match channel {
            SensorChannel::Temperature => self.temp_f,
            SensorChannel::Humidity => self.humidity,
            SensorChannel::SoilMoistureA => self.hydrometer_a,
            SensorChannel::SoilMoistureB => self.hydrometer_b,
        }
    }
}

/// Trigger name to active state at one instant.
pub type TriggerStates = BTreeMap<String, bool>;

/// Sparse trigger activation history keyed by canonical instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerLog {
    entries: BTreeMap<DateTime<Utc>, TriggerStates>,
}

impl TriggerLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, at: DateTime<Utc>, name: impl Into<String>, active: bool) {
        self.entries.entry(at).or_default().insert(name.into(), active);
    }

    /// State of `name` at exactly `at`, if logged.
    #[must_use]
    pub fn state(&self, at: &DateTime<Utc>, name: &str) -> Option<bool> {
        self.entries.get(at).and_then(|states| states.get(name).copied())
    }

    #[must_use]
    pub fn entry(&self, at: &DateTime<Utc>) -> Option<&TriggerStates> {
        self.entries.get(at)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct trigger names in discovery order: entries chronologically,
    /// names alphabetically within one entry.
    #[must_use]
    pub fn trigger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for states in self.entries.values() {
            for name in states.keys() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &TriggerStates)> {
        self.entries.iter()
    }
}

/// The canonical content of one loaded day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayData {
    /// Ascending by timestamp, unique timestamps.
    pub samples: Vec<SensorSample>,
    pub triggers: TriggerLog,
}

impl DayData {
    #[must_use]
    pub fn new(samples: Vec<SensorSample>, triggers: TriggerLog) -> Self {
        Self { samples, triggers }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
