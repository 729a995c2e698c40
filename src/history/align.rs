//! Trigger alignment onto sensor timestamps.

use serde::Serialize;

use crate::chart::palette::trigger_color;
use crate::history::sample::{SensorSample, TriggerLog};

/// Plotted value of an active trigger.
pub const ACTIVE: u8 = 100;
/// Plotted value of an inactive trigger.
pub const INACTIVE: u8 = 0;

/// One trigger's states aligned index-for-index with a sample sequence.
///
/// `None` means no evidence at that sample, not "inactive".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerSeries {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<Option<u8>>,
}

impl TriggerSeries {
    #[must_use]
    pub fn has_evidence(&self) -> bool {
        self.points.iter().any(Option::is_some)
    }
}

/// Trigger names of one loaded day with their assigned colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerColors {
    assigned: Vec<(String, &'static str)>,
}

impl TriggerColors {
    /// Assign palette colors in the log's discovery order.
    #[must_use]
    pub fn discover(log: &TriggerLog) -> Self {
        let assigned = log
            .trigger_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, trigger_color(i)))
            .collect();
        Self { assigned }
    }

    #[must_use]
    pub fn color_of(&self, name: &str) -> Option<&'static str> {
        self.assigned
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, color)| *color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.assigned.iter().map(|(n, c)| (n.as_str(), *c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Build one series per known trigger against `samples`.
///
/// Series without a single logged state in `samples` are left out.
#[must_use]
pub fn align_triggers(
    samples: &[SensorSample],
    log: &TriggerLog,
    colors: &TriggerColors,
) -> Vec<TriggerSeries> {
    colors
        .iter()
        .map(|(name, color)| TriggerSeries {
            name: name.to_string(),
            color,
            points: samples
                .iter()
                .map(|sample| {
                    log.state(&sample.timestamp, name)
                        .map(|active| if active { ACTIVE } else { INACTIVE })
                })
                .collect(),
        })
        .filter(TriggerSeries::has_evidence)
        .collect()
}
