//! Chart model for the history view.
//!
//! Sensor channels share a linear `y` axis and are drawn smoothed. Trigger
//! series sit on a separate `triggers` axis pinned to `0..=100` and are
//! drawn stepped and filled. The model serializes to a Chart.js config.

pub mod palette;
pub mod table;

use chrono::TimeZone;
use serde_json::{Value, json};

use crate::history::align::{ACTIVE, INACTIVE, TriggerSeries};
use crate::history::sample::SensorChannel;
use crate::history::window::DaySlice;

pub const SENSOR_AXIS_ID: &str = "y";
pub const TRIGGER_AXIS_ID: &str = "triggers";

/// Curve tension for sensor lines.
const SENSOR_TENSION: f64 = 0.4;

/// Label layout on the category axis.
const LABEL_LAYOUT: &str = "%H:%M:%S";

/// Tick label for a value on the trigger axis.
#[must_use]
pub fn trigger_tick_label(value: u8) -> Option<&'static str> {
    match value {
        INACTIVE => Some("Inactive"),
        ACTIVE => Some("Active"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorDataset {
    pub channel: SensorChannel,
    pub color: &'static str,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDataset {
    pub name: String,
    pub color: &'static str,
    pub values: Vec<Option<u8>>,
}

impl From<&TriggerSeries> for TriggerDataset {
    fn from(series: &TriggerSeries) -> Self {
        Self {
            name: series.name.clone(),
            color: series.color,
            values: series.points.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    labels: Vec<String>,
    sensors: Vec<SensorDataset>,
    triggers: Vec<TriggerDataset>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            sensors: SensorChannel::ALL
                .iter()
                .map(|&channel| SensorDataset {
                    channel,
                    color: palette::channel_color(channel),
                    values: Vec::new(),
                })
                .collect(),
            triggers: Vec::new(),
        }
    }

    /// Paint `slice`: sensor datasets are refilled in place, trigger
    /// datasets are replaced wholesale.
    pub fn render<Tz: TimeZone>(&mut self, slice: &DaySlice, tz: &Tz)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.labels.clear();
        self.labels.extend(
            slice
                .samples
                .iter()
                .map(|s| s.timestamp.with_timezone(tz).format(LABEL_LAYOUT).to_string()),
        );

        for dataset in &mut self.sensors {
            dataset.values.clear();
            dataset
                .values
                .extend(slice.samples.iter().map(|s| s.channel(dataset.channel)));
        }

        self.triggers = slice.triggers.iter().map(TriggerDataset::from).collect();

        tracing::trace!(
            points = self.labels.len(),
            triggers = self.triggers.len(),
            "chart_rendered"
        );
    }

    /// Remove every label and data point.
    pub fn clear(&mut self) {
        self.labels.clear();
        for dataset in &mut self.sensors {
            dataset.values.clear();
        }
        self.triggers.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn sensor_datasets(&self) -> &[SensorDataset] {
        &self.sensors
    }

    #[must_use]
    pub fn trigger_datasets(&self) -> &[TriggerDataset] {
        &self.triggers
    }

    /// Chart.js `line` chart configuration for the current contents.
    #[must_use]
    pub fn to_chartjs(&self) -> Value {
        let mut datasets: Vec<Value> = self
            .sensors
            .iter()
            .map(|ds| {
                json!({
                    "label": ds.channel.label(),
                    "data": ds.values,
                    "borderColor": ds.color,
                    "backgroundColor": palette::fill_color(ds.color, 0.05),
                    "tension": SENSOR_TENSION,
                    "fill": false,
                    "yAxisID": SENSOR_AXIS_ID,
                })
            })
            .collect();

        datasets.extend(self.triggers.iter().map(|ds| {
            json!({
                "label": ds.name,
                "data": ds.values,
                "borderColor": ds.color,
                "backgroundColor": palette::fill_color(ds.color, 0.2),
                "stepped": true,
                "fill": true,
                "spanGaps": false,
                "yAxisID": TRIGGER_AXIS_ID,
            })
        }));

        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": datasets,
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": true, "position": "top" } },
                "scales": {
                    "x": { "type": "category", "display": true },
                    SENSOR_AXIS_ID: { "type": "linear", "position": "left", "beginAtZero": false },
                    TRIGGER_AXIS_ID: {
                        "type": "linear",
                        "position": "right",
                        "min": INACTIVE,
                        "max": ACTIVE,
                        "display": !self.triggers.is_empty(),
                        "grid": { "drawOnChartArea": false },
                        "ticks": {
                            "stepSize": ACTIVE,
                            "labels": {
                                INACTIVE.to_string(): trigger_tick_label(INACTIVE),
                                ACTIVE.to_string(): trigger_tick_label(ACTIVE),
                            },
                        },
                    },
                },
            },
        })
    }
}
