use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Response from `/api/history`.
///
/// Older backends return a bare array of samples; newer ones wrap the
/// samples together with the trigger log.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryPayload {
    Legacy(Vec<RawSample>),
    Wrapped {
        sensor_data: Vec<RawSample>,
        #[serde(default)]
        trigger_logs: Option<HashMap<String, HashMap<String, serde_json::Value>>>,
    },
}

/// A sensor record as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp_f: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hydrometer_a: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hydrometer_b: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fan_signal: Option<f64>,
}

/// Response from `/api/available-dates`.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableDatesResponse {
    #[serde(default)]
    pub dates: Vec<u32>,
}

/// Numbers pass through; null, strings like "--" and anything else become `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Interpret a trigger-log cell as an active flag.
///
/// Booleans are taken as-is and numbers are active when non-zero. Other
/// values carry no evidence.
#[must_use]
pub fn trigger_flag(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    }
}
