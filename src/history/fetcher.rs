//! History retrieval and response normalization.
//!
//! Both backend response shapes are resolved here into one [`DayData`];
//! nothing downstream knows which shape the backend sent.

use std::future::Future;

use crate::api::models::{HistoryPayload, RawSample, trigger_flag};
use crate::error::{AppError, AppResult};
use crate::history::day_range::DayRange;
use crate::history::sample::{DayData, SensorSample, TriggerLog, parse_instant};

/// Anything that can produce the canonical data of one day.
pub trait HistorySource {
    fn fetch_day(&self, range: DayRange) -> impl Future<Output = AppResult<DayData>> + Send;
}

/// Decode a successful `/api/history` body.
///
/// # Errors
///
/// - `AppError::Fetch` if the body is not JSON.
/// - `AppError::MalformedResponse` if it is JSON of the wrong shape.
/// - `AppError::EmptyRange` if no samples remain.
pub fn decode_history(status: u16, body: &str, excerpt_chars: usize) -> AppResult<DayData> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(status, error = %e, "history_body_not_json");
        AppError::fetch(Some(status), body, excerpt_chars)
    })?;

    let payload: HistoryPayload = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(
            error = %e,
            body_preview = %crate::error::excerpt(body, excerpt_chars),
            "history_response_malformed"
        );
        AppError::MalformedResponse(e.to_string())
    })?;

    normalize(payload)
}

/// Resolve either payload shape into sorted, de-duplicated day data.
///
/// # Errors
///
/// Returns `AppError::MalformedResponse` for a sample whose timestamp does
/// not parse, and `AppError::EmptyRange` when there are no samples.
pub fn normalize(payload: HistoryPayload) -> AppResult<DayData> {
    let (raw_samples, raw_logs) = match payload {
        HistoryPayload::Legacy(samples) => (samples, None),
        HistoryPayload::Wrapped {
            sensor_data,
            trigger_logs,
        } => (sensor_data, trigger_logs),
    };

    let mut samples = raw_samples
        .into_iter()
        .map(to_sample)
        .collect::<AppResult<Vec<_>>>()?;

    // Stable sort keeps arrival order among equal timestamps so the dedup
    // below can keep the last one received.
    samples.sort_by_key(|s| s.timestamp);
    let samples = dedup_keep_last(samples);

    if samples.is_empty() {
        return Err(AppError::EmptyRange);
    }

    let mut triggers = TriggerLog::new();
    let mut dropped_keys = 0usize;
    for (key, states) in raw_logs.unwrap_or_default() {
        let Some(at) = parse_instant(&key) else {
            dropped_keys += 1;
            continue;
        };
        for (name, value) in &states {
            if let Some(active) = trigger_flag(value) {
                triggers.insert(at, name.clone(), active);
            }
        }
    }
    if dropped_keys > 0 {
        tracing::warn!(dropped_keys, "trigger_log_keys_unparseable");
    }

    tracing::debug!(
        samples = samples.len(),
        trigger_entries = triggers.len(),
        "history_normalized"
    );

    Ok(DayData::new(samples, triggers))
}

fn to_sample(raw: RawSample) -> AppResult<SensorSample> {
    let timestamp = parse_instant(&raw.timestamp).ok_or_else(|| {
        AppError::MalformedResponse(format!("unparseable sample timestamp '{}'", raw.timestamp))
    })?;

    Ok(SensorSample {
        timestamp,
        temp_f: raw.temp_f,
        humidity: raw.humidity,
        hydrometer_a: raw.hydrometer_a,
        hydrometer_b: raw.hydrometer_b,
        fan_signal: raw.fan_signal,
    })
}

/// Collapse runs of equal timestamps to their last element. Input must be sorted.
fn dedup_keep_last(sorted: Vec<SensorSample>) -> Vec<SensorSample> {
    let mut out: Vec<SensorSample> = Vec::with_capacity(sorted.len());
    for sample in sorted {
        match out.last_mut() {
            Some(last) if last.timestamp == sample.timestamp => *last = sample,
            _ => out.push(sample),
        }
    }
    out
}
