//! CSV export of the visible slice.
//!
//! Columns: `time`, the four sensor channels, then one column per visible
//! trigger. Missing values are empty cells; trigger cells hold `1`/`0`.

use chrono::TimeZone;
use std::io::Write;

use crate::error::AppResult;
use crate::history::sample::SensorChannel;
use crate::history::window::DaySlice;

/// Write `slice` as CSV, timestamps in `tz` as RFC 3339.
///
/// # Errors
///
/// Returns `AppError::Csv` or `AppError::Io` if writing fails.
pub fn write_csv<W, Tz>(writer: W, slice: &DaySlice, tz: &Tz) -> AppResult<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = vec!["time"];
    header.extend(SensorChannel::ALL.iter().map(|c| c.key()));
    header.extend(slice.triggers.iter().map(|t| t.name.as_str()));
    csv_writer.write_record(&header)?;

    for (row, sample) in slice.samples.iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(sample.timestamp.with_timezone(tz).to_rfc3339());
        for channel in SensorChannel::ALL {
            record.push(sample.channel(channel).map(|v| v.to_string()).unwrap_or_default());
        }
        for trigger in &slice.triggers {
            let cell = match trigger.points.get(row).copied().flatten() {
                Some(v) if v > 0 => "1",
                Some(_) => "0",
                None => "",
            };
            record.push(cell.to_string());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
