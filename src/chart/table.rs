use std::fmt::Write as _;

use crate::chart::ChartRenderer;
use crate::history::align::ACTIVE;

const TIME_WIDTH: usize = 8;
const VALUE_WIDTH: usize = 10;

/// Render the chart contents as an aligned text table, one row per label.
#[must_use]
pub fn render_table(chart: &ChartRenderer) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<TIME_WIDTH$}", "time");
    for ds in chart.sensor_datasets() {
        let _ = write!(out, " {:>VALUE_WIDTH$}", ds.channel.key());
    }
    for ds in chart.trigger_datasets() {
        let _ = write!(out, " {:>VALUE_WIDTH$}", truncate(&ds.name, VALUE_WIDTH));
    }
    out.push('\n');

    for (row, label) in chart.labels().iter().enumerate() {
        let _ = write!(out, "{label:<TIME_WIDTH$}");
        for ds in chart.sensor_datasets() {
            let cell = ds
                .values
                .get(row)
                .copied()
                .flatten()
                .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
            let _ = write!(out, " {cell:>VALUE_WIDTH$}");
        }
        for ds in chart.trigger_datasets() {
            let cell = match ds.values.get(row).copied().flatten() {
                Some(ACTIVE) => "on",
                Some(_) => "off",
                None => "-",
            };
            let _ = write!(out, " {cell:>VALUE_WIDTH$}");
        }
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
