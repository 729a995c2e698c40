use crate::history::sample::SensorChannel;

/// Trigger colors, handed out in discovery order and cycled.
pub const TRIGGER_PALETTE: [&str; 8] = [
    "#6f42c1", "#fd7e14", "#20c997", "#e83e8c", "#17a2b8", "#6610f2", "#795548", "#343a40",
];

#[must_use]
pub fn trigger_color(index: usize) -> &'static str {
    TRIGGER_PALETTE[index % TRIGGER_PALETTE.len()]
}

#[must_use]
pub fn channel_color(channel: SensorChannel) -> &'static str {
    match channel {
        SensorChannel::Temperature => "#dc3545",
        SensorChannel::Humidity => "#0d6efd",
        SensorChannel::SoilMoistureA => "#28a745",
        SensorChannel::SoilMoistureB => "#ffc107",
    }
}

/// Translucent fill matching a `#rrggbb` stroke color.
#[must_use]
pub fn fill_color(hex: &str, alpha: f32) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(0)
    };
    format!(
        "rgba({}, {}, {}, {alpha})",
        channel(1..3),
        channel(3..5),
        channel(5..7)
    )
}
