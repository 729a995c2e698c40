//! Historical day view: calendar, range resolution, retrieval and slicing.

pub mod align;
pub mod calendar;
pub mod day_range;
pub mod fetcher;
pub mod sample;
pub mod window;

pub use align::{TriggerColors, TriggerSeries, align_triggers};
pub use calendar::{Calendar, CalendarDayMeta, CalendarMonth};
pub use day_range::DayRange;
pub use fetcher::{HistorySource, decode_history, normalize};
pub use sample::{DayData, SensorChannel, SensorSample, TriggerLog, parse_instant};
pub use window::{DaySlice, HourWindow, filter_day};
