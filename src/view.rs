//! Per-selection controller for the history view.
//!
//! Every day selection gets a ticket from a monotonically increasing
//! counter. A fetch result is only applied if its ticket is still the
//! pending one; anything older is dropped, so the last selection wins even
//! though in-flight requests are never cancelled.
//!
//! ```text
//! Idle ──select──▶ Loading ──ok──────▶ Loaded ◀─┐ window change
//!                     │   ──empty───▶ Empty     │
//!                     │   ──failure─▶ Error     │
//!                     └──────────────────────── ┘
//! ```

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::chart::ChartRenderer;
use crate::error::{AppError, AppResult};
use crate::history::align::TriggerColors;
use crate::history::day_range::DayRange;
use crate::history::fetcher::HistorySource;
use crate::history::sample::DayData;
use crate::history::window::{DaySlice, HourWindow, filter_day};

/// Sequence token of one day selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A started selection, handed to whoever performs the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub ticket: Ticket,
    pub date: NaiveDate,
    pub range: DayRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading { date: NaiveDate },
    Loaded { date: NaiveDate },
    Empty { date: NaiveDate, message: String },
    Error { date: NaiveDate, message: String },
}

impl ViewState {
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Idle => None,
            Self::Loading { date }
            | Self::Loaded { date }
            | Self::Empty { date, .. }
            | Self::Error { date, .. } => Some(*date),
        }
    }

    /// The "no data" text for `Empty`/`Error`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Empty { message, .. } | Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// What happened to a fetch result handed to [`HistoryView::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

struct LoadedDay {
    data: DayData,
    colors: TriggerColors,
}

pub struct HistoryView<Tz: TimeZone> {
    tz: Tz,
    last_ticket: u64,
    pending: Option<Ticket>,
    state: ViewState,
    day: Option<LoadedDay>,
    window: HourWindow,
    slice: DaySlice,
    chart: ChartRenderer,
}

impl<Tz> HistoryView<Tz>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            last_ticket: 0,
            pending: None,
            state: ViewState::Idle,
            day: None,
            window: HourWindow::FULL_DAY,
            slice: DaySlice::default(),
            chart: ChartRenderer::new(),
        }
    }

    /// Start loading `date`. Drops the previous day and invalidates any
    /// fetch still in flight for it.
    pub fn begin(&mut self, date: NaiveDate) -> Selection {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        let range = DayRange::for_date(&self.tz, date);

        if let Some(previous) = self.pending.replace(ticket) {
            tracing::debug!(
                superseded = previous.value(),
                ticket = ticket.value(),
                "selection_superseded"
            );
        }

        self.day = None;
        self.slice = DaySlice::default();
        self.window = HourWindow::FULL_DAY;
        self.chart.clear();
        self.state = ViewState::Loading { date };

        tracing::info!(
            ticket = ticket.value(),
            %date,
            start = %range.start_utc,
            end = %range.end_utc,
            "day_selected"
        );

        Selection {
            ticket,
            date,
            range,
        }
    }

    /// Apply the result of the fetch started by `selection`.
    ///
    /// Results for anything but the pending selection are discarded.
    pub fn complete(&mut self, selection: &Selection, result: AppResult<DayData>) -> Completion {
        if self.pending != Some(selection.ticket) {
            tracing::debug!(
                ticket = selection.ticket.value(),
                date = %selection.date,
                "stale_result_discarded"
            );
            return Completion::Stale;
        }
        self.pending = None;

        let date = selection.date;
        let result = result.and_then(|data| {
            if data.is_empty() {
                Err(AppError::EmptyRange)
            } else {
                Ok(data)
            }
        });

        match result {
            Ok(data) => {
                let colors = TriggerColors::discover(&data.triggers);
                tracing::info!(
                    %date,
                    samples = data.samples.len(),
                    triggers = colors.len(),
                    "day_loaded"
                );
                self.day = Some(LoadedDay { data, colors });
                self.window = HourWindow::FULL_DAY;
                self.state = ViewState::Loaded { date };
                self.refilter();
            }
            Err(error) => {
                self.chart.clear();
                self.day = None;
                self.slice = DaySlice::default();
                let message = error.user_message();
                self.state = match &error {
                    AppError::EmptyRange => {
                        tracing::info!(%date, "day_empty");
                        ViewState::Empty { date, message }
                    }
                    AppError::MalformedResponse(detail) => {
                        tracing::warn!(%date, detail = %detail, "day_malformed_response");
                        ViewState::Empty { date, message }
                    }
                    other => {
                        tracing::warn!(%date, error = %other, "day_fetch_failed");
                        ViewState::Error { date, message }
                    }
                };
            }
        }

        Completion::Applied
    }

    /// Select `date` and fetch it from `source` in one step.
    pub async fn load<S: HistorySource>(&mut self, source: &S, date: NaiveDate) -> Completion {
        let selection = self.begin(date);
        let result = source.fetch_day(selection.range).await;
        self.complete(&selection, result)
    }

    /// Move the slider's start handle.
    pub fn set_window_start(&mut self, hour: i32) -> HourWindow {
        self.set_window(self.window.with_start(hour))
    }

    /// Move the slider's end handle.
    pub fn set_window_end(&mut self, hour: i32) -> HourWindow {
        self.set_window(self.window.with_end(hour))
    }

    /// Replace the window and re-slice the loaded day, if any.
    pub fn set_window(&mut self, window: HourWindow) -> HourWindow {
        if window != self.window {
            self.window = window;
            self.refilter();
        }
        self.window
    }

    fn refilter(&mut self) {
        let Some(day) = &self.day else {
            return;
        };
        self.slice = filter_day(&day.data, &day.colors, self.window, &self.tz);
        self.chart.render(&self.slice, &self.tz);
        tracing::debug!(
            window = %self.window,
            visible = self.slice.samples.len(),
            "window_applied"
        );
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn window(&self) -> HourWindow {
        self.window
    }

    /// The currently visible slice (empty unless `Loaded`).
    #[must_use]
    pub fn slice(&self) -> &DaySlice {
        &self.slice
    }

    #[must_use]
    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    /// The full, unfiltered data of the loaded day.
    #[must_use]
    pub fn day_data(&self) -> Option<&DayData> {
        self.day.as_ref().map(|d| &d.data)
    }

    #[must_use]
    pub fn trigger_colors(&self) -> Option<&TriggerColors> {
        self.day.as_ref().map(|d| &d.colors)
    }

    #[must_use]
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    #[must_use]
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }
}
