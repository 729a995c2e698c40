//! History view state machine tests.
//!
//! Run with: cargo test --test view_test

mod common;

use std::future::Future;
use std::sync::Mutex;

use chrono::Utc;

use autofarm_history::error::{AppError, AppResult, NO_DATA_MESSAGE};
use autofarm_history::history::{DayData, DayRange, HistorySource, HourWindow, TriggerLog};
use autofarm_history::view::{Completion, HistoryView, ViewState};
use common::{date, hours_west, sample, utc};

/// Replies with whatever `reply` builds and records the ranges it was asked for.
struct Canned<F> {
    reply: F,
    requested: Mutex<Vec<DayRange>>,
}

impl<F> Canned<F>
where
    F: Fn() -> AppResult<DayData> + Sync,
{
    fn new(reply: F) -> Self {
        Self {
            reply,
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl<F> HistorySource for Canned<F>
where
    F: Fn() -> AppResult<DayData> + Sync,
{
    fn fetch_day(&self, range: DayRange) -> impl Future<Output = AppResult<DayData>> + Send {
        self.requested.lock().unwrap().push(range);
        let result = (self.reply)();
        async move { result }
    }
}

fn june_first() -> DayData {
    let mut log = TriggerLog::new();
    log.insert(utc(2024, 6, 1, 17, 0, 0), "fan", true);
    DayData::new(
        vec![
            sample(utc(2024, 6, 1, 13, 0, 0), 70.0),
            sample(utc(2024, 6, 1, 17, 0, 0), 75.0),
            sample(utc(2024, 6, 1, 23, 0, 0), 72.0),
        ],
        log,
    )
}

fn june_second() -> DayData {
    DayData::new(
        vec![sample(utc(2024, 6, 2, 15, 0, 0), 68.0)],
        TriggerLog::new(),
    )
}

#[tokio::test]
async fn load_fetches_the_local_day_and_renders_it() {
    let source = Canned::new(|| Ok(june_first()));
    let mut view = HistoryView::new(hours_west(5));

    assert_eq!(view.state(), &ViewState::Idle);
    let outcome = view.load(&source, date(2024, 6, 1)).await;

    assert_eq!(outcome, Completion::Applied);
    assert_eq!(
        view.state(),
        &ViewState::Loaded {
            date: date(2024, 6, 1)
        }
    );
    let requested = source.requested.lock().unwrap();
    assert_eq!(requested.len(), 1);
    assert_eq!(requested[0].start_utc, utc(2024, 6, 1, 5, 0, 0));
    assert_eq!(requested[0].end_utc, utc(2024, 6, 2, 4, 59, 59));

    assert_eq!(view.chart().labels().len(), 3);
    assert_eq!(view.chart().trigger_datasets().len(), 1);
    assert!(view.pending().is_none());
}

#[tokio::test]
async fn empty_day_shows_no_data_and_clears_chart() {
    let mut view = HistoryView::new(Utc);
    view.load(&Canned::new(|| Ok(june_second())), date(2024, 6, 2))
        .await;
    assert!(!view.chart().is_empty());

    let empty = Canned::new(|| Err(AppError::EmptyRange));
    view.load(&empty, date(2024, 6, 3)).await;

    assert_eq!(
        view.state(),
        &ViewState::Empty {
            date: date(2024, 6, 3),
            message: NO_DATA_MESSAGE.to_string(),
        }
    );
    assert!(view.chart().is_empty());
    assert!(view.chart().trigger_datasets().is_empty());
    assert!(view.day_data().is_none());
}

#[tokio::test]
async fn ok_with_no_samples_is_treated_as_empty() {
    let mut view = HistoryView::new(Utc);
    view.load(&Canned::new(|| Ok(DayData::default())), date(2024, 6, 3))
        .await;
    assert_eq!(view.state().message(), Some(NO_DATA_MESSAGE));
    assert!(matches!(view.state(), ViewState::Empty { .. }));
}

#[tokio::test]
async fn malformed_response_renders_as_empty() {
    let mut view = HistoryView::new(Utc);
    let source = Canned::new(|| Err(AppError::MalformedResponse("missing field".into())));
    view.load(&source, date(2024, 6, 3)).await;
    assert!(matches!(view.state(), ViewState::Empty { .. }));
    assert_eq!(view.state().message(), Some(NO_DATA_MESSAGE));
}

#[tokio::test]
async fn fetch_failure_is_an_error_with_no_data_text() {
    let mut view = HistoryView::new(Utc);
    view.load(&Canned::new(|| Ok(june_second())), date(2024, 6, 2))
        .await;

    let failing = Canned::new(|| {
        Err(AppError::Fetch {
            status: Some(500),
            excerpt: "boom".into(),
        })
    });
    view.load(&failing, date(2024, 6, 4)).await;

    assert_eq!(
        view.state(),
        &ViewState::Error {
            date: date(2024, 6, 4),
            message: NO_DATA_MESSAGE.to_string(),
        }
    );
    assert!(view.chart().is_empty());
}

#[test]
fn late_reply_for_superseded_selection_is_discarded() {
    let mut view = HistoryView::new(Utc);
    let first = view.begin(date(2024, 6, 1));
    let second = view.begin(date(2024, 6, 2));
    assert!(second.ticket > first.ticket);

    assert_eq!(view.complete(&second, Ok(june_second())), Completion::Applied);
    assert_eq!(view.complete(&first, Ok(june_first())), Completion::Stale);

    assert_eq!(
        view.state(),
        &ViewState::Loaded {
            date: date(2024, 6, 2)
        }
    );
    assert_eq!(view.day_data(), Some(&june_second()));
    assert_eq!(view.chart().labels(), ["15:00:00"]);
}

#[test]
fn early_reply_for_superseded_selection_is_discarded() {
    let mut view = HistoryView::new(Utc);
    let first = view.begin(date(2024, 6, 1));
    let second = view.begin(date(2024, 6, 2));

    assert_eq!(view.complete(&first, Ok(june_first())), Completion::Stale);
    assert_eq!(
        view.state(),
        &ViewState::Loading {
            date: date(2024, 6, 2)
        }
    );
    assert!(view.chart().is_empty());

    assert_eq!(
        view.complete(&second, Err(AppError::EmptyRange)),
        Completion::Applied
    );
    assert!(matches!(view.state(), ViewState::Empty { .. }));
}

#[test]
fn a_result_is_applied_at_most_once() {
    let mut view = HistoryView::new(Utc);
    let selection = view.begin(date(2024, 6, 2));
    assert_eq!(view.complete(&selection, Ok(june_second())), Completion::Applied);
    assert_eq!(
        view.complete(&selection, Err(AppError::EmptyRange)),
        Completion::Stale
    );
    assert!(matches!(view.state(), ViewState::Loaded { .. }));
}

#[test]
fn window_changes_reslice_without_refetching() {
    let mut view = HistoryView::new(hours_west(5));
    let selection = view.begin(date(2024, 6, 1));
    view.complete(&selection, Ok(june_first()));

    let window = view.set_window(HourWindow::new(6, 14).unwrap());
    assert_eq!((window.start_hour(), window.end_hour()), (6, 14));
    assert_eq!(view.slice().samples.len(), 2);
    assert_eq!(view.chart().labels(), ["08:00:00", "12:00:00"]);
    assert_eq!(view.chart().trigger_datasets()[0].values, vec![None, Some(100)]);
    // the full day stays in memory
    assert_eq!(view.day_data().map(|d| d.samples.len()), Some(3));

    view.set_window_end(24);
    view.set_window_start(15);
    assert_eq!(view.window(), HourWindow::new(15, 24).unwrap());
    assert_eq!(view.chart().labels(), ["18:00:00"]);
    assert!(view.chart().trigger_datasets().is_empty());
}

#[test]
fn new_selection_resets_the_window() {
    let mut view = HistoryView::new(Utc);
    let selection = view.begin(date(2024, 6, 1));
    view.complete(&selection, Ok(june_first()));
    view.set_window_end(12);
    assert_ne!(view.window(), HourWindow::FULL_DAY);

    view.begin(date(2024, 6, 2));
    assert_eq!(view.window(), HourWindow::FULL_DAY);
    assert!(view.slice().samples.is_empty());
}

#[test]
fn window_moves_before_any_day_only_track_the_slider() {
    let mut view = HistoryView::new(Utc);
    let window = view.set_window_end(3);
    assert_eq!(window, HourWindow::new(0, 3).unwrap());
    assert!(view.chart().is_empty());
    assert_eq!(view.state(), &ViewState::Idle);
}
