//! Interactive command parsing tests.
//!
//! Run with: cargo test --test browse_command_test

mod common;

use std::path::PathBuf;

use autofarm_history::browse::{BrowseCommand, describe};
use autofarm_history::error::NO_DATA_MESSAGE;
use autofarm_history::error::AppError;
use autofarm_history::view::HistoryView;
use chrono::Utc;
use common::date;

fn parse(line: &str) -> Result<BrowseCommand, String> {
    line.parse()
}

#[test]
fn day_accepts_dates_and_day_numbers() {
    assert_eq!(parse("day 2024-06-01"), Ok(BrowseCommand::Day(date(2024, 6, 1))));
    assert_eq!(parse("d 17"), Ok(BrowseCommand::DayOfMonth(17)));
    assert!(parse("day yesterday").is_err());
    assert!(parse("day").is_err());
}

#[test]
fn hour_handles_need_a_number() {
    assert_eq!(parse("from 6"), Ok(BrowseCommand::From(6)));
    assert_eq!(parse("to 24"), Ok(BrowseCommand::To(24)));
    assert_eq!(parse("FROM -3"), Ok(BrowseCommand::From(-3)));
    assert!(parse("to noon").is_err());
    assert!(parse("from").is_err());
}

#[test]
fn simple_verbs_and_aliases() {
    assert_eq!(parse("next"), Ok(BrowseCommand::Next));
    assert_eq!(parse("p"), Ok(BrowseCommand::Prev));
    assert_eq!(parse("  cal  "), Ok(BrowseCommand::Calendar));
    assert_eq!(parse("s"), Ok(BrowseCommand::Show));
    assert_eq!(parse("json"), Ok(BrowseCommand::Json));
    assert_eq!(parse("q"), Ok(BrowseCommand::Quit));
    assert_eq!(
        parse("export out/day.csv"),
        Ok(BrowseCommand::Export(PathBuf::from("out/day.csv")))
    );
    assert!(parse("export").is_err());
}

#[test]
fn blank_and_unknown_lines_are_errors() {
    assert_eq!(parse("   "), Err(String::new()));
    assert!(parse("dance").unwrap_err().contains("unknown command"));
}

#[test]
fn describe_reports_no_data_for_failed_days() {
    let mut view = HistoryView::new(Utc);
    assert_eq!(describe(&view), "No day selected.");

    let selection = view.begin(date(2024, 6, 1));
    assert_eq!(describe(&view), "Loading 2024-06-01...");

    view.complete(&selection, Err(AppError::EmptyRange));
    assert!(describe(&view).contains(NO_DATA_MESSAGE));
}
