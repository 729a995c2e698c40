//! Interactive history browser.
//!
//! A single event loop multiplexes terminal commands with fetch
//! completions. Fetches run as spawned tasks and report back over a
//! channel together with the selection they belong to; the view decides
//! whether a result is still wanted.

use chrono::{NaiveDate, TimeZone};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use crate::chart::table::render_table;
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::export::write_csv;
use crate::history::calendar::{Calendar, CalendarMonth};
use crate::history::sample::DayData;
use crate::services::availability;
use crate::view::{Completion, HistoryView, Selection, ViewState};

const HELP: &str = "\
commands:
  day <YYYY-MM-DD | N>   select a date, or day N of the shown month
  next | prev            page the calendar
  cal                    show the calendar
  refresh                reload which days have data
  from <H> | to <H>      move the hour window handles (0-24)
  show | json            print the visible data as a table or chart config
  export <path>          write the visible data as CSV
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Day(NaiveDate),
    DayOfMonth(u32),
    Next,
    Prev,
    Calendar,
    Refresh,
    From(i32),
    To(i32),
    Show,
    Json,
    Export(PathBuf),
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let hour = |arg: Option<&str>| {
            arg.and_then(|a| a.parse::<i32>().ok())
                .ok_or_else(|| format!("'{verb}' needs an hour, e.g. '{verb} 6'"))
        };

        match (verb.as_str(), arg) {
            ("day" | "d", Some(a)) => {
                if let Ok(date) = NaiveDate::from_str(a) {
                    Ok(Self::Day(date))
                } else {
                    a.parse()
                        .map(Self::DayOfMonth)
                        .map_err(|_| format!("not a date or day number: '{a}'"))
                }
            }
            ("day" | "d", None) => Err("'day' needs a date or day number".to_string()),
            ("next" | "n", _) => Ok(Self::Next),
            ("prev" | "p", _) => Ok(Self::Prev),
            ("cal" | "calendar", _) => Ok(Self::Calendar),
            ("refresh", _) => Ok(Self::Refresh),
            ("from", a) => hour(a).map(Self::From),
            ("to", a) => hour(a).map(Self::To),
            ("show" | "s", _) => Ok(Self::Show),
            ("json", _) => Ok(Self::Json),
            ("export", Some(a)) => Ok(Self::Export(PathBuf::from(a))),
            ("export", None) => Err("'export' needs a file path".to_string()),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "q" | "exit", _) => Ok(Self::Quit),
            ("", _) => Err(String::new()),
            (other, _) => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

enum Event {
    History(Selection, AppResult<DayData>),
    Availability(CalendarMonth, AppResult<Arc<Vec<u32>>>),
}

/// One-paragraph summary of the view's state.
pub fn describe<Tz>(view: &HistoryView<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match view.state() {
        ViewState::Idle => "No day selected.".to_string(),
        ViewState::Loading { date } => format!("Loading {date}..."),
        ViewState::Loaded { date } => {
            let slice = view.slice();
            let triggers: Vec<&str> = slice.triggers.iter().map(|t| t.name.as_str()).collect();
            format!(
                "{date} [{}]: {} samples, triggers: {}",
                view.window(),
                slice.samples.len(),
                if triggers.is_empty() {
                    "none".to_string()
                } else {
                    triggers.join(", ")
                }
            )
        }
        ViewState::Empty { date, message } | ViewState::Error { date, message } => {
            format!("{date}: {message}")
        }
    }
}

/// Run the browser until `quit` or end of input.
///
/// # Errors
///
/// Returns `AppError::Io` if reading the terminal fails.
pub async fn run<Tz>(state: AppState, tz: Tz, start_month: CalendarMonth) -> AppResult<()>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut view = HistoryView::new(tz);
    let mut calendar = Calendar::new(start_month);

    println!("{HELP}");
    spawn_availability(&state, &tx, calendar.month());

    loop {
        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else { break };
                match line?.parse::<BrowseCommand>() {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(command) => handle_command(command, &state, &tx, &mut view, &mut calendar).await,
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(event) = rx.recv() => match event {
                Event::History(selection, result) => {
                    if view.complete(&selection, result) == Completion::Applied {
                        println!("{}", describe(&view));
                        if matches!(view.state(), ViewState::Loaded { .. }) {
                            print!("{}", render_table(view.chart()));
                        }
                    }
                }
                Event::Availability(month, Ok(days)) => {
                    if calendar.set_available(month, &days) {
                        print!("{}", calendar.render_grid());
                    }
                }
                Event::Availability(month, Err(e)) => {
                    tracing::warn!(%month, error = %e, "availability_lookup_failed");
                }
            }
        }
    }

    tracing::info!("Browser closed");
    Ok(())
}

async fn handle_command<Tz>(
    command: BrowseCommand,
    state: &AppState,
    tx: &mpsc::UnboundedSender<Event>,
    view: &mut HistoryView<Tz>,
    calendar: &mut Calendar,
) where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match command {
        BrowseCommand::Day(date) => {
            let shown = calendar.month();
            calendar.select_date(date);
            if calendar.month() != shown {
                spawn_availability(state, tx, calendar.month());
            }
            spawn_history(state, tx, view.begin(date));
            println!("{}", describe(view));
        }
        BrowseCommand::DayOfMonth(day) => match calendar.select(day) {
            Ok(date) => {
                spawn_history(state, tx, view.begin(date));
                println!("{}", describe(view));
            }
            Err(e) => println!("{e}"),
        },
        BrowseCommand::Next => {
            let month = calendar.show_next();
            print!("{}", calendar.render_grid());
            spawn_availability(state, tx, month);
        }
        BrowseCommand::Prev => {
            let month = calendar.show_prev();
            print!("{}", calendar.render_grid());
            spawn_availability(state, tx, month);
        }
        BrowseCommand::Calendar => print!("{}", calendar.render_grid()),
        BrowseCommand::Refresh => {
            availability::invalidate(state, calendar.month()).await;
            spawn_availability(state, tx, calendar.month());
        }
        BrowseCommand::From(hour) => {
            view.set_window_start(hour);
            print_view(view);
        }
        BrowseCommand::To(hour) => {
            view.set_window_end(hour);
            print_view(view);
        }
        BrowseCommand::Show => print_view(view),
        BrowseCommand::Json => {
            match serde_json::to_string_pretty(&view.chart().to_chartjs()) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("Failed to serialize chart: {e}"),
            }
        }
        BrowseCommand::Export(path) => {
            if !matches!(view.state(), ViewState::Loaded { .. }) {
                println!("Nothing to export: {}", describe(view));
                return;
            }
            let written = File::create(&path)
                .map_err(AppError::from)
                .and_then(|file| write_csv(BufWriter::new(file), view.slice(), view.timezone()));
            match written {
                Ok(()) => println!(
                    "Wrote {} rows to {}",
                    view.slice().samples.len(),
                    path.display()
                ),
                Err(e) => println!("Export failed: {e}"),
            }
        }
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => {}
    }
}

fn print_view<Tz>(view: &HistoryView<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    println!("{}", describe(view));
    if matches!(view.state(), ViewState::Loaded { .. }) {
        print!("{}", render_table(view.chart()));
    }
}

fn spawn_history(state: &AppState, tx: &mpsc::UnboundedSender<Event>, selection: Selection) {
    let client = Arc::clone(&state.client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_history(&selection.range).await;
        // Receiver only goes away when the browser exits.
        let _ = tx.send(Event::History(selection, result));
    });
}

fn spawn_availability(state: &AppState, tx: &mpsc::UnboundedSender<Event>, month: CalendarMonth) {
    let state = state.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = availability::available_days(&state, month).await;
        let _ = tx.send(Event::Availability(month, result));
    });
}
