use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autofarm_history::api::DashboardClient;
use autofarm_history::browse;
use autofarm_history::chart::table::render_table;
use autofarm_history::common::AppState;
use autofarm_history::config::{Config, LogFormat};
use autofarm_history::export::write_csv;
use autofarm_history::history::{Calendar, CalendarMonth};
use autofarm_history::services::availability;
use autofarm_history::view::{HistoryView, ViewState};

#[derive(Debug, Parser)]
#[command(name = "autofarm-history", about = "Browse recorded greenhouse history by day")]
struct Cli {
    /// Backend root.
    #[arg(long, global = true, env = "AUTOFARM_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load one day and print the visible slice.
    Day {
        date: NaiveDate,
        #[arg(long, default_value_t = 0)]
        from: i32,
        #[arg(long, default_value_t = 24)]
        to: i32,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print a month grid marking days with data.
    Calendar {
        /// Month as YYYY-MM, defaults to the current one.
        month: Option<CalendarMonth>,
    },
    /// Interactive browser.
    Browse {
        month: Option<CalendarMonth>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,autofarm_history=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration (fail-fast)
    let config = match cli.base_url {
        Some(url) => Config::from_lookup(|key| {
            if key == "AUTOFARM_BASE_URL" {
                Some(url.clone())
            } else {
                dotenvy::var(key).ok()
            }
        })?,
        None => Config::from_env()?,
    };
    init_tracing(config.log_format);
    tracing::info!(
        deployment = ?config.deployment,
        base_url = %config.base_url,
        "Configuration loaded"
    );

    let client = DashboardClient::new(&config)?;
    let state = AppState::new(config, client);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Day {
            date,
            from,
            to,
            format,
        } => {
            let mut view = HistoryView::new(Local);
            view.load(state.client.as_ref(), date).await;
            view.set_window_start(from);
            view.set_window_end(to);

            if !matches!(view.state(), ViewState::Loaded { .. }) {
                eprintln!("{}", browse::describe(&view));
                return Ok(());
            }
            match format {
                OutputFormat::Table => {
                    eprintln!("{}", browse::describe(&view));
                    print!("{}", render_table(view.chart()));
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&view.chart().to_chartjs())?);
                }
                OutputFormat::Csv => write_csv(std::io::stdout().lock(), view.slice(), &Local)?,
            }
        }
        Command::Calendar { month } => {
            let month = month.unwrap_or_else(|| CalendarMonth::containing(today));
            let mut calendar = Calendar::new(month);
            match availability::available_days(&state, month).await {
                Ok(days) => {
                    calendar.set_available(month, &days);
                }
                Err(e) => tracing::warn!(%month, error = %e, "availability_lookup_failed"),
            }
            print!("{}", calendar.render_grid());
        }
        Command::Browse { month } => {
            let month = month.unwrap_or_else(|| CalendarMonth::containing(today));
            browse::run(state, Local, month).await?;
        }
    }

    Ok(())
}
