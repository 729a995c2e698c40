/// Message shown for every failed day selection.
pub const NO_DATA_MESSAGE: &str = "No data recorded for this day";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Transport failure, non-success status, or a body that is not JSON.
    #[error("Fetch failed ({}): {excerpt}", status_label(.status))]
    Fetch {
        status: Option<u16>,
        excerpt: String,
    },

    #[error("No samples in the requested range")]
    EmptyRange,

    /// JSON was returned but required fields are missing.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// Build a `Fetch` error, keeping at most `max_chars` of the body.
    #[must_use]
    pub fn fetch(status: Option<u16>, body: &str, max_chars: usize) -> Self {
        Self::Fetch {
            status,
            excerpt: excerpt(body, max_chars),
        }
    }

    /// Whether this error belongs to a day selection (and so renders as "no data").
    #[must_use]
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::EmptyRange | Self::MalformedResponse(_)
        )
    }

    /// Text shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch { .. } | Self::EmptyRange | Self::MalformedResponse(_) => {
                NO_DATA_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "no response".to_string(),
    }
}

/// First `max_chars` characters of `body`, with a marker when cut.
#[must_use]
pub fn excerpt(body: &str, max_chars: usize) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

pub type AppResult<T> = Result<T, AppError>;
