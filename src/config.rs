use std::env;

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Dashboard backend
    pub base_url: Url,
    pub request_timeout_seconds: u64,
    pub body_excerpt_chars: usize,

    // Calendar availability cache
    pub calendar_cache_ttl_seconds: u64,
    pub calendar_cache_capacity: u64,

    // Logging
    pub log_format: LogFormat,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `AUTOFARM_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the base URL does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url =
            lookup("AUTOFARM_BASE_URL").unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
        let base_url = Url::parse(raw_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::Invalid("AUTOFARM_BASE_URL", e.to_string()))?;

        Ok(Self {
            base_url,
            request_timeout_seconds: lookup("AUTOFARM_REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            body_excerpt_chars: lookup("AUTOFARM_BODY_EXCERPT_CHARS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),

            calendar_cache_ttl_seconds: lookup("AUTOFARM_CALENDAR_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300), // 5 minutes default
            calendar_cache_capacity: lookup("AUTOFARM_CALENDAR_CACHE_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),

            log_format: LogFormat::from_str(
                &lookup("AUTOFARM_LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            ),

            deployment: Deployment::from_str(
                &lookup("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            ),
        })
    }

    /// Absolute URL for an API path such as `/api/history`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}
