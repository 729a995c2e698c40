use reqwest::Client;
use std::time::Duration;

use crate::api::models::AvailableDatesResponse;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::history::calendar::CalendarMonth;
use crate::history::day_range::DayRange;
use crate::history::fetcher::{HistorySource, decode_history};
use crate::history::sample::DayData;

pub struct DashboardClient {
    http_client: Client,
    history_url: String,
    available_dates_url: String,
    excerpt_chars: usize,
}

impl DashboardClient {
    /// # Errors
    ///
    /// Returns `AppError::Fetch` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Fetch {
                status: None,
                excerpt: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http_client,
            history_url: config.endpoint("/api/history"),
            available_dates_url: config.endpoint("/api/available-dates"),
            excerpt_chars: config.body_excerpt_chars,
        })
    }

    /// Get samples and trigger logs for one resolved day.
    ///
    /// # Errors
    ///
    /// - `AppError::Fetch` on transport failure, error status or non-JSON body.
    /// - `AppError::MalformedResponse` if the JSON lacks required fields.
    /// - `AppError::EmptyRange` if the day has no samples.
    pub async fn get_history(&self, range: &DayRange) -> AppResult<DayData> {
        let (start, end) = range.query_bounds();
        tracing::debug!(start = %start, end = %end, "history_request");

        let request = self
            .http_client
            .get(&self.history_url)
            .query(&[("start", start.as_str()), ("end", end.as_str())]);
        let (status, body) = self.send(request).await?;

        decode_history(status, &body, self.excerpt_chars)
    }

    /// Get the days of `month` that have recorded data.
    ///
    /// # Errors
    ///
    /// - `AppError::Fetch` on transport failure, error status or non-JSON body.
    /// - `AppError::MalformedResponse` if the JSON has no usable `dates` list.
    pub async fn get_available_dates(&self, month: CalendarMonth) -> AppResult<Vec<u32>> {
        let request = self.http_client.get(&self.available_dates_url).query(&[
            ("year", month.year().to_string()),
            ("month", month.month().to_string()),
        ]);
        let (status, body) = self.send(request).await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| AppError::fetch(Some(status), &body, self.excerpt_chars))?;

        let parsed: AvailableDatesResponse = serde_json::from_value(value).map_err(|e| {
            tracing::warn!(
                error = %e,
                body_preview = %crate::error::excerpt(&body, self.excerpt_chars),
                "available_dates_malformed"
            );
            AppError::MalformedResponse(e.to_string())
        })?;

        Ok(parsed.dates)
    }

    /// Send a request and return status plus body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<(u16, String)> {
        let response = request.send().await.map_err(|e| AppError::Fetch {
            status: e.status().map(|s| s.as_u16()),
            excerpt: format!("Request failed: {e}"),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AppError::Fetch {
            status: Some(status.as_u16()),
            excerpt: format!("Failed to get response text: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body_preview = %crate::error::excerpt(&body, self.excerpt_chars),
                "backend_error_status"
            );
            return Err(AppError::fetch(Some(status.as_u16()), &body, self.excerpt_chars));
        }

        Ok((status.as_u16(), body))
    }
}

impl HistorySource for DashboardClient {
    fn fetch_day(
        &self,
        range: DayRange,
    ) -> impl std::future::Future<Output = AppResult<DayData>> + Send {
        async move { self.get_history(&range).await }
    }
}
