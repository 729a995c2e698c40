use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::api::DashboardClient;
use crate::config::Config;
use crate::history::calendar::CalendarMonth;

/// Days with data per month. Entries expire so newly recorded days show up.
pub type AvailabilityCache = Cache<CalendarMonth, Arc<Vec<u32>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<DashboardClient>,
    pub availability: AvailabilityCache,
}

impl AppState {
    pub fn new(config: Config, client: DashboardClient) -> Self {
        let availability: AvailabilityCache = Cache::builder()
            .max_capacity(config.calendar_cache_capacity)
            .time_to_live(Duration::from_secs(config.calendar_cache_ttl_seconds))
            .build();

        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            availability,
        }
    }
}
