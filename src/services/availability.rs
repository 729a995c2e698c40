//! Cached lookups of which calendar days have recorded data.
//!
//! The calendar asks for the same month repeatedly while the user pages
//! back and forth, so answers are kept in the state's moka cache until the
//! configured TTL expires. Only successful lookups are stored; a failed
//! lookup leaves the month undecorated and is retried on the next visit.
//!
//! | Month | Invalidation |
//! |-------|--------------|
//! | Past months | TTL only |
//! | Current month | TTL, or [`invalidate`] after new data is recorded |

use std::sync::Arc;

use crate::common::AppState;
use crate::error::AppResult;
use crate::history::calendar::CalendarMonth;

/// Available days of `month`, from cache or the backend.
///
/// # Errors
///
/// Propagates the client error when the month is not cached and the
/// backend lookup fails.
pub async fn available_days(state: &AppState, month: CalendarMonth) -> AppResult<Arc<Vec<u32>>> {
    if let Some(cached) = get_cached(state, month).await {
        return Ok(cached);
    }

    let mut days = state.client.get_available_dates(month).await?;
    days.sort_unstable();
    days.dedup();

    Ok(store_cached(state, month, days).await)
}

/// Cached days of `month`, if present and not expired.
pub async fn get_cached(state: &AppState, month: CalendarMonth) -> Option<Arc<Vec<u32>>> {
    let cached = state.availability.get(&month).await?;
    tracing::debug!(%month, "availability_cache_hit");
    Some(cached)
}

/// Store the days of `month` and return the shared copy.
pub async fn store_cached(state: &AppState, month: CalendarMonth, days: Vec<u32>) -> Arc<Vec<u32>> {
    let days = Arc::new(days);
    state.availability.insert(month, Arc::clone(&days)).await;
    tracing::debug!(%month, days = days.len(), "availability_cache_stored");
    days
}

/// Drop the cached entry for `month` so the next lookup hits the backend.
pub async fn invalidate(state: &AppState, month: CalendarMonth) {
    state.availability.invalidate(&month).await;
    tracing::debug!(%month, "availability_cache_invalidated");
}
