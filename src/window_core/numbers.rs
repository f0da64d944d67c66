//! Request handling for the number windows

use super::category::Category;
use super::store::{average_of, WindowStore};
use crate::error::{AggregatorResult, FetchError};
use crate::source::records::fetch_numbers;
use crate::source::Fetcher;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumbersResponse {
    pub window_prev_state: Vec<i64>,
    pub window_curr_state: Vec<i64>,
    /// Raw numbers returned by the upstream for this request
    pub numbers: Vec<i64>,
    pub avg: f64,
}

/// Fetches numbers for a category and folds them into the shared windows
///
/// Upstream failures and timeouts never fail the request; they count as
/// "no new numbers" and the current window is reported unchanged.
pub struct NumberAggregator {
    store: Arc<WindowStore>,
    fetcher: Arc<dyn Fetcher>,
    fetch_timeout: Duration,
}

impl NumberAggregator {
    pub fn new(store: Arc<WindowStore>, fetcher: Arc<dyn Fetcher>, fetch_timeout: Duration) -> Self {
        Self {
            store,
            fetcher,
            fetch_timeout,
        }
    }

    /// Handle a request for a category code (`p`, `f`, `e` or `r`)
    pub async fn handle(&self, code: &str) -> AggregatorResult<NumbersResponse> {
        let category: Category = code.parse()?;
        Ok(self.handle_category(category).await)
    }

    pub async fn handle_category(&self, category: Category) -> NumbersResponse {
        let numbers = self.fetch_or_empty(category).await;
        let update = self.store.merge_with_snapshots(category, &numbers);

        log::debug!(
            "🔢 {} window: {} fetched, {} → {} values",
            category,
            numbers.len(),
            update.previous.len(),
            update.current.len()
        );

        NumbersResponse {
            avg: average_of(&update.current),
            window_prev_state: update.previous,
            window_curr_state: update.current,
            numbers,
        }
    }

    async fn fetch_or_empty(&self, category: Category) -> Vec<i64> {
        let resource = category.resource();
        let fetch = fetch_numbers(self.fetcher.as_ref(), resource);

        let result = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                resource: resource.to_string(),
                timeout_ms: u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        result.unwrap_or_else(|e| {
            log::warn!("⚠️  Error fetching {} numbers: {}", resource, e);
            Vec::new()
        })
    }
}
