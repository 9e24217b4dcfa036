//! Click analytics against the `/analytics/*` endpoints

use shortly_protocol::{DashboardSummary, PublicStats, StatBucket, TimeseriesPoint, TopLink};

use crate::client::ApiClient;
use crate::error::Result;

/// Analytics service for CLI commands and embedders
#[derive(Debug, Default)]
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Account-level summary over the trailing `days`
    pub async fn dashboard(&self, client: &ApiClient, days: u32) -> Result<DashboardSummary> {
        client
            .get(&format!("/analytics/dashboard?days={}", days))
            .await
    }

    /// Daily click counts over the trailing `days`
    pub async fn timeseries(&self, client: &ApiClient, days: u32) -> Result<Vec<TimeseriesPoint>> {
        client
            .get(&format!("/analytics/timeseries?days={}", days))
            .await
    }

    /// Most-clicked links, best first
    pub async fn top_links(&self, client: &ApiClient, limit: u32) -> Result<Vec<TopLink>> {
        client
            .get(&format!("/analytics/top-links?limit={}", limit))
            .await
    }

    /// Clicks broken down by device class
    pub async fn devices(&self, client: &ApiClient) -> Result<Vec<StatBucket>> {
        client.get("/analytics/devices").await
    }

    /// Clicks broken down by country
    pub async fn locations(&self, client: &ApiClient) -> Result<Vec<StatBucket>> {
        client.get("/analytics/locations").await
    }

    /// Public counters for one short code, no session required
    pub async fn public_stats(&self, client: &ApiClient, code: &str) -> Result<PublicStats> {
        client.get(&format!("/analytics/public/{}", code)).await
    }
}
