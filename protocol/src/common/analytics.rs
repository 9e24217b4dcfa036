//! Analytics aggregates returned by the `/analytics/*` endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account-level summary for the dashboard, `GET /analytics/dashboard`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clicks: u64,
    pub total_links: u64,
    pub clicks_in_period: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_link: Option<TopLink>,
}

/// One point of the clicks-over-time series, `GET /analytics/timeseries`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesPoint {
    /// Calendar day the bucket covers, `YYYY-MM-DD`
    pub date: String,
    pub clicks: u64,
}

/// Entry of the `GET /analytics/top-links` ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLink {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Labeled bucket used by the devices and locations breakdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBucket {
    pub label: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Publicly visible stats for a single short code, `GET /analytics/public/{code}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStats {
    pub all_time: ClickTotals,
    pub last_click_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Total and unique click counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickTotals {
    pub total_clicks: u64,
    pub unique_clicks: u64,
}
