//! The Drift Engine API surface as a trait.
//!
//! [`DriftApi`] is the seam between orchestration code and the network.
//! [`DriftClient`](crate::DriftClient) implements it over HTTP; tests swap in
//! recording fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use risksignal_types::{
    format_date, AssetHistoryResponse, AssetType, DriftStatsResponse, HealthResponse, Severity,
    TimelineFilters, TimelineResponse,
};

use crate::http::ApiError;

/// Optional query parameters for `GET /api/drift/timeline`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelineParams {
    pub severity: Option<Severity>,
    pub asset_type: Option<AssetType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub cursor: Option<String>,
}

impl TimelineParams {
    /// Request parameters for the given filter selection (no cursor).
    pub fn from_filters(filters: &TimelineFilters) -> Self {
        Self {
            severity: filters.severity,
            asset_type: filters.asset_type,
            from: filters.date_range.from,
            to: filters.date_range.to,
            cursor: None,
        }
    }

    /// Same parameters, continuing from `cursor`.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Query pairs in wire order, `domain` first. Absent values stay `None`
    /// and are dropped by the URL builder.
    pub fn query_pairs(&self, domain: Option<&str>) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("domain", domain.map(str::to_owned)),
            ("severity", self.severity.map(|s| s.as_str().to_owned())),
            ("asset_type", self.asset_type.map(|t| t.as_str().to_owned())),
            ("from", self.from.map(format_date)),
            ("to", self.to.map(format_date)),
            ("cursor", self.cursor.clone()),
        ]
    }
}

/// Operations offered by the Drift Engine.
///
/// Every call is a fresh round trip: no retries, no caching.
#[async_trait]
pub trait DriftApi: Send + Sync {
    /// Events for `domain`, or across all monitored domains when `None`.
    async fn get_timeline(
        &self,
        domain: Option<&str>,
        params: &TimelineParams,
    ) -> Result<TimelineResponse, ApiError>;

    /// Summary counters for one domain over the last `days`.
    async fn get_stats(&self, domain: &str, days: u32) -> Result<DriftStatsResponse, ApiError>;

    /// Change history of a single asset.
    async fn get_asset_history(
        &self,
        domain: &str,
        path: &str,
        days: u32,
    ) -> Result<AssetHistoryResponse, ApiError>;

    /// Summary counters aggregated across every monitored domain.
    async fn get_global_stats(&self, days: u32) -> Result<DriftStatsResponse, ApiError>;

    /// Liveness probe.
    async fn check_health(&self) -> Result<HealthResponse, ApiError>;
}
