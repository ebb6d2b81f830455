//! reqwest-backed implementation of [`DriftApi`].

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info_span, warn, Instrument, Span};

use risksignal_types::{AssetHistoryResponse, DriftStatsResponse, HealthResponse, TimelineResponse};

use crate::api::{DriftApi, TimelineParams};
use crate::constants::{
    ASSET_HISTORY_PATH, DEFAULT_BASE_URL, HEALTH_PATH, STATS_PATH, TIMELINE_PATH, USER_AGENT,
};

/// Errors from a Drift Engine call.
///
/// Callers surface these uniformly through their `Display` message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API Error: {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    Url(String),
}

/// Build `base + endpoint`, appending every parameter that has a non-empty value.
pub fn build_url(
    base: &str,
    endpoint: &str,
    params: &[(&str, Option<String>)],
) -> Result<Url, ApiError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&joined).map_err(|e| ApiError::Url(format!("{joined}: {e}")))?;

    let present: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(k, v)| match v.as_deref() {
            Some(v) if !v.is_empty() => Some((*k, v)),
            _ => None,
        })
        .collect();

    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    Ok(url)
}

/// HTTP client for the Drift Engine.
#[derive(Clone, Debug)]
pub struct DriftClient {
    client: Client,
    base_url: String,
}

impl Default for DriftClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl DriftClient {
    /// Create a client against `base_url` (scheme + host, optional path prefix).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build HTTP client with custom user agent, using default client");
                Client::new()
            });

        Self { client, base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` inside the operation's `span` and decode the JSON body.
    /// The outgoing trace headers belong to `span`.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        span: Span,
        endpoint: &'static str,
        params: &[(&str, Option<String>)],
    ) -> Result<T, ApiError> {
        let url = build_url(&self.base_url, endpoint, params)?;
        span.record("url", url.as_str());

        async move {
            let started = Instant::now();
            let mut request = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .header(reqwest::header::CONTENT_TYPE, "application/json");
            for (name, value) in risksignal_telemetry::trace_headers() {
                request = request.header(name, value);
            }

            let response = request.send().await?;
            let status = response.status();
            debug!(status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "response");

            if !status.is_success() {
                warn!(status = status.as_u16(), "Drift Engine returned an error status");
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
                });
            }

            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl DriftApi for DriftClient {
    async fn get_timeline(
        &self,
        domain: Option<&str>,
        params: &TimelineParams,
    ) -> Result<TimelineResponse, ApiError> {
        let span = info_span!("drift.get_timeline", domain, url = tracing::field::Empty);
        self.fetch_json(span, TIMELINE_PATH, &params.query_pairs(domain)).await
    }

    async fn get_stats(&self, domain: &str, days: u32) -> Result<DriftStatsResponse, ApiError> {
        let span = info_span!("drift.get_stats", domain, days, url = tracing::field::Empty);
        self.fetch_json(
            span,
            STATS_PATH,
            &[("domain", Some(domain.to_owned())), ("days", Some(days.to_string()))],
        )
        .await
    }

    async fn get_asset_history(
        &self,
        domain: &str,
        path: &str,
        days: u32,
    ) -> Result<AssetHistoryResponse, ApiError> {
        let span =
            info_span!("drift.get_asset_history", domain, path, days, url = tracing::field::Empty);
        self.fetch_json(
            span,
            ASSET_HISTORY_PATH,
            &[
                ("domain", Some(domain.to_owned())),
                ("path", Some(path.to_owned())),
                ("days", Some(days.to_string())),
            ],
        )
        .await
    }

    async fn get_global_stats(&self, days: u32) -> Result<DriftStatsResponse, ApiError> {
        let span = info_span!("drift.get_global_stats", days, url = tracing::field::Empty);
        self.fetch_json(span, STATS_PATH, &[("days", Some(days.to_string()))]).await
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let span = info_span!("drift.check_health", url = tracing::field::Empty);
        self.fetch_json(span, HEALTH_PATH, &[]).await
    }
}
