//! Test fixtures: a recording [`DriftApi`] fake and event builders.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use risksignal_client::{ApiError, DriftApi, TimelineParams};
use risksignal_types::{
    AssetHistoryResponse, AssetHistorySummary, AssetType, AssetTypeCounts, ChangeType,
    DriftStatsResponse, EventDiff, HealthResponse, Severity, TimelineEvent, TimelineResponse,
};

pub fn event(id: &str, severity: Severity, asset_type: AssetType) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 10, 16, 9, 15, 0).unwrap(),
        severity,
        change_type: ChangeType::AssetModified,
        asset_type,
        summary: format!("{id} changed"),
        path: format!("/static/{id}.js"),
        impact: "Bundle contents changed".to_string(),
        confidence: 0.9,
        security_implication: None,
        diff: Some(EventDiff::new("a", "b")),
        details: None,
    }
}

pub fn stats(total: u64, critical: u64, risk: u64) -> DriftStatsResponse {
    DriftStatsResponse {
        total_drifts: total,
        critical_count: critical,
        risk_count: risk,
        time_range_days: 30,
        by_asset_type: AssetTypeCounts::default(),
        most_changed_assets: Vec::new(),
    }
}

pub fn history(path: &str, events: Vec<TimelineEvent>) -> AssetHistoryResponse {
    AssetHistoryResponse {
        asset_path: path.to_string(),
        time_range_days: 30,
        summary: AssetHistorySummary {
            total_changes: events.len() as u64,
            critical_changes: 0,
            risk_changes: 0,
            first_seen: None,
            last_seen: None,
            most_common_action: None,
        },
        history: events,
    }
}

fn fail((status, status_text): &(u16, String)) -> ApiError {
    ApiError::Status { status: *status, status_text: status_text.clone() }
}

#[derive(Default)]
struct State {
    timeline: Option<TimelineResponse>,
    timeline_error: Option<(u16, String)>,
    page_error: Option<(u16, String)>,
    stats: Option<DriftStatsResponse>,
    stats_error: Option<(u16, String)>,
    history: Option<AssetHistoryResponse>,
    timeline_calls: Vec<(Option<String>, TimelineParams)>,
    stats_calls: Vec<(String, u32)>,
    global_stats_calls: Vec<u32>,
    history_calls: Vec<(String, String, u32)>,
}

/// Answers from canned data and records every call.
///
/// Canned failures come back as [`ApiError::Status`].
#[derive(Default)]
pub struct RecordingApi {
    state: Mutex<State>,
}

impl RecordingApi {
    pub fn set_timeline(&self, events: Vec<TimelineEvent>, next_cursor: Option<&str>) {
        let total_returned = events.len() as u64;
        self.state.lock().timeline = Some(TimelineResponse {
            events,
            next_cursor: next_cursor.map(str::to_string),
            total_returned,
        });
    }

    pub fn fail_timeline(&self, status: u16, status_text: &str) {
        self.state.lock().timeline_error = Some((status, status_text.to_string()));
    }

    /// Fail only follow-up pages (requests carrying a cursor).
    pub fn fail_pages(&self, status: u16, status_text: &str) {
        self.state.lock().page_error = Some((status, status_text.to_string()));
    }

    pub fn set_stats(&self, stats: DriftStatsResponse) {
        self.state.lock().stats = Some(stats);
    }

    pub fn fail_stats(&self, status: u16, status_text: &str) {
        self.state.lock().stats_error = Some((status, status_text.to_string()));
    }

    pub fn set_history(&self, history: AssetHistoryResponse) {
        self.state.lock().history = Some(history);
    }

    pub fn timeline_calls(&self) -> Vec<(Option<String>, TimelineParams)> {
        self.state.lock().timeline_calls.clone()
    }

    pub fn stats_calls(&self) -> Vec<(String, u32)> {
        self.state.lock().stats_calls.clone()
    }

    pub fn global_stats_calls(&self) -> Vec<u32> {
        self.state.lock().global_stats_calls.clone()
    }

    pub fn history_calls(&self) -> Vec<(String, String, u32)> {
        self.state.lock().history_calls.clone()
    }
}

#[async_trait]
impl DriftApi for RecordingApi {
    async fn get_timeline(
        &self,
        domain: Option<&str>,
        params: &TimelineParams,
    ) -> Result<TimelineResponse, ApiError> {
        let mut state = self.state.lock();
        state.timeline_calls.push((domain.map(str::to_string), params.clone()));
        if let Some(error) = &state.timeline_error {
            return Err(fail(error));
        }
        if let Some(error) = state.page_error.as_ref().filter(|_| params.cursor.is_some()) {
            return Err(fail(error));
        }
        Ok(state.timeline.clone().unwrap_or(TimelineResponse {
            events: Vec::new(),
            next_cursor: None,
            total_returned: 0,
        }))
    }

    async fn get_stats(&self, domain: &str, days: u32) -> Result<DriftStatsResponse, ApiError> {
        let mut state = self.state.lock();
        state.stats_calls.push((domain.to_string(), days));
        if let Some(error) = &state.stats_error {
            return Err(fail(error));
        }
        Ok(state.stats.clone().unwrap_or_else(|| stats(0, 0, 0)))
    }

    async fn get_asset_history(
        &self,
        domain: &str,
        path: &str,
        days: u32,
    ) -> Result<AssetHistoryResponse, ApiError> {
        let mut state = self.state.lock();
        state.history_calls.push((domain.to_string(), path.to_string(), days));
        Ok(state.history.clone().unwrap_or_else(|| history(path, Vec::new())))
    }

    async fn get_global_stats(&self, days: u32) -> Result<DriftStatsResponse, ApiError> {
        let mut state = self.state.lock();
        state.global_stats_calls.push(days);
        if let Some(error) = &state.stats_error {
            return Err(fail(error));
        }
        Ok(state.stats.clone().unwrap_or_else(|| stats(0, 0, 0)))
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse { status: "ok".to_string() })
    }
}
