//! Summary statistics and per-asset history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::TimelineEvent;
use crate::kind::{AssetType, Severity};

/// Drift counts per asset type. Keys missing from the payload read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTypeCounts {
    #[serde(default)]
    pub js: u64,
    #[serde(default)]
    pub api: u64,
    #[serde(default)]
    pub infrastructure: u64,
    #[serde(default)]
    pub service: u64,
    #[serde(default)]
    pub secret: u64,
}

impl AssetTypeCounts {
    /// Count for one asset type. `Unknown` is never broken out by the engine.
    pub fn get(&self, asset_type: AssetType) -> u64 {
        match asset_type {
            AssetType::Js => self.js,
            AssetType::Api => self.api,
            AssetType::Infrastructure => self.infrastructure,
            AssetType::Service => self.service,
            AssetType::Secret => self.secret,
            AssetType::Unknown => 0,
        }
    }

    /// All reported entries in fixed key order.
    pub fn entries(&self) -> [(AssetType, u64); 5] {
        AssetType::FILTERABLE.map(|t| (t, self.get(t)))
    }

    /// Entries with a non-zero count, in key order.
    pub fn nonzero(&self) -> Vec<(AssetType, u64)> {
        self.entries().into_iter().filter(|(_, n)| *n > 0).collect()
    }

    /// Largest entry; ties go to the earlier key. `None` when all are zero.
    pub fn top(&self) -> Option<(AssetType, u64)> {
        self.entries()
            .into_iter()
            .fold(None, |best: Option<(AssetType, u64)>, (t, n)| match best {
                Some((_, b)) if b >= n => best,
                _ if n == 0 => best,
                _ => Some((t, n)),
            })
    }

    /// JS plus API, the "assets" figure on the range card.
    pub fn web_assets(&self) -> u64 {
        self.js + self.api
    }
}

/// One row of the most-changed-assets list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetChangeStats {
    pub path: String,
    pub count: u64,
    #[serde(deserialize_with = "crate::instant::deserialize")]
    pub last_change: DateTime<Utc>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

/// Response body of `GET /api/drift/stats`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftStatsResponse {
    pub total_drifts: u64,
    pub critical_count: u64,
    pub risk_count: u64,
    pub time_range_days: u32,
    #[serde(default)]
    pub by_asset_type: AssetTypeCounts,
    #[serde(default)]
    pub most_changed_assets: Vec<AssetChangeStats>,
}

impl DriftStatsResponse {
    /// Critical plus risk, the headline figure on the global dashboard.
    pub fn actionable_count(&self) -> u64 {
        self.critical_count + self.risk_count
    }
}

/// Summary block of an asset history response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetHistorySummary {
    pub total_changes: u64,
    pub critical_changes: u64,
    pub risk_changes: u64,
    #[serde(default, deserialize_with = "crate::instant::option::deserialize")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::instant::option::deserialize")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub most_common_action: Option<String>,
}

/// Response body of `GET /api/drift/asset-history`.
///
/// `history` is kept in server order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetHistoryResponse {
    pub asset_path: String,
    pub time_range_days: u32,
    pub summary: AssetHistorySummary,
    #[serde(default)]
    pub history: Vec<TimelineEvent>,
}

/// Response body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}
