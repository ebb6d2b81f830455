//! Drift events and the timeline page that carries them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diff::EventDiff;
use crate::kind::{AssetType, ChangeType, Severity};

/// A single detected change to a monitored domain's external attack surface.
///
/// Owned by the Drift Engine; the client never mutates one in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique within a response.
    pub id: String,
    #[serde(deserialize_with = "crate::instant::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub asset_type: AssetType,

    // Display
    pub summary: String,
    pub path: String,

    // Forensics
    pub impact: String,
    /// Detection confidence in `0.0..=1.0`.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_implication: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<EventDiff>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl TimelineEvent {
    /// Confidence as a whole percentage, clamped to `0..=100`.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Response body of `GET /api/drift/timeline`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub total_returned: u64,
}

impl TimelineResponse {
    /// Whether the server has another page after this one.
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}
