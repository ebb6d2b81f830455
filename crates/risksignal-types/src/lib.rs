//! Shared drift event, stats, and filter types for RiskSignal.
//!
//! This crate holds the data shapes exchanged with the Drift Engine HTTP API
//! plus the client-local filter state. It has **no internal risksignal
//! dependencies** and performs no I/O. It is the leaf crate the client and
//! app crates build on.
//!
//! # Shape Overview
//!
//! ```text
//! TimelineResponse  ← GET /api/drift/timeline
//!     └── events: TimelineEvent[]
//!             └── severity (Severity), type (ChangeType), asset_type (AssetType)
//!             └── diff: EventDiff { before: DiffValue, after: DiffValue }
//!
//! DriftStatsResponse ← GET /api/drift/stats
//!     └── by_asset_type: AssetTypeCounts
//!     └── most_changed_assets: AssetChangeStats[]
//!
//! AssetHistoryResponse ← GET /api/drift/asset-history
//!     └── summary: AssetHistorySummary
//!     └── history: TimelineEvent[] (server order)
//! ```
//!
//! # Key Types
//!
//! |------------------------|-------------------------------------------------|
//! | Type                   | Purpose                                         |
//! |------------------------|-------------------------------------------------|
//! | [`TimelineEvent`]      | One detected change to a domain's surface       |
//! | [`Severity`]           | Triage bucket (critical, risk, noise)           |
//! | [`AssetType`]          | Category of the changed artifact                |
//! | [`ChangeType`]         | What happened (added, modified, secret, ...)    |
//! | [`DiffValue`]          | Closed before/after payload (absent/text/json)  |
//! | [`DriftStatsResponse`] | Summary counters for a domain or globally       |
//! | [`TimelineFilters`]    | Client-local severity/asset/date selection      |
//! |------------------------|-------------------------------------------------|

pub mod diff;
pub mod event;
pub mod filters;
pub mod kind;
pub mod stats;

pub use diff::{DiffValue, EventDiff};
pub use event::{TimelineEvent, TimelineResponse};
pub use filters::{format_date, DateRange, InvalidDateRange, TimelineFilters};
pub use kind::{AssetType, ChangeType, Severity};
pub use stats::{
    AssetChangeStats, AssetHistoryResponse, AssetHistorySummary, AssetTypeCounts,
    DriftStatsResponse, HealthResponse,
};

/// Serde helpers for instants sent by the Drift Engine.
///
/// The engine emits RFC 3339 timestamps, but older deployments send naive
/// ISO-8601 strings with no offset. Those are read as UTC.
pub mod instant {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse an instant string, accepting RFC 3339 or naive ISO-8601 (as UTC).
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }

}
