//! Client-local timeline filters.
//!
//! Each axis is single-select; axes combine with AND. The date range is only
//! sent to the server; the local predicate checks severity and asset type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::TimelineEvent;
use crate::kind::{AssetType, Severity};

/// Wire format for date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date bound as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rejected when building a range whose start is after its end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("date range starts {from} but ends {to}")]
pub struct InvalidDateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Inclusive calendar-date bounds; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, rejecting `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, InvalidDateRange> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(InvalidDateRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Active filter selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineFilters {
    pub severity: Option<Severity>,
    pub asset_type: Option<AssetType>,
    pub date_range: DateRange,
}

impl TimelineFilters {
    /// No axis selected.
    pub fn is_empty(&self) -> bool {
        self.severity.is_none() && self.asset_type.is_none() && self.date_range.is_open()
    }

    /// Local predicate: severity equality AND asset-type equality.
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        self.severity.is_none_or(|s| event.severity == s)
            && self.asset_type.is_none_or(|t| event.asset_type == t)
    }

    /// Events passing [`matches`](Self::matches), in input order.
    pub fn apply<'a>(&self, events: &'a [TimelineEvent]) -> Vec<&'a TimelineEvent> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ChangeType;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, severity: Severity, asset_type: AssetType) -> TimelineEvent {
        TimelineEvent {
            id: id.into(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            severity,
            change_type: ChangeType::AssetModified,
            asset_type,
            summary: String::new(),
            path: format!("/{id}"),
            impact: String::new(),
            confidence: 0.5,
            security_implication: None,
            diff: None,
            details: None,
        }
    }

    fn corpus() -> Vec<TimelineEvent> {
        let mut out = Vec::new();
        for (i, s) in Severity::ALL.iter().enumerate() {
            for (j, t) in AssetType::ALL.iter().enumerate() {
                out.push(event(&format!("e{i}{j}"), *s, *t));
            }
        }
        out
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let events = corpus();
        assert_eq!(TimelineFilters::default().apply(&events).len(), events.len());
    }

    #[test]
    fn test_severity_filter_is_exact_subset() {
        let events = corpus();
        for s in Severity::ALL {
            let filters = TimelineFilters { severity: Some(s), ..Default::default() };
            let kept = filters.apply(&events);
            let expected = events.iter().filter(|e| e.severity == s).count();
            assert_eq!(kept.len(), expected);
            assert!(kept.iter().all(|e| e.severity == s));
        }
    }

    #[test]
    fn test_asset_type_filter_is_exact_subset() {
        let events = corpus();
        for t in AssetType::ALL {
            let filters = TimelineFilters { asset_type: Some(t), ..Default::default() };
            let kept = filters.apply(&events);
            assert_eq!(kept.len(), Severity::ALL.len());
            assert!(kept.iter().all(|e| e.asset_type == t));
        }
    }

    #[test]
    fn test_combined_filters_intersect() {
        let events = corpus();
        let filters = TimelineFilters {
            severity: Some(Severity::Risk),
            asset_type: Some(AssetType::Api),
            ..Default::default()
        };
        let kept = filters.apply(&events);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].severity, Severity::Risk);
        assert_eq!(kept[0].asset_type, AssetType::Api);
    }

    #[test]
    fn test_date_range_validation_and_format() {
        let d1 = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        let range = DateRange::new(Some(d1), Some(d2)).unwrap();
        assert_eq!(range.from.map(format_date).as_deref(), Some("2026-01-02"));
        assert_eq!(range.to.map(format_date).as_deref(), Some("2026-02-03"));
        assert!(DateRange::new(Some(d2), Some(d1)).is_err());
        assert!(DateRange::default().is_open());
    }
}
