//! Session-lifetime UI state.
//!
//! [`TimelineStore`] is the single source of truth for cross-view state:
//! active domain, filters, which event is expanded, panel visibility, and the
//! asset-history target. Every setter is synchronous and total; each replaces
//! its slice wholesale. One store exists per running session and is owned by
//! the [`TimelineContainer`](crate::container::TimelineContainer).

use risksignal_types::{AssetType, DateRange, Severity, TimelineFilters};

/// The asset whose history is being inspected.
///
/// Domain and path travel together, so the modal can never be half-open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetHistoryTarget {
    pub domain: String,
    pub path: String,
}

/// Flattened view of the modal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetHistoryModal<'a> {
    pub open: bool,
    pub domain: Option<&'a str>,
    pub path: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineStore {
    domain: String,
    filters: TimelineFilters,
    expanded_event_id: Option<String>,
    filters_panel_open: bool,
    asset_history: Option<AssetHistoryTarget>,
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_DOMAIN)
    }
}

impl TimelineStore {
    /// Fresh state on `domain`: no filters, nothing expanded, panel open.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            filters: TimelineFilters::default(),
            expanded_event_id: None,
            filters_panel_open: true,
            asset_history: None,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn filters(&self) -> &TimelineFilters {
        &self.filters
    }

    pub fn selected_severity(&self) -> Option<Severity> {
        self.filters.severity
    }

    pub fn selected_asset_type(&self) -> Option<AssetType> {
        self.filters.asset_type
    }

    pub fn date_range(&self) -> DateRange {
        self.filters.date_range
    }

    pub fn expanded_event_id(&self) -> Option<&str> {
        self.expanded_event_id.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_event_id.as_deref() == Some(id)
    }

    pub fn is_filters_panel_open(&self) -> bool {
        self.filters_panel_open
    }

    /// Severity or asset type selected. Dates alone don't show the reset control.
    pub fn has_active_filters(&self) -> bool {
        self.filters.severity.is_some() || self.filters.asset_type.is_some()
    }

    pub fn asset_history_target(&self) -> Option<&AssetHistoryTarget> {
        self.asset_history.as_ref()
    }

    pub fn asset_history_modal(&self) -> AssetHistoryModal<'_> {
        match &self.asset_history {
            Some(t) => AssetHistoryModal {
                open: true,
                domain: Some(&t.domain),
                path: Some(&t.path),
            },
            None => AssetHistoryModal { open: false, domain: None, path: None },
        }
    }

    /// Value to pass to [`set_severity`](Self::set_severity) when `value` is
    /// clicked: clicking the active value clears it.
    pub fn toggled_severity(&self, value: Severity) -> Option<Severity> {
        if self.filters.severity == Some(value) { None } else { Some(value) }
    }

    /// Asset-type counterpart of [`toggled_severity`](Self::toggled_severity).
    pub fn toggled_asset_type(&self, value: AssetType) -> Option<AssetType> {
        if self.filters.asset_type == Some(value) { None } else { Some(value) }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    /// Replace the domain. Filters are left alone; call
    /// [`reset_filters`](Self::reset_filters) for a clean slate.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }

    pub fn set_severity(&mut self, severity: Option<Severity>) {
        self.filters.severity = severity;
    }

    pub fn set_asset_type(&mut self, asset_type: Option<AssetType>) {
        self.filters.asset_type = asset_type;
    }

    /// Replace both bounds at once.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.filters.date_range = range;
    }

    /// Expand `id`, or collapse it if it is already the expanded one.
    pub fn toggle_event(&mut self, id: &str) {
        if self.expanded_event_id.as_deref() == Some(id) {
            self.expanded_event_id = None;
        } else {
            self.expanded_event_id = Some(id.to_owned());
        }
    }

    pub fn collapse_all_events(&mut self) {
        self.expanded_event_id = None;
    }

    pub fn toggle_filters_panel(&mut self) {
        self.filters_panel_open = !self.filters_panel_open;
    }

    pub fn set_filters_panel_open(&mut self, open: bool) {
        self.filters_panel_open = open;
    }

    /// Clear severity, asset type, and dates. Domain, panel, and expansion are untouched.
    pub fn reset_filters(&mut self) {
        self.filters = TimelineFilters::default();
    }

    pub fn open_asset_history_modal(&mut self, domain: impl Into<String>, path: impl Into<String>) {
        self.asset_history = Some(AssetHistoryTarget { domain: domain.into(), path: path.into() });
    }

    pub fn close_asset_history_modal(&mut self) {
        self.asset_history = None;
    }
}
