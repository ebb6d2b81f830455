//! Timeline orchestration for one domain.
//!
//! [`TimelineContainer`] owns the [`TimelineStore`], watches it for query
//! changes and keeps the timeline and stats resources in step with it.
//!
//! # Dispatch Protocol
//!
//! - Query (domain + filters) differs from the last dispatched one -> one
//!   timeline request and one stats request, both tagged with a fresh generation
//! - Query unchanged -> skipped
//! - Domain empty -> skipped, resources cleared
//! - `refresh()` -> both requests again, unconditionally, keeping current data
//!   visible until they settle
//! - `load_more()` -> next page on the current generation, appended on arrival;
//!   a failed page keeps the list and is reported on its own
//!
//! Outcomes arrive on a channel in completion order. An outcome whose
//! generation is not the latest is dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use risksignal_client::{DriftApi, TimelineParams};
use risksignal_types::{DriftStatsResponse, TimelineEvent, TimelineFilters, TimelineResponse};

use crate::fetch::{spawn_tagged, Generation, Remote, Tagged};
use crate::store::TimelineStore;

/// The parameters a dispatch was made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineQuery {
    pub domain: String,
    pub filters: TimelineFilters,
}

impl TimelineQuery {
    fn of(store: &TimelineStore) -> Self {
        Self { domain: store.domain().to_owned(), filters: *store.filters() }
    }
}

/// Result of a [`TimelineContainer::sync`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// Requests went out under this generation.
    Dispatched { generation: Generation },
    /// Nothing was sent (see reason).
    Skipped { reason: SkipReason },
}

/// Reason why a dispatch was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Query matches the last dispatched one.
    Unchanged,
    /// No domain selected.
    EmptyDomain,
    /// The timeline is still loading.
    Loading,
    /// The server offered no further page.
    NoNextPage,
}

/// A finished request.
#[derive(Debug)]
pub enum Outcome {
    Timeline(Tagged<TimelineResponse>),
    /// Follow-up page, appended to the current timeline.
    Page(Tagged<TimelineResponse>),
    Stats(Tagged<DriftStatsResponse>),
}

pub struct TimelineContainer<A: DriftApi + ?Sized + 'static> {
    api: Arc<A>,
    store: TimelineStore,
    stats_days: u32,
    dispatched: Option<TimelineQuery>,
    generation: Generation,
    timeline: Remote<TimelineResponse>,
    stats: Remote<DriftStatsResponse>,
    page_error: Option<String>,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<A: DriftApi + ?Sized + 'static> TimelineContainer<A> {
    pub fn new(api: Arc<A>, store: TimelineStore, stats_days: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            store,
            stats_days,
            dispatched: None,
            generation: Generation::default(),
            timeline: Remote::default(),
            stats: Remote::default(),
            page_error: None,
            tx,
            rx,
        }
    }

    pub fn store(&self) -> &TimelineStore {
        &self.store
    }

    /// Mutable store access. Call [`sync`](Self::sync) afterwards.
    pub fn store_mut(&mut self) -> &mut TimelineStore {
        &mut self.store
    }

    pub fn stats_days(&self) -> u32 {
        self.stats_days
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Dispatch if the store's query moved since the last dispatch.
    pub fn sync(&mut self) -> DispatchResult {
        let query = TimelineQuery::of(&self.store);
        if self.dispatched.as_ref() == Some(&query) {
            return DispatchResult::Skipped { reason: SkipReason::Unchanged };
        }
        self.dispatched = Some(query);
        self.dispatch(false)
    }

    /// Re-issue both requests for the current query.
    pub fn refresh(&mut self) -> DispatchResult {
        self.dispatched = Some(TimelineQuery::of(&self.store));
        self.dispatch(true)
    }

    /// Route-style navigation: switch domain with a clean filter slate.
    pub fn navigate(&mut self, domain: impl Into<String>) -> DispatchResult {
        self.store.set_domain(domain);
        self.store.reset_filters();
        self.store.collapse_all_events();
        self.sync()
    }

    /// Fetch the page after the current one, if the server offered a cursor.
    pub fn load_more(&mut self) -> DispatchResult {
        let Some(query) = self.dispatched.clone() else {
            return DispatchResult::Skipped { reason: SkipReason::NoNextPage };
        };
        if query.domain.is_empty() {
            return DispatchResult::Skipped { reason: SkipReason::EmptyDomain };
        }
        if self.timeline.is_loading() {
            return DispatchResult::Skipped { reason: SkipReason::Loading };
        }
        let Some(cursor) = self
            .timeline
            .data()
            .and_then(|page| page.next_cursor.clone())
            .filter(|c| !c.is_empty())
        else {
            return DispatchResult::Skipped { reason: SkipReason::NoNextPage };
        };

        let generation = self.generation;
        debug!(%generation, %cursor, "loading next timeline page");
        self.timeline.resume();
        self.page_error = None;

        let api = Arc::clone(&self.api);
        let params = TimelineParams::from_filters(&query.filters).with_cursor(cursor);
        spawn_tagged(generation, self.tx.clone(), Outcome::Page, async move {
            api.get_timeline(Some(&query.domain), &params).await
        });
        DispatchResult::Dispatched { generation }
    }

    fn dispatch(&mut self, keep_data: bool) -> DispatchResult {
        self.page_error = None;
        let domain = self.store.domain().to_owned();
        if domain.is_empty() {
            let generation = self.generation.bump();
            debug!(%generation, "no domain, fetching disabled");
            self.timeline.reset(generation);
            self.stats.reset(generation);
            return DispatchResult::Skipped { reason: SkipReason::EmptyDomain };
        }

        let generation = self.generation.bump();
        let filters = *self.store.filters();
        info!(%generation, %domain, ?filters, keep_data, "dispatching timeline + stats");

        self.timeline.begin(generation, keep_data);
        self.stats.begin(generation, keep_data);

        let api = Arc::clone(&self.api);
        let timeline_domain = domain.clone();
        let params = TimelineParams::from_filters(&filters);
        spawn_tagged(generation, self.tx.clone(), Outcome::Timeline, async move {
            api.get_timeline(Some(&timeline_domain), &params).await
        });

        let api = Arc::clone(&self.api);
        let days = self.stats_days;
        spawn_tagged(generation, self.tx.clone(), Outcome::Stats, async move {
            api.get_stats(&domain, days).await
        });

        DispatchResult::Dispatched { generation }
    }

    /// Apply one outcome. Returns `false` for stale ones.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        let (kind, generation, applied) = match outcome {
            Outcome::Timeline(tagged) => {
                let generation = tagged.generation;
                if let Err(e) = &tagged.result {
                    warn!(%generation, error = %e, "timeline request failed");
                }
                ("timeline", generation, self.timeline.settle(tagged))
            }
            Outcome::Page(Tagged { generation, result }) => {
                let applied = match result {
                    Ok(page) => self
                        .timeline
                        .settle_with(Tagged { generation, result: Ok(page) }, append_page),
                    Err(e) => {
                        warn!(%generation, error = %e, "timeline page request failed");
                        let current = self.timeline.finish(generation);
                        if current {
                            self.page_error = Some(e);
                        }
                        current
                    }
                };
                ("page", generation, applied)
            }
            Outcome::Stats(tagged) => {
                let generation = tagged.generation;
                if let Err(e) = &tagged.result {
                    warn!(%generation, error = %e, "stats request failed");
                }
                ("stats", generation, self.stats.settle(tagged))
            }
        };
        if !applied {
            debug!(kind, %generation, current = %self.generation, "dropping stale outcome");
        }
        applied
    }

    /// Apply every outcome already waiting. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next outcome and apply it.
    pub async fn recv(&mut self) -> bool {
        match self.rx.recv().await {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }

    /// Apply outcomes until nothing current is loading.
    pub async fn settle(&mut self) {
        while self.is_loading() {
            if self.rx.recv().await.map(|o| self.apply(o)).is_none() {
                break;
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.timeline.is_loading() || self.stats.is_loading()
    }

    pub fn is_timeline_loading(&self) -> bool {
        self.timeline.is_loading()
    }

    pub fn is_stats_loading(&self) -> bool {
        self.stats.is_loading()
    }

    /// Message for the feed: the timeline error, else the stats error.
    pub fn error(&self) -> Option<&str> {
        self.timeline.error().or_else(|| self.stats.error())
    }

    pub fn timeline_error(&self) -> Option<&str> {
        self.timeline.error()
    }

    pub fn stats_error(&self) -> Option<&str> {
        self.stats.error()
    }

    /// Failure of the last `load_more`. The loaded list stays valid.
    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn timeline(&self) -> Option<&TimelineResponse> {
        self.timeline.data()
    }

    pub fn stats(&self) -> Option<&DriftStatsResponse> {
        self.stats.data()
    }

    pub fn has_more(&self) -> bool {
        self.timeline.data().is_some_and(TimelineResponse::has_more)
    }

    /// Fetched events narrowed by the store's severity and asset type.
    pub fn visible_events(&self) -> Vec<&TimelineEvent> {
        match self.timeline.data() {
            Some(page) => self.store.filters().apply(&page.events),
            None => Vec::new(),
        }
    }
}

fn append_page(slot: &mut Option<TimelineResponse>, page: TimelineResponse) {
    match slot {
        Some(current) => {
            current.events.extend(page.events);
            current.next_cursor = page.next_cursor;
            current.total_returned += page.total_returned;
        }
        None => *slot = Some(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event, stats, RecordingApi};
    use chrono::NaiveDate;
    use risksignal_types::{AssetType, DateRange, Severity};

    fn container(api: &Arc<RecordingApi>) -> TimelineContainer<RecordingApi> {
        TimelineContainer::new(Arc::clone(api), TimelineStore::default(), 30)
    }

    #[tokio::test]
    async fn test_first_sync_dispatches_one_pair() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("e1", Severity::Critical, AssetType::Js)], None);
        api.set_stats(stats(1, 1, 0));
        let mut c = container(&api);

        assert!(matches!(c.sync(), DispatchResult::Dispatched { .. }));
        assert!(c.is_timeline_loading());
        assert!(c.is_stats_loading());
        c.settle().await;

        assert_eq!(api.timeline_calls().len(), 1);
        assert_eq!(api.stats_calls(), vec![("example.com".to_string(), 30)]);
        let (domain, params) = &api.timeline_calls()[0];
        assert_eq!(domain.as_deref(), Some("example.com"));
        assert_eq!(params, &TimelineParams::default());
        assert!(!c.is_loading());
        assert_eq!(c.visible_events().len(), 1);
        assert_eq!(c.stats().map(|s| s.total_drifts), Some(1));
    }

    #[tokio::test]
    async fn test_severity_change_dispatches_exactly_one_more_pair() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        c.store_mut().set_severity(Some(Severity::Critical));
        assert!(matches!(c.sync(), DispatchResult::Dispatched { .. }));
        c.settle().await;

        let calls = api.timeline_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(api.stats_calls().len(), 2);
        assert_eq!(calls[1].1.severity, Some(Severity::Critical));
        assert_eq!(
            calls[1].1.query_pairs(Some("example.com"))[1],
            ("severity", Some("critical".to_string()))
        );
    }

    #[tokio::test]
    async fn test_asset_type_change_dispatches_exactly_one_more_pair() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        c.store_mut().set_asset_type(Some(AssetType::Secret));
        assert!(matches!(c.sync(), DispatchResult::Dispatched { .. }));
        assert_eq!(c.sync(), DispatchResult::Skipped { reason: SkipReason::Unchanged });
        c.settle().await;

        let calls = api.timeline_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(api.stats_calls().len(), 2);
        assert_eq!(calls[1].1.asset_type, Some(AssetType::Secret));
        assert_eq!(
            calls[1].1.query_pairs(Some("example.com"))[2],
            ("asset_type", Some("secret".to_string()))
        );
    }

    #[tokio::test]
    async fn test_date_range_change_dispatches_exactly_one_more_pair() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 10, 1),
            NaiveDate::from_ymd_opt(2026, 10, 17),
        )
        .unwrap();
        c.store_mut().set_date_range(range);
        assert!(matches!(c.sync(), DispatchResult::Dispatched { .. }));
        c.settle().await;

        let calls = api.timeline_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(api.stats_calls().len(), 2);
        let pairs = calls[1].1.query_pairs(Some("example.com"));
        assert_eq!(pairs[3], ("from", Some("2026-10-01".to_string())));
        assert_eq!(pairs[4], ("to", Some("2026-10-17".to_string())));
        assert!(calls[1].1.severity.is_none());
    }

    #[tokio::test]
    async fn test_unchanged_query_is_skipped() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        c.sync();
        assert_eq!(c.sync(), DispatchResult::Skipped { reason: SkipReason::Unchanged });
        c.settle().await;
        assert_eq!(api.timeline_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_is_unconditional_and_keeps_data() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("e1", Severity::Risk, AssetType::Api)], None);
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        c.refresh();
        assert!(c.is_loading());
        assert_eq!(c.timeline().map(|t| t.events.len()), Some(1));
        c.settle().await;
        c.refresh();
        c.settle().await;

        assert_eq!(api.timeline_calls().len(), 3);
        assert_eq!(api.stats_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_timeline_failure_surfaces_message() {
        let api = Arc::new(RecordingApi::default());
        api.fail_timeline(500, "Internal Server Error");
        api.set_stats(stats(4, 1, 1));
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        assert!(!c.is_timeline_loading());
        assert!(!c.is_stats_loading());
        assert_eq!(c.error(), Some("API Error: 500 Internal Server Error"));
        // Stats still landed.
        assert_eq!(c.stats().map(|s| s.total_drifts), Some(4));
        assert!(c.visible_events().is_empty());
    }

    #[tokio::test]
    async fn test_stats_failure_does_not_block_timeline() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("e1", Severity::Noise, AssetType::Service)], None);
        api.fail_stats(503, "Service Unavailable");
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        assert_eq!(c.stats_error(), Some("API Error: 503 Service Unavailable"));
        assert_eq!(c.timeline_error(), None);
        assert_eq!(c.visible_events().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_generation_is_dropped() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        let DispatchResult::Dispatched { generation: first } = c.sync() else {
            panic!("expected dispatch");
        };
        c.store_mut().set_severity(Some(Severity::Risk));
        c.sync();

        let late = TimelineResponse {
            events: vec![event("old", Severity::Critical, AssetType::Js)],
            next_cursor: None,
            total_returned: 1,
        };
        assert!(!c.apply(Outcome::Timeline(Tagged { generation: first, result: Ok(late) })));
        assert!(c.timeline().is_none());
        assert!(c.is_timeline_loading());
        c.settle().await;
        assert!(!c.is_loading());
    }

    #[tokio::test]
    async fn test_empty_domain_disables_fetching() {
        let api = Arc::new(RecordingApi::default());
        let mut c = TimelineContainer::new(Arc::clone(&api), TimelineStore::new(""), 30);
        assert_eq!(c.sync(), DispatchResult::Skipped { reason: SkipReason::EmptyDomain });
        assert_eq!(c.refresh(), DispatchResult::Skipped { reason: SkipReason::EmptyDomain });
        assert!(!c.is_loading());
        assert!(api.timeline_calls().is_empty());
        assert!(api.stats_calls().is_empty());
    }

    #[tokio::test]
    async fn test_visible_events_apply_local_filter() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(
            vec![
                event("a", Severity::Critical, AssetType::Js),
                event("b", Severity::Risk, AssetType::Js),
                event("c", Severity::Critical, AssetType::Api),
            ],
            None,
        );
        let mut c = container(&api);
        c.store_mut().set_severity(Some(Severity::Critical));
        c.store_mut().set_asset_type(Some(AssetType::Js));
        c.sync();
        c.settle().await;

        // The fake ignores params, so the local pass is what narrows the list.
        let ids: Vec<_> = c.visible_events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }

    #[tokio::test]
    async fn test_load_more_appends_next_page() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("a", Severity::Risk, AssetType::Js)], Some("p2"));
        let mut c = container(&api);
        c.sync();
        c.settle().await;
        assert!(c.has_more());

        api.set_timeline(vec![event("b", Severity::Risk, AssetType::Js)], None);
        assert!(matches!(c.load_more(), DispatchResult::Dispatched { .. }));
        c.settle().await;

        let ids: Vec<_> = c.visible_events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(!c.has_more());
        assert_eq!(api.timeline_calls()[1].1.cursor.as_deref(), Some("p2"));
        assert_eq!(api.stats_calls().len(), 1);
        assert_eq!(c.load_more(), DispatchResult::Skipped { reason: SkipReason::NoNextPage });
    }

    #[tokio::test]
    async fn test_load_more_while_loading_is_skipped() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("a", Severity::Risk, AssetType::Js)], Some("p2"));
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        c.refresh();
        assert_eq!(c.load_more(), DispatchResult::Skipped { reason: SkipReason::Loading });
        c.settle().await;
        assert!(matches!(c.load_more(), DispatchResult::Dispatched { .. }));
        c.settle().await;
    }

    #[tokio::test]
    async fn test_failed_page_keeps_loaded_events() {
        let api = Arc::new(RecordingApi::default());
        api.set_timeline(vec![event("a", Severity::Risk, AssetType::Js)], Some("p2"));
        api.fail_pages(502, "Bad Gateway");
        let mut c = container(&api);
        c.sync();
        c.settle().await;

        assert!(matches!(c.load_more(), DispatchResult::Dispatched { .. }));
        c.settle().await;

        assert!(!c.is_loading());
        assert!(c.timeline_error().is_none());
        assert_eq!(c.page_error(), Some("API Error: 502 Bad Gateway"));
        let ids: Vec<_> = c.visible_events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
        // The cursor survives, so `more` can retry.
        assert!(c.has_more());

        c.refresh();
        assert!(c.page_error().is_none());
        c.settle().await;
    }

    #[tokio::test]
    async fn test_navigate_resets_filters() {
        let api = Arc::new(RecordingApi::default());
        let mut c = container(&api);
        c.store_mut().set_asset_type(Some(AssetType::Secret));
        c.sync();
        c.navigate("shop.example.com");
        c.settle().await;

        assert!(c.store().filters().is_empty());
        let calls = api.timeline_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().any(|(domain, params)| {
            domain.as_deref() == Some("shop.example.com") && params.asset_type.is_none()
        }));
    }
}
