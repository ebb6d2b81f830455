//! Cross-domain overview: the global timeline plus global stats.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use risksignal_client::{DriftApi, TimelineParams};
use risksignal_types::{DriftStatsResponse, TimelineResponse};

use crate::container::Outcome;
use crate::fetch::{spawn_tagged, Generation, Remote};

pub struct GlobalDashboard<A: DriftApi + ?Sized + 'static> {
    api: Arc<A>,
    days: u32,
    generation: Generation,
    timeline: Remote<TimelineResponse>,
    stats: Remote<DriftStatsResponse>,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<A: DriftApi + ?Sized + 'static> GlobalDashboard<A> {
    pub fn new(api: Arc<A>, days: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            days,
            generation: Generation::default(),
            timeline: Remote::default(),
            stats: Remote::default(),
            tx,
            rx,
        }
    }

    /// Issue both requests. Data already shown stays until they settle.
    pub fn refresh(&mut self) -> Generation {
        let generation = self.generation.bump();
        info!(%generation, days = self.days, "dispatching global timeline + stats");
        self.timeline.begin(generation, true);
        self.stats.begin(generation, true);

        let api = Arc::clone(&self.api);
        spawn_tagged(generation, self.tx.clone(), Outcome::Timeline, async move {
            api.get_timeline(None, &TimelineParams::default()).await
        });

        let api = Arc::clone(&self.api);
        let days = self.days;
        spawn_tagged(generation, self.tx.clone(), Outcome::Stats, async move {
            api.get_global_stats(days).await
        });
        generation
    }

    pub fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Timeline(tagged) | Outcome::Page(tagged) => {
                if let Err(e) = &tagged.result {
                    warn!(generation = %tagged.generation, error = %e, "global timeline failed");
                }
                self.timeline.settle(tagged)
            }
            Outcome::Stats(tagged) => {
                if let Err(e) = &tagged.result {
                    warn!(generation = %tagged.generation, error = %e, "global stats failed");
                }
                self.stats.settle(tagged)
            }
        }
    }

    pub async fn recv(&mut self) -> bool {
        match self.rx.recv().await {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }

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

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn timeline(&self) -> Option<&TimelineResponse> {
        self.timeline.data()
    }

    pub fn stats(&self) -> Option<&DriftStatsResponse> {
        self.stats.data()
    }

    pub fn timeline_error(&self) -> Option<&str> {
        self.timeline.error()
    }

    pub fn stats_error(&self) -> Option<&str> {
        self.stats.error()
    }
}
