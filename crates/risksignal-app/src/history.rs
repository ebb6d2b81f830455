//! Asset history fetching for the modal.
//!
//! Follows the store's modal target: a new target fetches, a closed modal
//! drops whatever was loaded.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use risksignal_client::DriftApi;
use risksignal_types::AssetHistoryResponse;

use crate::fetch::{spawn_tagged, Generation, Remote, Tagged};
use crate::store::AssetHistoryTarget;

pub struct AssetHistoryController<A: DriftApi + ?Sized + 'static> {
    api: Arc<A>,
    days: u32,
    target: Option<AssetHistoryTarget>,
    generation: Generation,
    history: Remote<AssetHistoryResponse>,
    tx: mpsc::UnboundedSender<Tagged<AssetHistoryResponse>>,
    rx: mpsc::UnboundedReceiver<Tagged<AssetHistoryResponse>>,
}

impl<A: DriftApi + ?Sized + 'static> AssetHistoryController<A> {
    pub fn new(api: Arc<A>, days: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            days,
            target: None,
            generation: Generation::default(),
            history: Remote::default(),
            tx,
            rx,
        }
    }

    /// Follow `target`. Returns `true` when a request went out.
    pub fn sync(&mut self, target: Option<&AssetHistoryTarget>) -> bool {
        if self.target.as_ref() == target {
            return false;
        }
        self.target = target.cloned();

        let Some(target) = target.filter(|t| !t.domain.is_empty() && !t.path.is_empty()) else {
            let generation = self.generation.bump();
            debug!(%generation, "asset history closed");
            self.history.reset(generation);
            return false;
        };

        let generation = self.generation.bump();
        info!(%generation, domain = %target.domain, path = %target.path, "fetching asset history");
        self.history.begin(generation, false);

        let api = Arc::clone(&self.api);
        let AssetHistoryTarget { domain, path } = target.clone();
        let days = self.days;
        spawn_tagged(generation, self.tx.clone(), |tagged| tagged, async move {
            api.get_asset_history(&domain, &path, days).await
        });
        true
    }

    /// Apply one result. Returns `false` when stale.
    pub fn apply(&mut self, tagged: Tagged<AssetHistoryResponse>) -> bool {
        if let Err(e) = &tagged.result {
            warn!(generation = %tagged.generation, error = %e, "asset history request failed");
        }
        self.history.settle(tagged)
    }

    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tagged) = self.rx.try_recv() {
            if self.apply(tagged) {
                applied += 1;
            }
        }
        applied
    }

    pub async fn recv(&mut self) -> bool {
        match self.rx.recv().await {
            Some(tagged) => self.apply(tagged),
            None => false,
        }
    }

    pub async fn settle(&mut self) {
        while self.history.is_loading() {
            if self.rx.recv().await.map(|t| self.apply(t)).is_none() {
                break;
            }
        }
    }

    pub fn target(&self) -> Option<&AssetHistoryTarget> {
        self.target.as_ref()
    }

    pub fn data(&self) -> Option<&AssetHistoryResponse> {
        self.history.data()
    }

    pub fn is_loading(&self) -> bool {
        self.history.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.history.error()
    }
}
