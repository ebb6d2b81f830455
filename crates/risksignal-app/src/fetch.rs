//! Loading state for remote resources, tagged by dispatch generation.
//!
//! Requests are spawned as independent tasks and report back over a channel.
//! Each dispatch bumps a [`Generation`]; an outcome carrying an older
//! generation is stale and is dropped instead of overwriting newer data.
//!
//! ```text
//!   dispatch()          spawn            task
//!   gen = gen + 1  ──────────────▶  api.get_*().await
//!   Remote::begin(gen)                   │
//!                                        │ mpsc (Tagged { gen, result })
//!   apply(outcome) ◀─────────────────────┘
//!     gen == current → settle
//!     gen <  current → drop (stale)
//! ```

use std::future::Future;

use tokio::sync::mpsc;

/// Monotonic dispatch counter.
///
/// Consumers compare generations to detect stale responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    /// Advance and return the new value.
    pub fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A fetch result stamped with the generation that requested it.
#[derive(Debug)]
pub struct Tagged<T> {
    pub generation: Generation,
    pub result: Result<T, String>,
}

/// Spawn `fut` and send its result, wrapped by `wrap`, over `tx`.
///
/// Errors are flattened to their display message; callers never branch on
/// error kind. A closed channel means the view is gone and the result is moot.
pub fn spawn_tagged<T, E, M, F>(
    generation: Generation,
    tx: mpsc::UnboundedSender<M>,
    wrap: fn(Tagged<T>) -> M,
    fut: F,
) where
    T: Send + 'static,
    E: std::fmt::Display,
    M: Send + 'static,
    F: Future<Output = Result<T, E>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = fut.await.map_err(|e| e.to_string());
        let _ = tx.send(wrap(Tagged { generation, result }));
    });
}

/// Client-side view of one remote resource.
#[derive(Debug, Clone)]
pub struct Remote<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self { data: None, loading: false, error: None, generation: Generation::default() }
    }
}

impl<T> Remote<T> {
    /// Mark a request for `generation` in flight.
    ///
    /// `keep_data` keeps the previous payload visible (refresh); otherwise the
    /// resource starts empty, as for a new query.
    pub fn begin(&mut self, generation: Generation, keep_data: bool) {
        self.generation = generation;
        self.loading = true;
        self.error = None;
        if !keep_data {
            self.data = None;
        }
    }

    /// Apply a result. Returns `false` and changes nothing when stale.
    pub fn settle(&mut self, tagged: Tagged<T>) -> bool {
        self.settle_with(tagged, |slot, value| *slot = Some(value))
    }

    /// Apply a result through `merge`, e.g. to append a page.
    pub fn settle_with(
        &mut self,
        tagged: Tagged<T>,
        merge: impl FnOnce(&mut Option<T>, T),
    ) -> bool {
        if tagged.generation != self.generation {
            return false;
        }
        self.loading = false;
        match tagged.result {
            Ok(value) => {
                merge(&mut self.data, value);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Drop everything. Outcomes for any generation other than `generation`
    /// are refused afterwards.
    pub fn reset(&mut self, generation: Generation) {
        *self = Self { generation, ..Self::default() };
    }

    /// End the request for `generation`, leaving data and error alone.
    /// Returns `false` when stale.
    pub fn finish(&mut self, generation: Generation) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Mark loading again without touching data (follow-up page).
    pub fn resume(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}
