#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Pagination controller: single-flight batch fetching over the store.
//!
//! One [`PageFeed`] owns the visible ordered id list for a list session. It
//! gates overlapping fetches with an in-flight flag, decides reload versus
//! append from the cursor, ingests decoded pages into the store, and always
//! releases the gate so a failed page can be retried by the next scroll.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use repofeed_client::{RepoService, Transport};
use repofeed_core::RepoId;
use repofeed_store::RepoStore;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Delay applied before materializing each successful fetch result. Smooths
/// perceived scroll loading; failures bypass it so the gate reopens at once.
const DEFAULT_DISPATCH_DELAY: Duration = Duration::from_millis(500);

/// Mutable pagination state for one list session.
struct PageState {
    ordered_ids: Vec<RepoId>,
    in_flight: bool,
    cursor: Option<RepoId>,
}

impl PageState {
    const fn new() -> Self {
        Self {
            ordered_ids: Vec::new(),
            in_flight: false,
            cursor: None,
        }
    }
}

/// Completion signal for one batch fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page loaded and was materialized into the visible list.
    Loaded {
        /// Ids from this page, in received order.
        ids: Vec<RepoId>,
        /// Whether the visible list was replaced rather than appended to.
        reload: bool,
    },
    /// The page failed after bounded retries; the list is untouched and the
    /// gate has been released. The presentation layer shows a toast.
    Failed,
}

/// Single-flight pagination controller over a [`RepoService`].
pub struct PageFeed<T> {
    service: RepoService<T>,
    store: RepoStore,
    state: Arc<Mutex<PageState>>,
    dispatch_delay: Duration,
}

impl<T: Transport> PageFeed<T> {
    /// Build a feed with the default dispatch delay.
    #[must_use]
    pub fn new(service: RepoService<T>, store: RepoStore) -> Self {
        Self::with_dispatch_delay(service, store, DEFAULT_DISPATCH_DELAY)
    }

    /// Build a feed with an explicit dispatch delay.
    #[must_use]
    pub fn with_dispatch_delay(
        service: RepoService<T>,
        store: RepoStore,
        dispatch_delay: Duration,
    ) -> Self {
        Self {
            service,
            store,
            state: Arc::new(Mutex::new(PageState::new())),
            dispatch_delay,
        }
    }

    /// Whether a new batch fetch may start. False exactly while one is in
    /// flight; the batch-fetch source must not call
    /// [`request_more`](Self::request_more) again until it flips back.
    ///
    /// # Panics
    ///
    /// Panics if the page state mutex has been poisoned.
    #[must_use]
    pub fn should_fetch(&self) -> bool {
        !self.state.lock().expect("page state mutex poisoned").in_flight
    }

    /// Fetch and materialize the next page.
    ///
    /// Returns `None` when a fetch is already in flight (the call is
    /// ignored). Otherwise resolves to the completion signal; successful
    /// pages are held for the dispatch delay, failures resolve and release
    /// the gate immediately.
    ///
    /// # Panics
    ///
    /// Panics if the page state mutex has been poisoned.
    pub async fn request_more(&self) -> Option<PageOutcome> {
        let since = {
            let mut state = self.state.lock().expect("page state mutex poisoned");
            if state.in_flight {
                debug!("batch fetch ignored; one already in flight");
                return None;
            }
            state.in_flight = true;
            state.cursor
        };

        let result = self.service.load_page(since).await;

        match result {
            Ok(page) => {
                // Only successful pages are smoothed; failures surface at once.
                sleep(self.dispatch_delay).await;

                let mut state = self.state.lock().expect("page state mutex poisoned");
                state.in_flight = false;

                let ids: Vec<RepoId> = page.iter().map(|repo| repo.id).collect();
                for repo in page {
                    self.store.add_and_update(repo);
                }

                let reload = since.is_none();
                if reload {
                    state.ordered_ids = ids.clone();
                } else {
                    state.ordered_ids.extend(&ids);
                }
                if let Some(last) = ids.last() {
                    state.cursor = Some(*last);
                }

                debug!(
                    count = ids.len(),
                    reload,
                    cursor = ?state.cursor,
                    "page materialized"
                );
                Some(PageOutcome::Loaded { ids, reload })
            }
            Err(err) => {
                self.state
                    .lock()
                    .expect("page state mutex poisoned")
                    .in_flight = false;
                warn!(attempts = err.attempts(), error = %err, "page fetch failed");
                Some(PageOutcome::Failed)
            }
        }
    }

    /// Remove the id at `index` from the visible list. Returns the removed
    /// id, or `None` when out of range. Store release stays the owning view
    /// model's responsibility.
    ///
    /// # Panics
    ///
    /// Panics if the page state mutex has been poisoned.
    pub fn delete_at(&self, index: usize) -> Option<RepoId> {
        let mut state = self.state.lock().expect("page state mutex poisoned");
        if index >= state.ordered_ids.len() {
            return None;
        }
        Some(state.ordered_ids.remove(index))
    }

    /// Snapshot of the visible ordered id list.
    ///
    /// # Panics
    ///
    /// Panics if the page state mutex has been poisoned.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<RepoId> {
        self.state
            .lock()
            .expect("page state mutex poisoned")
            .ordered_ids
            .clone()
    }

    /// Current pagination cursor: the id of the last loaded item.
    ///
    /// # Panics
    ///
    /// Panics if the page state mutex has been poisoned.
    #[must_use]
    pub fn cursor(&self) -> Option<RepoId> {
        self.state.lock().expect("page state mutex poisoned").cursor
    }
}
