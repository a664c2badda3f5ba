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

//! Shared, refcounted repository store with per-entity replay-latest streams.
//!
//! The store owns the only mutable copy of each repository. Every entry pairs
//! the canonical value with a `tokio::broadcast` sender; subscribers receive
//! the latest value synchronously on attach and live updates afterwards.
//! Reference counts bound entry lifetime: view models acquire on construction
//! and release on drop, and the configured [`EvictionPolicy`] decides what
//! happens when the count returns to zero.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use repofeed_core::{RepoId, Repository};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::debug;

pub mod error;

pub use error::{StoreError, StoreResult};

/// Per-entry broadcast capacity. Slow subscribers lag and skip to the oldest
/// retained update rather than stalling publishers.
const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// What the store does with an entry whose refcount returns to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep the entry alive for later reuse.
    #[default]
    Retain,
    /// Drop the entry and close its stream immediately.
    EvictOnZero,
}

struct Entry {
    value: Repository,
    refcount: usize,
    sender: Sender<Repository>,
}

impl Entry {
    fn new(value: Repository, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            value,
            refcount: 0,
            sender,
        }
    }
}

/// Process-wide keyed store of repository entities.
///
/// Cloning is cheap and clones share the same table; all mutation goes
/// through [`add_and_update`](Self::add_and_update) and
/// [`update`](Self::update).
#[derive(Clone)]
pub struct RepoStore {
    entries: Arc<Mutex<HashMap<RepoId, Entry>>>,
    eviction: EvictionPolicy,
    channel_capacity: usize,
}

impl RepoStore {
    /// Construct a store with the given eviction policy and stream capacity.
    ///
    /// # Panics
    ///
    /// Panics if `channel_capacity` is zero.
    #[must_use]
    pub fn with_capacity(eviction: EvictionPolicy, channel_capacity: usize) -> Self {
        assert!(channel_capacity > 0, "store channel capacity must be positive");
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            eviction,
            channel_capacity,
        }
    }

    /// Construct a store with the given eviction policy and default capacity.
    #[must_use]
    pub fn with_eviction(eviction: EvictionPolicy) -> Self {
        Self::with_capacity(eviction, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Construct a store that retains entries at refcount zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_eviction(EvictionPolicy::default())
    }

    /// Ingest a repository: create its entry on first sight, replace the
    /// canonical value otherwise, and publish to every live subscriber.
    ///
    /// Repeated identical input is harmless; subscribers may see a redundant
    /// emission of the same value.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    pub fn add_and_update(&self, repository: Repository) {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let entry = entries
            .entry(repository.id)
            .or_insert_with(|| Entry::new(repository.clone(), self.channel_capacity));
        entry.value = repository.clone();
        // No receivers yet is fine; replay covers late subscribers.
        let _ = entry.sender.send(repository);
    }

    /// Write back an edited repository. Semantically identical to
    /// [`add_and_update`](Self::add_and_update); kept distinct so edit call
    /// sites read as writes, not ingestion.
    pub fn update(&self, repository: Repository) {
        self.add_and_update(repository);
    }

    /// Snapshot of the current canonical value for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    #[must_use]
    pub fn latest(&self, id: RepoId) -> Option<Repository> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        entries.get(&id).map(|entry| entry.value.clone())
    }

    /// Subscribe to `id`, replaying the latest value before live updates.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::UnknownEntity`] when `id` has never been
    /// ingested or its entry was reclaimed.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    pub fn observe(&self, id: RepoId) -> StoreResult<RepoStream> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        let entry = entries.get(&id).ok_or(StoreError::UnknownEntity { id })?;
        Ok(RepoStream {
            backlog: Some(entry.value.clone()),
            receiver: entry.sender.subscribe(),
        })
    }

    /// Pin the entry for `id` (refcount +1).
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::UnknownEntity`] when no entry exists.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    pub fn acquire(&self, id: RepoId) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let entry = entries
            .get_mut(&id)
            .ok_or(StoreError::UnknownEntity { id })?;
        entry.refcount += 1;
        Ok(())
    }

    /// Unpin the entry for `id` (refcount -1), applying the eviction policy
    /// on the transition to zero.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::UnknownEntity`] when no entry exists and
    /// [`StoreError::RefcountUnderflow`] when the count is already zero; the
    /// latter is a programming error and additionally trips a debug assert.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    pub fn release(&self, id: RepoId) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let entry = entries
            .get_mut(&id)
            .ok_or(StoreError::UnknownEntity { id })?;
        if entry.refcount == 0 {
            debug_assert!(false, "release without matching acquire for id {id}");
            return Err(StoreError::RefcountUnderflow { id });
        }
        entry.refcount -= 1;
        if entry.refcount == 0 && self.eviction == EvictionPolicy::EvictOnZero {
            entries.remove(&id);
            debug!(id, "evicted store entry at refcount zero");
        }
        Ok(())
    }

    /// Current refcount for `id`.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::UnknownEntity`] when no entry exists.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    pub fn refcount(&self, id: RepoId) -> StoreResult<usize> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        entries
            .get(&id)
            .map(|entry| entry.refcount)
            .ok_or(StoreError::UnknownEntity { id })
    }

    /// Number of live entries.
    ///
    /// # Panics
    ///
    /// Panics if the entry table mutex has been poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RepoStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-entity stream that yields the replayed latest value first, then live
/// updates in publish order.
pub struct RepoStream {
    backlog: Option<Repository>,
    receiver: Receiver<Repository>,
}

impl RepoStream {
    /// Receive the next value, serving the replay slot before live updates.
    ///
    /// Returns `None` once the entry has been reclaimed and all buffered
    /// updates are drained. A lagged subscriber skips to the oldest retained
    /// update instead of erroring.
    pub async fn next(&mut self) -> Option<Repository> {
        if let Some(value) = self.backlog.take() {
            return Some(value);
        }

        match self.receiver.recv().await {
            Ok(value) => Some(value),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Receive the next value without waiting; `None` when no update is
    /// currently buffered.
    pub fn try_next(&mut self) -> Option<Repository> {
        if let Some(value) = self.backlog.take() {
            return Some(value);
        }

        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(broadcast::error::TryRecvError::Lagged(_)) => self.receiver.try_recv().ok(),
            Err(_) => None,
        }
    }
}
