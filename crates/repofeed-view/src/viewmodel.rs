//! Per-row view model: derived read streams plus the edit-feedback loop.
//!
//! A view model never holds the entity itself, only its id; the store owns
//! the canonical value. Edits follow sample-latest-then-write: read the
//! current snapshot, apply a pure transformation, and push the result back
//! through the store's single mutation entry point.

use repofeed_core::{RepoId, Repository};
use repofeed_store::{RepoStore, StoreResult};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use url::Url;

use crate::card::{CardStream, RepoCard};

/// View model for one displayed repository row.
///
/// Construction ingests the repository and pins its store entry; dropping
/// the view model releases the pin. Edits arriving after the entry has been
/// reclaimed are dropped, not errors.
pub struct RepositoryViewModel {
    id: RepoId,
    store: RepoStore,
    open_profile_tx: UnboundedSender<RepoId>,
    open_profile_rx: Option<UnboundedReceiver<RepoId>>,
}

impl RepositoryViewModel {
    /// Ingest `repository` and build a view model pinned to its entry.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the acquire; cannot fail for an entity
    /// that was just ingested unless another owner evicted it concurrently.
    pub fn new(repository: Repository, store: RepoStore) -> StoreResult<Self> {
        let id = repository.id;
        store.add_and_update(repository);
        store.acquire(id)?;

        let (open_profile_tx, open_profile_rx) = mpsc::unbounded_channel();
        Ok(Self {
            id,
            store,
            open_profile_tx,
            open_profile_rx: Some(open_profile_rx),
        })
    }

    /// Identifier of the repository this view model projects.
    #[must_use]
    pub const fn id(&self) -> RepoId {
        self.id
    }

    /// Stream of derived row projections, replaying the current state first.
    ///
    /// # Errors
    ///
    /// Fails when the store entry has already been reclaimed.
    pub fn cards(&self) -> StoreResult<CardStream> {
        self.store.observe(self.id).map(CardStream::new)
    }

    /// Sampled owner username from the latest snapshot.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.card().map(|card| card.username)
    }

    /// Sampled avatar URL from the latest snapshot.
    #[must_use]
    pub fn profile_url(&self) -> Option<Url> {
        self.card().and_then(|card| card.profile_url)
    }

    /// Sampled description from the latest snapshot.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.card().and_then(|card| card.description)
    }

    /// Sampled status labels from the latest snapshot.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.card().and_then(|card| card.status)
    }

    /// Replace the owner username with `text` (empty string when absent) and
    /// write the record back. Dropped when no snapshot exists or the record
    /// has no owner to edit.
    pub fn submit_username(&self, text: Option<String>) {
        self.edit("username", |repo| {
            let owner = repo.owner.as_mut()?;
            owner.username = text.unwrap_or_default();
            Some(())
        });
    }

    /// Replace the description with `text` and write the record back.
    /// Dropped when no snapshot exists.
    pub fn submit_description(&self, text: Option<String>) {
        self.edit("description", |repo| {
            repo.description = text;
            Some(())
        });
    }

    /// Emit an open-profile event carrying the id sampled from the latest
    /// upstream value. Dropped when the entry is gone.
    pub fn request_open_profile(&self) {
        let Some(current) = self.store.latest(self.id) else {
            debug!(id = self.id, "open-profile request dropped; entry gone");
            return;
        };
        // Receiver side may already be dropped; that is the consumer's call.
        let _ = self.open_profile_tx.send(current.id);
    }

    /// Take the open-profile event stream. Yields one id per accepted
    /// request; can be taken once.
    pub fn open_profile_requested(&mut self) -> Option<UnboundedReceiver<RepoId>> {
        self.open_profile_rx.take()
    }

    fn card(&self) -> Option<RepoCard> {
        self.store
            .latest(self.id)
            .map(|repo| RepoCard::from_repository(&repo))
    }

    fn edit(&self, field: &'static str, apply: impl FnOnce(&mut Repository) -> Option<()>) {
        let Some(mut repo) = self.store.latest(self.id) else {
            debug!(id = self.id, field, "edit dropped; no upstream value");
            return;
        };
        if apply(&mut repo).is_none() {
            debug!(id = self.id, field, "edit dropped; field not editable");
            return;
        }
        self.store.update(repo);
    }
}

impl Drop for RepositoryViewModel {
    fn drop(&mut self) {
        // Entry may be gone when eviction raced a sibling release.
        if let Err(err) = self.store.release(self.id) {
            debug!(id = self.id, error = %err, "release skipped on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repofeed_core::RepoOwner;
    use repofeed_store::EvictionPolicy;

    fn seeded() -> Repository {
        Repository::new(1, false, true)
            .with_owner(RepoOwner::new("bob", "https://example.com/bob.png"))
            .with_name("bob/project")
            .with_description("a project")
    }

    #[tokio::test]
    async fn construction_ingests_and_pins_the_entry() {
        let store = RepoStore::new();
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");

        assert_eq!(store.refcount(1).expect("refcount"), 1);
        assert_eq!(vm.username().as_deref(), Some("bob"));
        assert_eq!(vm.status().as_deref(), Some("Forked"));
    }

    #[tokio::test]
    async fn drop_releases_the_pin() {
        let store = RepoStore::new();
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");
        drop(vm);
        assert_eq!(store.refcount(1).expect("refcount"), 0);
    }

    #[tokio::test]
    async fn username_edit_reaches_every_subscriber_and_preserves_other_fields() {
        let store = RepoStore::new();
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");

        let mut cards = vm.cards().expect("card stream");
        assert_eq!(
            cards.next().await.expect("replayed card").username,
            "bob"
        );

        vm.submit_username(Some("alice".to_string()));

        let card = cards.next().await.expect("updated card");
        assert_eq!(card.username, "alice");

        let stored = store.latest(1).expect("snapshot");
        assert_eq!(
            stored.owner.as_ref().map(|o| o.username.as_str()),
            Some("alice")
        );
        assert_eq!(stored.name.as_deref(), Some("bob/project"));
        assert_eq!(stored.description.as_deref(), Some("a project"));
        assert!(stored.fork);
    }

    #[tokio::test]
    async fn absent_username_text_defaults_to_empty() {
        let store = RepoStore::new();
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");

        vm.submit_username(None);
        let stored = store.latest(1).expect("snapshot");
        assert_eq!(stored.owner.as_ref().map(|o| o.username.as_str()), Some(""));
    }

    #[tokio::test]
    async fn username_edit_without_owner_is_a_no_op() {
        let store = RepoStore::new();
        let vm =
            RepositoryViewModel::new(Repository::new(2, false, false), store.clone())
                .expect("view model");

        vm.submit_username(Some("alice".to_string()));
        assert!(store.latest(2).expect("snapshot").owner.is_none());
    }

    #[tokio::test]
    async fn description_edit_can_clear_the_field() {
        let store = RepoStore::new();
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");

        vm.submit_description(None);
        assert!(store.latest(1).expect("snapshot").description.is_none());

        vm.submit_description(Some("rewritten".to_string()));
        assert_eq!(
            store.latest(1).expect("snapshot").description.as_deref(),
            Some("rewritten")
        );
    }

    #[tokio::test]
    async fn edits_after_eviction_are_dropped() {
        let store = RepoStore::with_eviction(EvictionPolicy::EvictOnZero);
        let vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");

        // A second pin released elsewhere cannot exist here, so force the
        // entry out by releasing the view model's own pin through a sibling
        // handle and dropping the entry.
        store.release(1).expect("release");
        assert!(store.latest(1).is_none());

        vm.submit_username(Some("alice".to_string()));
        vm.submit_description(Some("ghost".to_string()));
        assert!(store.latest(1).is_none(), "dropped edits must not resurrect the entry");
    }

    #[tokio::test]
    async fn open_profile_samples_the_latest_id() {
        let store = RepoStore::new();
        let mut vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");
        let mut requests = vm.open_profile_requested().expect("event stream");

        vm.request_open_profile();
        vm.request_open_profile();

        assert_eq!(requests.recv().await, Some(1));
        assert_eq!(requests.recv().await, Some(1));
        assert!(requests.try_recv().is_err(), "one event per request");
    }

    #[tokio::test]
    async fn open_profile_after_eviction_is_dropped() {
        let store = RepoStore::with_eviction(EvictionPolicy::EvictOnZero);
        let mut vm = RepositoryViewModel::new(seeded(), store.clone()).expect("view model");
        let mut requests = vm.open_profile_requested().expect("event stream");

        store.release(1).expect("release");
        vm.request_open_profile();
        assert!(requests.try_recv().is_err());
    }
}
