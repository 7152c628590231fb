//! Remote-backed list store
//!
//! One generic store per resource kind. It owns an ordered list of items,
//! keeps it in step with a [`RemoteCollection`], and publishes every change
//! through a `tokio::sync::watch` channel so renderers can subscribe.
//!
//! Operations do not lock each other out: overlapping calls are allowed and
//! their results are applied in completion order (last writer wins).

pub mod actions;
pub mod remote;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{RemoteError, StoreError};
use crate::models::{FlagField, Item, ItemId, Payload, ResourceKind};

pub use remote::RemoteCollection;

/// When local state changes relative to the remote call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Apply the server's answer once it arrives; errors are recorded
    Pessimistic,
    /// Apply locally right away and send in the background; never rolled back
    Optimistic,
    /// Wait for the server, then reload the whole collection
    Refetch,
}

/// Strategy per mutating operation. `add` is always pessimistic since the id
/// comes from the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Policies {
    pub update: Strategy,
    pub remove: Strategy,
    pub toggle: Strategy,
}

impl Default for Policies {
    fn default() -> Self {
        Policies {
            update: Strategy::Pessimistic,
            remove: Strategy::Pessimistic,
            toggle: Strategy::Optimistic,
        }
    }
}

impl Policies {
    /// Posts re-fetch the list after each mutation and todo edits apply
    /// locally first; everything else splices the server's answer
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Posts => Policies {
                update: Strategy::Refetch,
                remove: Strategy::Refetch,
                ..Policies::default()
            },
            ResourceKind::Todos => Policies {
                update: Strategy::Optimistic,
                ..Policies::default()
            },
            _ => Policies::default(),
        }
    }
}

/// Observable state of one store
#[derive(Clone, Debug, PartialEq)]
pub struct ListState<P> {
    pub items: Vec<Item<P>>,
    /// Pessimistic operations currently awaiting the server
    pub in_flight: usize,
    /// Most recent failure; stays until another failure replaces it or
    /// `clear_error` is called
    pub error: Option<StoreError>,
    pub last_loaded: Option<DateTime<Utc>>,
}

impl<P> Default for ListState<P> {
    fn default() -> Self {
        ListState {
            items: Vec::new(),
            in_flight: 0,
            error: None,
            last_loaded: None,
        }
    }
}

impl<P: Payload> ListState<P> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn get(&self, id: ItemId) -> Option<&Item<P>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Put an item at the front, evicting any older item with the same id
    fn prepend(&mut self, item: Item<P>) {
        self.items.retain(|existing| existing.id != item.id);
        self.items.insert(0, item);
    }

    /// Replace the element with `id` in place; false when absent.
    ///
    /// When the replacement carries another id, any other element already
    /// holding that id is evicted.
    fn replace(&mut self, id: ItemId, item: Item<P>) -> bool {
        if !self.items.iter().any(|existing| existing.id == id) {
            return false;
        }
        if item.id != id {
            self.items
                .retain(|existing| existing.id == id || existing.id != item.id);
        }
        match self.items.iter_mut().find(|existing| existing.id == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    fn set_flag(&mut self, id: ItemId, field: FlagField, value: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.payload.set_flag(field, value);
        }
    }
}

/// Keeps `in_flight` raised while alive; the decrement runs on every exit
/// path, including a dropped future.
struct LoadingGuard<'a, P> {
    state: &'a watch::Sender<ListState<P>>,
}

impl<'a, P> LoadingGuard<'a, P> {
    fn begin(state: &'a watch::Sender<ListState<P>>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        LoadingGuard { state }
    }
}

impl<P> Drop for LoadingGuard<'_, P> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

/// Remote-backed list store for payload type `P`
pub struct ListStore<P: Payload> {
    remote: Arc<dyn RemoteCollection<P>>,
    state: Arc<watch::Sender<ListState<P>>>,
    policies: Policies,
}

impl<P: Payload> Clone for ListStore<P> {
    fn clone(&self) -> Self {
        ListStore {
            remote: Arc::clone(&self.remote),
            state: Arc::clone(&self.state),
            policies: self.policies,
        }
    }
}

impl<P: Payload> ListStore<P> {
    pub fn new(remote: Arc<dyn RemoteCollection<P>>) -> Self {
        Self::with_policies(remote, Policies::for_kind(P::KIND))
    }

    pub fn with_policies(remote: Arc<dyn RemoteCollection<P>>, policies: Policies) -> Self {
        let (state, _) = watch::channel(ListState::default());
        ListStore {
            remote,
            state: Arc::new(state),
            policies,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        P::KIND
    }

    pub fn policies(&self) -> Policies {
        self.policies
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ListState<P> {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<ListState<P>> {
        self.state.subscribe()
    }

    pub fn item(&self, id: ItemId) -> Option<Item<P>> {
        self.state.borrow().get(id).cloned()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Replace the list with the server's collection
    pub async fn load(&self) -> Result<Vec<Item<P>>, StoreError> {
        let _loading = LoadingGuard::begin(&self.state);
        tracing::info!(kind = %P::KIND, "Loading list");

        match self.remote.fetch_all().await {
            Ok(fetched) => {
                let items = dedupe(fetched);
                tracing::info!(kind = %P::KIND, count = items.len(), "List loaded");
                self.state.send_modify(|s| {
                    s.items = items.clone();
                    s.last_loaded = Some(Utc::now());
                });
                Ok(items)
            }
            Err(e) => Err(self.fail(StoreError::FetchFailed(P::KIND), e)),
        }
    }

    /// Create an item and put the server's copy first.
    ///
    /// An empty payload is skipped without contacting the server and yields
    /// `Ok(None)`.
    pub async fn add(&self, payload: P) -> Result<Option<Item<P>>, StoreError> {
        if payload.is_empty() {
            tracing::debug!(kind = %P::KIND, "Empty payload, add skipped");
            return Ok(None);
        }

        let _loading = LoadingGuard::begin(&self.state);
        tracing::info!(kind = %P::KIND, "Adding item");

        match self.remote.create(&payload).await {
            Ok(item) => {
                tracing::info!(kind = %P::KIND, id = item.id, "Item added");
                self.state.send_modify(|s| s.prepend(item.clone()));
                Ok(Some(item))
            }
            Err(e) => Err(self.fail(StoreError::AddFailed(P::KIND), e)),
        }
    }

    /// Update the item with `id`.
    ///
    /// The call goes out even when `id` is not in the local list; in that
    /// case nothing is spliced. Empty payloads are skipped (`Ok(None)`).
    pub async fn update(&self, id: ItemId, payload: P) -> Result<Option<Item<P>>, StoreError> {
        if payload.is_empty() {
            tracing::debug!(kind = %P::KIND, id, "Empty payload, update skipped");
            return Ok(None);
        }

        match self.policies.update {
            Strategy::Optimistic => {
                let local = Item::new(id, payload.clone());
                let mut applied = false;
                self.state
                    .send_if_modified(|s| {
                        applied = s.replace(id, local.clone());
                        applied
                    });

                let remote = Arc::clone(&self.remote);
                self.detach("update", id, async move {
                    remote.update(id, &payload).await.map(|_| ())
                });
                Ok(applied.then_some(local))
            }
            strategy => {
                let _loading = LoadingGuard::begin(&self.state);
                tracing::info!(kind = %P::KIND, id, "Updating item");

                let item = match self.remote.update(id, &payload).await {
                    Ok(item) => item,
                    Err(e) => return Err(self.fail(StoreError::UpdateFailed(P::KIND), e)),
                };

                if strategy == Strategy::Refetch {
                    self.refetch().await;
                } else {
                    let replaced = item.clone();
                    if !self.state.send_if_modified(|s| s.replace(id, replaced)) {
                        tracing::debug!(kind = %P::KIND, id, "Updated item not in local list");
                    }
                }
                Ok(Some(item))
            }
        }
    }

    /// Delete the item with `id`. Confirmation is the caller's job.
    pub async fn remove(&self, id: ItemId) -> Result<(), StoreError> {
        match self.policies.remove {
            Strategy::Optimistic => {
                self.state.send_modify(|s| s.remove(id));
                let remote = Arc::clone(&self.remote);
                self.detach("delete", id, async move { remote.delete(id).await });
                Ok(())
            }
            strategy => {
                let _loading = LoadingGuard::begin(&self.state);
                tracing::info!(kind = %P::KIND, id, "Deleting item");

                if let Err(e) = self.remote.delete(id).await {
                    return Err(self.fail(StoreError::DeleteFailed(P::KIND), e));
                }

                if strategy == Strategy::Refetch {
                    self.refetch().await;
                } else {
                    self.state.send_modify(|s| s.remove(id));
                }
                Ok(())
            }
        }
    }

    /// Flip a boolean field of the item with `id`.
    ///
    /// Under the optimistic policy the local flip happens before this returns
    /// and the remote write runs detached: a failure is logged, never rolled
    /// back and never recorded as `error`. Returns the background task, or
    /// `None` when the item is unknown or has no such field.
    pub fn toggle_flag(&self, id: ItemId, field: FlagField) -> Option<JoinHandle<()>> {
        let current = self
            .state
            .borrow()
            .get(id)
            .and_then(|item| item.payload.flag(field));
        let Some(current) = current else {
            tracing::debug!(kind = %P::KIND, id, field = field.as_str(), "Nothing to toggle");
            return None;
        };
        let value = !current;

        match self.policies.toggle {
            Strategy::Optimistic => {
                self.state.send_modify(|s| s.set_flag(id, field, value));
                let remote = Arc::clone(&self.remote);
                Some(self.detach("toggle", id, async move {
                    remote.set_flag(id, field, value).await
                }))
            }
            strategy => {
                let store = self.clone();
                Some(tokio::spawn(async move {
                    let _ = store.set_flag_confirmed(id, field, value, strategy).await;
                }))
            }
        }
    }

    async fn set_flag_confirmed(
        &self,
        id: ItemId,
        field: FlagField,
        value: bool,
        strategy: Strategy,
    ) -> Result<(), StoreError> {
        let _loading = LoadingGuard::begin(&self.state);

        if let Err(e) = self.remote.set_flag(id, field, value).await {
            return Err(self.fail(StoreError::UpdateFailed(P::KIND), e));
        }

        if strategy == Strategy::Refetch {
            self.refetch().await;
        } else {
            self.state.send_modify(|s| s.set_flag(id, field, value));
        }
        Ok(())
    }

    /// Reload after a confirmed mutation; a failed reload records its own error
    async fn refetch(&self) {
        let _ = self.load().await;
    }

    /// Run a remote call in the background. Its outcome is only logged.
    fn detach<F>(&self, action: &'static str, id: ItemId, call: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), RemoteError>> + Send + 'static,
    {
        tokio::spawn(async move {
            match call.await {
                Ok(()) => tracing::debug!(kind = %P::KIND, id, action, "Background call confirmed"),
                Err(e) => {
                    tracing::warn!(kind = %P::KIND, id, action, error = %e, "Background call failed, local state kept")
                }
            }
        })
    }

    fn fail(&self, error: StoreError, cause: RemoteError) -> StoreError {
        tracing::warn!(kind = %error.kind(), cause = %cause, "{}", error);
        self.state.send_modify(|s| s.error = Some(error));
        error
    }
}

/// Drop repeated ids, keeping the first occurrence
fn dedupe<P>(items: Vec<Item<P>>) -> Vec<Item<P>> {
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Item<P>> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if unique.len() != total {
        tracing::warn!(dropped = total - unique.len(), "Server list contained duplicate ids");
    }
    unique
}
