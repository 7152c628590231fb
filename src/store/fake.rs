//! In-memory remote collection for store tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::RemoteError;
use crate::models::{FlagField, Item, ItemId, Payload};
use crate::store::RemoteCollection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Fetch,
    Create,
    Update,
    SetFlag,
    Delete,
}

/// Serves a fixed list, assigns increasing ids, never persists mutations.
pub struct FakeRemote<P> {
    items: Mutex<Vec<Item<P>>>,
    next_id: AtomicU64,
    frozen_ids: AtomicBool,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<Vec<String>>,
    rewrite: Mutex<Option<fn(P) -> P>>,
    update_id: Mutex<Option<ItemId>>,
    held: AtomicBool,
    gate: Semaphore,
}

impl<P: Payload> FakeRemote<P> {
    pub fn with_items(items: Vec<Item<P>>) -> Self {
        FakeRemote {
            items: Mutex::new(items),
            next_id: AtomicU64::new(100),
            frozen_ids: AtomicBool::new(false),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            rewrite: Mutex::new(None),
            update_id: Mutex::new(None),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    pub fn fail_on(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn succeed_on(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn set_next_id(&self, id: ItemId) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    /// Every create returns the same id, like a demo API that never stores
    pub fn freeze_ids(&self) {
        self.frozen_ids.store(true, Ordering::SeqCst);
    }

    /// Transform applied to payloads echoed by `update`
    pub fn rewrite_updates(&self, rewrite: fn(P) -> P) {
        *self.rewrite.lock().unwrap() = Some(rewrite);
    }

    /// Echo every update under `id` instead of the requested one
    pub fn answer_updates_with_id(&self, id: ItemId) {
        *self.update_id.lock().unwrap() = Some(id);
    }

    /// Park every following call until `release`
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let one parked call through
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, op: Op, call: String) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(RemoteError::Status {
                method: "TEST",
                url: format!("fake://{}", P::KIND),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<P: Payload> RemoteCollection<P> for FakeRemote<P> {
    async fn fetch_all(&self) -> Result<Vec<Item<P>>, RemoteError> {
        self.enter(Op::Fetch, "fetch".to_string()).await?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn create(&self, payload: &P) -> Result<Item<P>, RemoteError> {
        self.enter(Op::Create, "create".to_string()).await?;
        let id = if self.frozen_ids.load(Ordering::SeqCst) {
            self.next_id.load(Ordering::SeqCst)
        } else {
            self.next_id.fetch_add(1, Ordering::SeqCst)
        };
        Ok(Item::new(id, payload.clone()))
    }

    async fn update(&self, id: ItemId, payload: &P) -> Result<Item<P>, RemoteError> {
        self.enter(Op::Update, format!("update {}", id)).await?;
        let rewrite = *self.rewrite.lock().unwrap();
        let payload = match rewrite {
            Some(rewrite) => rewrite(payload.clone()),
            None => payload.clone(),
        };
        let answered = self.update_id.lock().unwrap().unwrap_or(id);
        Ok(Item::new(answered, payload))
    }

    async fn set_flag(&self, id: ItemId, _field: FlagField, value: bool) -> Result<(), RemoteError> {
        self.enter(Op::SetFlag, format!("flag {} {}", id, value)).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), RemoteError> {
        self.enter(Op::Delete, format!("delete {}", id)).await
    }
}
