//! The four list stores and per-kind dispatch
//!
//! Every action is spawned onto the runtime so the App loop never waits on
//! the network or on user input. Outcomes reach the screen through the
//! stores' watch channels.

use std::sync::Arc;

use crate::config::Config;
use crate::input::{Capture, ChannelInput};
use crate::messages::render::PageView;
use crate::models::{Comment, FlagField, ItemId, Payload, Post, Recipe, ResourceKind, Todo};
use crate::network::{create_client, HttpRemote};
use crate::store::{actions, ListStore};

/// Run `$body` with `$store` bound to the store for `$kind`
macro_rules! with_store {
    ($stores:expr, $kind:expr, $store:ident => $body:expr) => {
        match $kind {
            ResourceKind::Comments => {
                let $store = &$stores.comments;
                $body
            }
            ResourceKind::Posts => {
                let $store = &$stores.posts;
                $body
            }
            ResourceKind::Recipes => {
                let $store = &$stores.recipes;
                $body
            }
            ResourceKind::Todos => {
                let $store = &$stores.todos;
                $body
            }
        }
    };
}

#[derive(Clone)]
pub struct Stores {
    pub comments: ListStore<Comment>,
    pub posts: ListStore<Post>,
    pub recipes: ListStore<Recipe>,
    pub todos: ListStore<Todo>,
}

impl Stores {
    /// Stores talking to the configured REST API over one shared client
    pub fn http(config: &Config) -> Self {
        let client = create_client(config.timeout());
        let base = config.base_url.as_str();
        let user = config.user_id;
        Stores {
            comments: ListStore::new(Arc::new(HttpRemote::<Comment>::new(client.clone(), base, user))),
            posts: ListStore::new(Arc::new(HttpRemote::<Post>::new(client.clone(), base, user))),
            recipes: ListStore::new(Arc::new(HttpRemote::<Recipe>::new(client.clone(), base, user))),
            todos: ListStore::new(Arc::new(HttpRemote::<Todo>::new(client, base, user))),
        }
    }

    pub fn page(&self, kind: ResourceKind) -> PageView {
        with_store!(self, kind, store => PageView::from_state(&store.snapshot()))
    }

    pub fn ids(&self, kind: ResourceKind) -> Vec<ItemId> {
        with_store!(self, kind, store => store.snapshot().ids())
    }

    /// Kinds with an operation in flight
    pub fn busy(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| with_store!(self, *kind, store => store.snapshot().is_loading()))
            .collect()
    }

    pub fn spawn_load(&self, kind: ResourceKind) {
        with_store!(self, kind, store => spawn_load(store))
    }

    pub fn spawn_add(&self, kind: ResourceKind, input: ChannelInput) {
        with_store!(self, kind, store => spawn_add(store, input))
    }

    pub fn spawn_edit(&self, kind: ResourceKind, id: ItemId, input: ChannelInput) {
        with_store!(self, kind, store => spawn_edit(store, id, input))
    }

    pub fn spawn_remove(&self, kind: ResourceKind, id: ItemId, input: ChannelInput) {
        with_store!(self, kind, store => spawn_remove(store, id, input))
    }

    /// Flip completion; kinds without the flag ignore it
    pub fn toggle(&self, kind: ResourceKind, id: ItemId) {
        with_store!(self, kind, store => {
            let _ = store.toggle_flag(id, FlagField::Completed);
        })
    }

    pub fn clear_error(&self, kind: ResourceKind) {
        with_store!(self, kind, store => store.clear_error())
    }
}

fn spawn_load<P: Payload>(store: &ListStore<P>) {
    let store = store.clone();
    tokio::spawn(async move {
        let _ = store.load().await;
    });
}

fn spawn_add<P: Capture>(store: &ListStore<P>, input: ChannelInput) {
    let store = store.clone();
    tokio::spawn(async move {
        let _ = actions::add_with_input(&store, &input).await;
    });
}

fn spawn_edit<P: Capture>(store: &ListStore<P>, id: ItemId, input: ChannelInput) {
    let store = store.clone();
    tokio::spawn(async move {
        let _ = actions::edit_with_input(&store, id, &input).await;
    });
}

fn spawn_remove<P: Payload>(store: &ListStore<P>, id: ItemId, input: ChannelInput) {
    let store = store.clone();
    tokio::spawn(async move {
        let _ = actions::remove_with_confirm(&store, id, &input).await;
    });
}
