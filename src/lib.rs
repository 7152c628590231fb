//! # listsync
//!
//! Remote-backed list stores for comments, posts, recipes and todos, with a
//! terminal front end.
//!
//! ## Features
//! - One generic store per resource kind, mirroring a REST collection
//! - Optimistic, pessimistic and refetch-after-write update strategies
//! - Loading and error state observable through a watch channel
//! - Prompt/confirm input injected through [`input::InputProvider`]
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Stores (Tokio runtime) - async HTTP execution

pub mod constants;
pub mod models;
pub mod error;
pub mod config;
pub mod input;
pub mod store;
pub mod network;
pub mod messages;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use models::{Comment, FlagField, Item, ItemId, Payload, Post, Recipe, ResourceKind, Todo};
pub use error::{RemoteError, StoreError};
pub use config::Config;
pub use input::{ChannelInput, InputProvider, ScriptedInput};
pub use store::{ListState, ListStore, Policies, RemoteCollection, Strategy};
pub use network::HttpRemote;
pub use messages::{UiEvent, RenderState};
pub use app::{AppState, AppActor, Stores};
