//! App layer - central state management and command processing
//!
//! The App actor receives UI events, prompt requests and store changes,
//! spawns store actions and emits render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod stores;

pub use state::AppState;
pub use actor::AppActor;
pub use stores::Stores;
