//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the demo REST API
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User id sent with created comments, posts and todos
pub const DEFAULT_USER_ID: u64 = 1;

/// Post that new comments are attached to
pub const DEFAULT_POST_ID: u64 = 1;

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "listsync.log";

/// Placeholder rows drawn while a list is loading
pub const SKELETON_ROWS: usize = 6;

/// Application name
pub const APP_NAME: &str = "listsync";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
