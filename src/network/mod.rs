//! Network layer - HTTP implementation of the remote collection contract
//!
//! One shared `reqwest::Client` backs an `HttpRemote` per resource kind.

pub mod client;

pub use client::{create_client, HttpRemote};
