//! Remote collection contract consumed by the store

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::models::{FlagField, Item, ItemId, Payload};

/// A remote CRUD collection for one resource kind.
///
/// Any error means the call did not succeed; the store never looks inside it
/// beyond logging.
#[async_trait]
pub trait RemoteCollection<P: Payload>: Send + Sync {
    /// Fetch the whole collection in server order
    async fn fetch_all(&self) -> Result<Vec<Item<P>>, RemoteError>;

    /// Create an item; the server assigns the id
    async fn create(&self, payload: &P) -> Result<Item<P>, RemoteError>;

    /// Update an item and return the server's version of it
    async fn update(&self, id: ItemId, payload: &P) -> Result<Item<P>, RemoteError>;

    /// Write a single boolean field
    async fn set_flag(&self, id: ItemId, field: FlagField, value: bool) -> Result<(), RemoteError>;

    async fn delete(&self, id: ItemId) -> Result<(), RemoteError>;
}
