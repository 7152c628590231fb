//! User-driven flows: ask for input, then run the store operation.
//!
//! Cancelled prompts and declined confirmations end the flow before any
//! remote call.

use crate::error::StoreError;
use crate::input::{capture, Capture, InputProvider};
use crate::models::{Item, ItemId, Payload};
use crate::store::ListStore;

pub async fn add_with_input<P: Capture>(
    store: &ListStore<P>,
    input: &dyn InputProvider,
) -> Result<Option<Item<P>>, StoreError> {
    let Some(payload) = capture::<P>(input, None).await else {
        tracing::debug!(kind = %P::KIND, "Add cancelled");
        return Ok(None);
    };
    store.add(payload).await
}

/// Prompts are pre-filled from the local copy of `id` when there is one
pub async fn edit_with_input<P: Capture>(
    store: &ListStore<P>,
    id: ItemId,
    input: &dyn InputProvider,
) -> Result<Option<Item<P>>, StoreError> {
    let current = store.item(id).map(|item| item.payload);
    let Some(payload) = capture(input, current.as_ref()).await else {
        tracing::debug!(kind = %P::KIND, id, "Edit cancelled");
        return Ok(None);
    };
    store.update(id, payload).await
}

/// Returns `Ok(false)` when the user declines
pub async fn remove_with_confirm<P: Payload>(
    store: &ListStore<P>,
    id: ItemId,
    input: &dyn InputProvider,
) -> Result<bool, StoreError> {
    let message = format!(
        "Are you sure you want to delete this {}?",
        P::KIND.singular()
    );
    if !input.confirm(&message).await {
        tracing::debug!(kind = %P::KIND, id, "Delete declined");
        return Ok(false);
    }
    store.remove(id).await?;
    Ok(true)
}
