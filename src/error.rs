//! Error types for the store and its remote collaborator

use thiserror::Error;

use crate::models::ResourceKind;

/// Failure of a store operation, scoped to one resource kind.
///
/// Messages are fixed; the underlying cause only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Failed to fetch {}.", .0.plural())]
    FetchFailed(ResourceKind),
    #[error("Failed to add {}.", .0.singular())]
    AddFailed(ResourceKind),
    #[error("Failed to update {}.", .0.singular())]
    UpdateFailed(ResourceKind),
    #[error("Failed to delete {}.", .0.singular())]
    DeleteFailed(ResourceKind),
}

impl StoreError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            StoreError::FetchFailed(kind)
            | StoreError::AddFailed(kind)
            | StoreError::UpdateFailed(kind)
            | StoreError::DeleteFailed(kind) => *kind,
        }
    }
}

/// Why a call to the remote collection did not succeed
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status} for {method} {url}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no '{0}' collection")]
    MissingCollection(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            StoreError::FetchFailed(ResourceKind::Comments).to_string(),
            "Failed to fetch comments."
        );
        assert_eq!(
            StoreError::AddFailed(ResourceKind::Recipes).to_string(),
            "Failed to add recipe."
        );
        assert_eq!(
            StoreError::UpdateFailed(ResourceKind::Posts).to_string(),
            "Failed to update post."
        );
        assert_eq!(
            StoreError::DeleteFailed(ResourceKind::Comments).to_string(),
            "Failed to delete comment."
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            StoreError::DeleteFailed(ResourceKind::Todos).kind(),
            ResourceKind::Todos
        );
    }
}
