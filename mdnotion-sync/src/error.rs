//! Error types for mdnotion-sync.

use thiserror::Error;

use mdnotion_core::{LoadError, RemoteId, StoreError, Title};

/// Failures that end a reconciliation pass, or an item when tolerated.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configured root page cannot be retrieved.
    #[error("root page {id} not found: {source}")]
    RootNotFound {
        id: RemoteId,
        #[source]
        source: StoreError,
    },

    /// The local source tree could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Listing the root page's children failed.
    #[error("failed to list children of {id}: {source}")]
    Listing {
        id: RemoteId,
        #[source]
        source: StoreError,
    },

    /// A page could not be created.
    #[error("failed to create page '{title}': {source}")]
    CreateFailure {
        title: Title,
        #[source]
        source: StoreError,
    },

    /// Content could not be appended to a page.
    #[error("failed to append blocks to '{title}': {source}")]
    AppendFailure {
        title: Title,
        #[source]
        source: StoreError,
    },

    /// A block or page could not be deleted.
    #[error("failed to delete block {id}: {source}")]
    DeleteFailure {
        id: RemoteId,
        #[source]
        source: StoreError,
    },

    /// Reading an existing page during update failed.
    #[error("failed to read page '{title}': {source}")]
    ItemFailure {
        title: Title,
        #[source]
        source: StoreError,
    },
}
