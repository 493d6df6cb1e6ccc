//! Error types for mdnotion-core.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or malformed settings. Raised before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{name} not provided")]
    Missing { name: &'static str },

    /// The root page reference does not end in `-<page-id>`.
    #[error("provided page '{value}' was not in a valid format, url must end with \"-<page-id>\"")]
    InvalidRootPage { value: String },
}

/// The local source tree could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source root does not exist or is not a directory.
    #[error("source folder not found: {path}")]
    RootNotFound { path: PathBuf },

    /// I/O failure while walking the tree or reading a document.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A [`PageStore`](crate::store::PageStore) call failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The page or block does not exist, or the integration cannot see it.
    #[error("remote object not found: {id}")]
    NotFound { id: String },

    /// The API answered with an error status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("response decode error: {0}")]
    Decode(String),

    /// Failure injected into a [`MemoryStore`](crate::memory::MemoryStore).
    #[error("injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience constructor for [`LoadError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.into(),
        source,
    }
}
