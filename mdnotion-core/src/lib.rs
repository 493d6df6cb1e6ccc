//! mdnotion core library: domain types, block model, capabilities, config.
//!
//! - [`types`]: newtypes, documents, inventories
//! - [`blocks`]: Notion block model and the link visitor
//! - [`store`]: the [`PageStore`] capability
//! - [`render`]: the [`Render`] capability
//! - [`config`]: environment configuration
//! - [`loader`]: local document discovery
//! - [`memory`]: in-memory [`PageStore`] for tests

pub mod blocks;
pub mod config;
pub mod error;
pub mod loader;
pub mod memory;
pub mod render;
pub mod store;
pub mod types;

pub use blocks::{Block, Link, RichText};
pub use config::Config;
pub use error::{ConfigError, LoadError, StoreError};
pub use memory::{Fault, MemoryStore, StoreCall};
pub use render::Render;
pub use store::{Page, PageStore, RemoteBlock};
pub use types::{
    Document, LocalInventory, RemoteId, RemoteInventory, RemoteNode, Title, DEFAULT_TITLE,
};
