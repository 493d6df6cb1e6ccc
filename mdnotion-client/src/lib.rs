//! Notion REST API client.
//!
//! Blocking client over `ureq` implementing
//! [`PageStore`](mdnotion_core::PageStore). Requests are issued one at a
//! time; listing follows pagination and appends are split into batches the
//! API accepts.

mod blocks;
mod pages;
pub mod payload;

use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::{Agent, AgentBuilder};

use mdnotion_core::{Block, Page, PageStore, RemoteBlock, RemoteId, StoreError, Title};

pub const API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion API client authenticated with an integration token.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE, token)
    }

    /// Client against another API root, e.g. a recording proxy.
    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            agent: AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        debug!(method, path, "notion request");
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Notion-Version", NOTION_VERSION)
    }
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PageStore for NotionClient {
    fn retrieve_page(&self, id: &RemoteId) -> Result<Page, StoreError> {
        self.get_page(id)
    }

    fn list_children(&self, id: &RemoteId) -> Result<Vec<RemoteBlock>, StoreError> {
        self.list_block_children(id)
    }

    fn create_page(&self, parent: &RemoteId, title: &Title) -> Result<Page, StoreError> {
        self.post_page(parent, title)
    }

    fn append_children(&self, id: &RemoteId, blocks: &[Block]) -> Result<(), StoreError> {
        self.append_block_children(id, blocks)
    }

    fn delete_block(&self, id: &RemoteId) -> Result<(), StoreError> {
        self.archive_block(id)
    }
}

/// Map a failed call on `id` to a [`StoreError`].
pub(crate) fn map_error(id: &str, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(404, _) => StoreError::NotFound { id: id.to_string() },
        ureq::Error::Status(status, response) => StoreError::Http {
            status,
            body: response
                .into_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_string()),
        },
        ureq::Error::Transport(transport) => StoreError::Transport(transport.to_string()),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, StoreError> {
    response
        .into_json()
        .map_err(|e| StoreError::Decode(e.to_string()))
}
