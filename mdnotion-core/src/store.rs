//! The remote page store capability consumed by the sync engine.
//!
//! Every component receives the store explicitly; there is no global client.
//! [`MemoryStore`](crate::memory::MemoryStore) and the HTTP client in
//! `mdnotion-client` both implement [`PageStore`].

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, TextBlock};
use crate::error::StoreError;
use crate::types::{RemoteId, Title};

/// A page as returned by retrieve/create calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: RemoteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPage {
    pub title: String,
}

/// A child block as listed by the API.
///
/// Only the fields the engine reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBlock {
    pub id: RemoteId,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub in_trash: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_page: Option<ChildPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<TextBlock>,
}

impl RemoteBlock {
    /// Rebuild the listed form of a rendered block, as the API would return
    /// it after an append.
    pub fn from_block(id: RemoteId, block: &Block) -> Result<Self, StoreError> {
        let mut value =
            serde_json::to_value(block).map_err(|e| StoreError::Decode(e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.insert("id".to_string(), serde_json::Value::String(id.0));
        }
        serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Title of a live `child_page` entry; `None` for anything else.
    pub fn child_page_title(&self) -> Option<&str> {
        if self.block_type != "child_page" || self.archived || self.in_trash {
            return None;
        }
        self.child_page.as_ref().map(|p| p.title.as_str())
    }
}

/// Remote operations used by a reconciliation pass.
///
/// Calls are blocking and are issued one at a time by the caller.
pub trait PageStore {
    /// Fetch a page; [`StoreError::NotFound`] if it is missing or not shared.
    fn retrieve_page(&self, id: &RemoteId) -> Result<Page, StoreError>;

    /// All direct children of a page or block, in order, across every result
    /// page of the listing.
    fn list_children(&self, id: &RemoteId) -> Result<Vec<RemoteBlock>, StoreError>;

    /// Create an empty child page titled `title` under `parent`.
    fn create_page(&self, parent: &RemoteId, title: &Title) -> Result<Page, StoreError>;

    /// Append `blocks` after the existing children of `id`.
    fn append_children(&self, id: &RemoteId, blocks: &[Block]) -> Result<(), StoreError>;

    /// Delete (archive) a block or page.
    fn delete_block(&self, id: &RemoteId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::RichText;
    use serde_json::json;

    #[test]
    fn listed_child_page_is_recognized() {
        let block: RemoteBlock = serde_json::from_value(json!({
            "object": "block",
            "id": "p1",
            "type": "child_page",
            "has_children": true,
            "archived": false,
            "child_page": {"title": "Guide"}
        }))
        .expect("deserialize");
        assert_eq!(block.child_page_title(), Some("Guide"));
    }

    #[test]
    fn archived_or_foreign_blocks_are_not_pages() {
        let archived: RemoteBlock = serde_json::from_value(json!({
            "id": "p1", "type": "child_page", "archived": true,
            "child_page": {"title": "Old"}
        }))
        .expect("deserialize");
        assert_eq!(archived.child_page_title(), None);

        let heading: RemoteBlock = serde_json::from_value(json!({
            "id": "b1", "type": "heading_1",
            "heading_1": {"rich_text": [], "color": "default"}
        }))
        .expect("deserialize");
        assert_eq!(heading.child_page_title(), None);
    }

    #[test]
    fn from_block_keeps_paragraph_text() {
        let block = Block::paragraph(vec![RichText::plain("sha256: abc")]);
        let remote = RemoteBlock::from_block(RemoteId::from("b9"), &block).expect("convert");
        assert_eq!(remote.block_type, "paragraph");
        let paragraph = remote.paragraph.expect("paragraph");
        assert_eq!(paragraph.rich_text[0].content(), "sha256: abc");
    }
}
