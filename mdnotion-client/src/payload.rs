//! Request bodies and response shapes for the endpoints the client uses.

use serde::Deserialize;
use serde_json::{json, Value};

use mdnotion_core::{Block, RemoteBlock, RemoteId, Title};

/// Largest `page_size` the listing endpoint accepts.
pub const PAGE_SIZE: usize = 100;

/// Most children a single append request may carry.
pub const MAX_BLOCKS_PER_APPEND: usize = 100;

/// One page of `GET /blocks/{id}/children`.
#[derive(Debug, Deserialize)]
pub struct BlockList {
    pub results: Vec<RemoteBlock>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl BlockList {
    /// Cursor for the next request, if there is more to read.
    pub fn next(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Body of `POST /pages` for a child page with only a title.
pub fn create_page_body(parent: &RemoteId, title: &Title) -> Value {
    json!({
        "parent": {"type": "page_id", "page_id": parent.as_str()},
        "properties": {
            "title": {
                "type": "title",
                "title": [{"type": "text", "text": {"content": title.as_str()}}]
            }
        }
    })
}

/// Bodies of the `PATCH /blocks/{id}/children` requests needed to append
/// `blocks`, in order.
pub fn append_bodies(blocks: &[Block]) -> Vec<Value> {
    blocks
        .chunks(MAX_BLOCKS_PER_APPEND)
        .map(|chunk| json!({ "children": chunk }))
        .collect()
}
