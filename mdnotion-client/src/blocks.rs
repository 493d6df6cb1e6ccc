//! Block operations.

use tracing::debug;

use mdnotion_core::{Block, RemoteBlock, RemoteId, StoreError};

use super::{decode, map_error, NotionClient};
use crate::payload::{append_bodies, BlockList, PAGE_SIZE};

impl NotionClient {
    /// Every child of `id`, following `next_cursor` until `has_more` is false.
    pub(crate) fn list_block_children(
        &self,
        id: &RemoteId,
    ) -> Result<Vec<RemoteBlock>, StoreError> {
        let path = format!("/blocks/{id}/children");
        let page_size = PAGE_SIZE.to_string();
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self.request("GET", &path).query("page_size", &page_size);
            if let Some(start) = cursor.as_deref() {
                request = request.query("start_cursor", start);
            }
            let response = request.call().map_err(|e| map_error(id.as_str(), e))?;
            let list: BlockList = decode(response)?;
            cursor = list.next().map(str::to_string);
            blocks.extend(list.results);
            if cursor.is_none() {
                break;
            }
        }

        debug!(%id, count = blocks.len(), "listed children");
        Ok(blocks)
    }

    /// `PATCH /blocks/{id}/children`, one request per batch, in order.
    pub(crate) fn append_block_children(
        &self,
        id: &RemoteId,
        blocks: &[Block],
    ) -> Result<(), StoreError> {
        let path = format!("/blocks/{id}/children");
        for body in append_bodies(blocks) {
            self.request("PATCH", &path)
                .send_json(body)
                .map_err(|e| map_error(id.as_str(), e))?;
        }
        debug!(%id, count = blocks.len(), "appended children");
        Ok(())
    }

    /// `DELETE /blocks/{id}`; Notion archives the block.
    pub(crate) fn archive_block(&self, id: &RemoteId) -> Result<(), StoreError> {
        self.request("DELETE", &format!("/blocks/{id}"))
            .call()
            .map_err(|e| map_error(id.as_str(), e))?;
        Ok(())
    }
}
