//! Page operations.

use tracing::info;

use mdnotion_core::{Page, RemoteId, StoreError, Title};

use super::{decode, map_error, NotionClient};
use crate::payload::create_page_body;

impl NotionClient {
    /// `GET /pages/{id}`.
    pub(crate) fn get_page(&self, id: &RemoteId) -> Result<Page, StoreError> {
        let response = self
            .request("GET", &format!("/pages/{id}"))
            .call()
            .map_err(|e| map_error(id.as_str(), e))?;
        decode(response)
    }

    /// `POST /pages` with `parent` as the parent page.
    pub(crate) fn post_page(&self, parent: &RemoteId, title: &Title) -> Result<Page, StoreError> {
        info!(%title, %parent, "creating page");
        let response = self
            .request("POST", "/pages")
            .send_json(create_page_body(parent, title))
            .map_err(|e| map_error(parent.as_str(), e))?;
        decode(response)
    }
}
