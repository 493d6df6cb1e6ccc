//! Remote inventory: the child pages of the root page, keyed by title.

use tracing::{debug, warn};

use mdnotion_core::{PageStore, RemoteId, RemoteInventory, RemoteNode, Title};

use crate::error::SyncError;

/// Read the live child pages of `root`.
///
/// Any failure to retrieve the root is [`SyncError::RootNotFound`]; a failed
/// listing is [`SyncError::Listing`]. Archived pages and non-page children
/// are ignored. Titles are trimmed; on a duplicate title the later page
/// replaces the earlier one.
pub fn read_remote_inventory<S>(store: &S, root: &RemoteId) -> Result<RemoteInventory, SyncError>
where
    S: PageStore + ?Sized,
{
    store
        .retrieve_page(root)
        .map_err(|source| SyncError::RootNotFound {
            id: root.clone(),
            source,
        })?;
    let children = store
        .list_children(root)
        .map_err(|source| SyncError::Listing {
            id: root.clone(),
            source,
        })?;

    let mut inventory = RemoteInventory::new();
    for block in &children {
        let Some(title) = block.child_page_title() else {
            continue;
        };
        let title = Title::from(title.trim());
        if let Some(previous) = inventory.get(&title) {
            warn!(%title, kept = %block.id, replaced = %previous.id, "duplicate remote page title");
        }
        inventory.insert(
            title.clone(),
            RemoteNode {
                id: block.id.clone(),
                title,
            },
        );
    }
    debug!(count = inventory.len(), %root, "read remote inventory");
    Ok(inventory)
}
