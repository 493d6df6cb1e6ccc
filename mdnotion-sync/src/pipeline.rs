//! Shared pass entrypoints used by `mdnotion sync` and `mdnotion plan`.

use std::path::PathBuf;

use tracing::{debug, info};

use mdnotion_core::{loader, Config, LocalInventory, PageStore, Render, RemoteId, RemoteInventory};

use crate::error::SyncError;
use crate::inventory::read_remote_inventory;
use crate::mutation::{Pipeline, Policy, SyncReport};
use crate::reconcile::{reconcile, DiffResult};

/// Inputs of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOptions {
    pub source_root: PathBuf,
    pub root_page: RemoteId,
    pub policy: Policy,
}

impl PassOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_root: config.source_root.clone(),
            root_page: config.root_page.clone(),
            policy: Policy::from_config(config),
        }
    }
}

/// Both inventories and the diff between them.
#[derive(Debug, Clone)]
pub struct Plan {
    pub local: LocalInventory,
    pub remote: RemoteInventory,
    pub diff: DiffResult,
}

/// Load local documents, read the remote inventory and diff them. Issues
/// only read calls.
///
/// Local documents are loaded first, so an unreadable source tree fails
/// before the store is contacted.
pub fn plan<S>(store: &S, options: &PassOptions) -> Result<Plan, SyncError>
where
    S: PageStore + ?Sized,
{
    let local = loader::load(&options.source_root)?;
    let remote = read_remote_inventory(store, &options.root_page)?;
    let diff = reconcile(&local, &remote);
    debug!(
        create = ?diff.to_create.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
        update = ?diff.to_update.iter().map(|u| u.title.as_str()).collect::<Vec<_>>(),
        delete = ?diff.to_delete.iter().map(|d| d.title.as_str()).collect::<Vec<_>>(),
        "diff"
    );
    Ok(Plan {
        local,
        remote,
        diff,
    })
}

/// Run one full reconciliation pass.
pub fn run_pass<S, R>(
    store: &S,
    renderer: &R,
    options: &PassOptions,
) -> Result<SyncReport, SyncError>
where
    S: PageStore + ?Sized,
    R: Render + ?Sized,
{
    let Plan { remote, diff, .. } = plan(store, options)?;
    info!(
        create = diff.to_create.len(),
        update = diff.to_update.len(),
        delete = diff.to_delete.len(),
        "reconciled"
    );
    Pipeline::new(store, renderer, &options.root_page, options.policy).run(&diff, &remote)
}
