//! Mutation pipeline: applies a [`DiffResult`] to the remote store.
//!
//! Phases run update → create → delete. Items run one at a time and each
//! resolves to an [`ItemOutcome`] before the next starts. Fatal errors stop
//! the pass; tolerated ones are logged and recorded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use mdnotion_core::{Block, Config, Document, PageStore, Render, RemoteId, RemoteInventory, Title};

use crate::error::SyncError;
use crate::fingerprint::{fingerprint, fingerprint_block, is_stale, stored_fingerprint};
use crate::reconcile::{CreateItem, DeleteItem, DiffResult, UpdateItem};

/// Prefix of the notice posted on a page whose content could not be written.
pub const APPEND_FAILED_NOTICE: &str = "Blocks appending failed with error";

// ---------------------------------------------------------------------------
// Policy and outcomes
// ---------------------------------------------------------------------------

/// Failure handling for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Log append failures (and other per-item failures) and continue.
    pub tolerate_append_failures: bool,
    /// Delete remote pages with no local document.
    pub delete_orphans: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            tolerate_append_failures: true,
            delete_orphans: false,
        }
    }
}

impl Policy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tolerate_append_failures: config.tolerate_append_failures,
            delete_orphans: config.delete_orphans,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Update,
    Create,
    Delete,
}

/// How a single item resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Created,
    Updated,
    /// Stored fingerprint matches; nothing was sent.
    Unchanged,
    Deleted,
    Skipped { reason: String },
    /// The item failed but the pass continued.
    Tolerated { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub phase: Phase,
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Per-outcome totals of a [`SyncReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub tolerated: usize,
}

/// Everything a pass did, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
}

impl SyncReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            items: Vec::new(),
        }
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary::default();
        for item in &self.items {
            match item.outcome {
                ItemOutcome::Created => s.created += 1,
                ItemOutcome::Updated => s.updated += 1,
                ItemOutcome::Unchanged => s.unchanged += 1,
                ItemOutcome::Deleted => s.deleted += 1,
                ItemOutcome::Skipped { .. } => s.skipped += 1,
                ItemOutcome::Tolerated { .. } => s.tolerated += 1,
            }
        }
        s
    }

    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(move |i| i.phase == phase)
    }
}

// ---------------------------------------------------------------------------
// Block deletion
// ---------------------------------------------------------------------------

/// Delete `ids` in order, one call at a time. Stops at the first failure and
/// returns it; later ids are not attempted.
pub fn delete_blocks_sequentially<S>(store: &S, ids: &[RemoteId]) -> Result<usize, SyncError>
where
    S: PageStore + ?Sized,
{
    for id in ids {
        store
            .delete_block(id)
            .map_err(|source| SyncError::DeleteFailure {
                id: id.clone(),
                source,
            })?;
    }
    Ok(ids.len())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Applies a diff against a store, rendering pages with `renderer`.
pub struct Pipeline<'a, S: ?Sized, R: ?Sized> {
    store: &'a S,
    renderer: &'a R,
    root: &'a RemoteId,
    policy: Policy,
}

impl<'a, S, R> Pipeline<'a, S, R>
where
    S: PageStore + ?Sized,
    R: Render + ?Sized,
{
    pub fn new(store: &'a S, renderer: &'a R, root: &'a RemoteId, policy: Policy) -> Self {
        Self {
            store,
            renderer,
            root,
            policy,
        }
    }

    /// Run all three phases. `remote` is the inventory the diff was computed
    /// from.
    pub fn run(
        &self,
        diff: &DiffResult,
        remote: &RemoteInventory,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::new(Utc::now());

        for item in &diff.to_update {
            let outcome = self.update(item, remote)?;
            report.items.push(self.record(
                Phase::Update,
                &item.title,
                Some(&item.remote_id),
                outcome,
            ));
        }
        info!("--- all pages updated");

        for item in &diff.to_create {
            let (outcome, id) = self.create(item)?;
            report
                .items
                .push(self.record(Phase::Create, &item.title, id.as_ref(), outcome));
        }
        info!("--- new pages created");

        for item in &diff.to_delete {
            let outcome = self.delete(item)?;
            report.items.push(self.record(
                Phase::Delete,
                &item.title,
                Some(&item.remote_id),
                outcome,
            ));
        }
        info!("--- sync complete");

        Ok(report)
    }

    fn record(
        &self,
        phase: Phase,
        title: &Title,
        remote_id: Option<&RemoteId>,
        outcome: ItemOutcome,
    ) -> ItemReport {
        match &outcome {
            ItemOutcome::Tolerated { error } => {
                warn!(?phase, %title, %error, "item failed, continuing")
            }
            ItemOutcome::Skipped { reason } => warn!(?phase, %title, %reason, "item skipped"),
            other => info!(?phase, %title, outcome = ?other, "item done"),
        }
        ItemReport {
            phase,
            title: title.clone(),
            remote_id: remote_id.cloned(),
            outcome,
        }
    }

    /// Rendered page plus the trailing fingerprint block.
    fn page_blocks(&self, document: &Document) -> Vec<Block> {
        let mut blocks = self.renderer.render(document);
        blocks.push(fingerprint_block(&fingerprint(&document.body), Utc::now()));
        blocks
    }

    /// Turn a per-item failure into [`ItemOutcome::Tolerated`] when the policy
    /// allows it.
    fn tolerate(&self, err: SyncError) -> Result<ItemOutcome, SyncError> {
        if self.policy.tolerate_append_failures {
            Ok(ItemOutcome::Tolerated {
                error: err.to_string(),
            })
        } else {
            Err(err)
        }
    }

    fn update(
        &self,
        item: &UpdateItem,
        remote: &RemoteInventory,
    ) -> Result<ItemOutcome, SyncError> {
        let Some(node) = remote.get(&item.title).filter(|n| n.id == item.remote_id) else {
            return Ok(ItemOutcome::Skipped {
                reason: "page not in remote listing".to_string(),
            });
        };

        let existing = match self.store.list_children(&node.id) {
            Ok(blocks) => blocks,
            Err(e) if e.is_not_found() => {
                return Ok(ItemOutcome::Skipped {
                    reason: format!("page disappeared: {e}"),
                })
            }
            Err(source) => {
                return self.tolerate(SyncError::ItemFailure {
                    title: item.title.clone(),
                    source,
                })
            }
        };

        let current = fingerprint(&item.document.body);
        if !is_stale(stored_fingerprint(&existing).as_ref(), &current) {
            return Ok(ItemOutcome::Unchanged);
        }

        let ids: Vec<RemoteId> = existing.into_iter().map(|b| b.id).collect();
        if let Err(err) = delete_blocks_sequentially(self.store, &ids) {
            return Ok(ItemOutcome::Tolerated {
                error: err.to_string(),
            });
        }

        let blocks = self.page_blocks(&item.document);
        match self.store.append_children(&node.id, &blocks) {
            Ok(()) => Ok(ItemOutcome::Updated),
            Err(source) if self.policy.tolerate_append_failures => {
                let message = format!("{APPEND_FAILED_NOTICE}: {source}");
                let notice = self.renderer.render_notice(&message);
                if let Err(e) = self.store.append_children(&node.id, &notice) {
                    warn!(title = %item.title, error = %e, "could not post error notice");
                }
                Ok(ItemOutcome::Tolerated {
                    error: SyncError::AppendFailure {
                        title: item.title.clone(),
                        source,
                    }
                    .to_string(),
                })
            }
            Err(source) => Err(SyncError::AppendFailure {
                title: item.title.clone(),
                source,
            }),
        }
    }

    fn create(&self, item: &CreateItem) -> Result<(ItemOutcome, Option<RemoteId>), SyncError> {
        let blocks = self.page_blocks(&item.document);
        let page = self
            .store
            .create_page(self.root, &item.title)
            .map_err(|source| SyncError::CreateFailure {
                title: item.title.clone(),
                source,
            })?;

        let outcome = match self.store.append_children(&page.id, &blocks) {
            Ok(()) => ItemOutcome::Created,
            Err(source) => self.tolerate(SyncError::AppendFailure {
                title: item.title.clone(),
                source,
            })?,
        };
        Ok((outcome, Some(page.id)))
    }

    fn delete(&self, item: &DeleteItem) -> Result<ItemOutcome, SyncError> {
        if !self.policy.delete_orphans {
            return Ok(ItemOutcome::Skipped {
                reason: "orphan deletion disabled".to_string(),
            });
        }
        match self.store.delete_block(&item.remote_id) {
            Ok(()) => Ok(ItemOutcome::Deleted),
            Err(source) => self.tolerate(SyncError::DeleteFailure {
                id: item.remote_id.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdnotion_core::{Fault, MemoryStore, StoreCall};

    fn root() -> RemoteId {
        RemoteId::from("root")
    }

    #[test]
    fn sequencer_stops_at_first_failure() {
        let store = MemoryStore::with_root(&root());
        let page = store.add_page(&root(), "P");
        store
            .add_blocks(&page, &[Block::divider(), Block::divider(), Block::divider()])
            .expect("seed");
        let ids: Vec<RemoteId> = store.children(&page).into_iter().map(|b| b.id).collect();
        store.inject(Fault::DeleteBlock { id: ids[1].clone() });

        let err = delete_blocks_sequentially(&store, &ids).expect_err("should fail");
        match err {
            SyncError::DeleteFailure { id, .. } => assert_eq!(id, ids[1]),
            other => panic!("expected DeleteFailure, got {other:?}"),
        }
        let deletes: Vec<StoreCall> = store
            .calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::DeleteBlock { .. }))
            .collect();
        assert_eq!(deletes.len(), 2, "third id is never attempted");
        assert_eq!(store.children(&page).len(), 2);
    }

    #[test]
    fn sequencer_on_empty_list_is_a_no_op() {
        let store = MemoryStore::with_root(&root());
        assert_eq!(delete_blocks_sequentially(&store, &[]).expect("ok"), 0);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut report = SyncReport::new(Utc::now());
        let outcomes = [
            ItemOutcome::Created,
            ItemOutcome::Created,
            ItemOutcome::Unchanged,
            ItemOutcome::Skipped {
                reason: "r".to_string(),
            },
            ItemOutcome::Tolerated {
                error: "e".to_string(),
            },
        ];
        for outcome in outcomes {
            report.items.push(ItemReport {
                phase: Phase::Create,
                title: Title::from("t"),
                remote_id: None,
                outcome,
            });
        }
        assert_eq!(
            report.summary(),
            Summary {
                created: 2,
                unchanged: 1,
                skipped: 1,
                tolerated: 1,
                ..Summary::default()
            }
        );
    }

    #[test]
    fn default_policy_tolerates_and_keeps_orphans() {
        let policy = Policy::default();
        assert!(policy.tolerate_append_failures);
        assert!(!policy.delete_orphans);
    }
}
