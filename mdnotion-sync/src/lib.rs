//! # mdnotion-sync
//!
//! Reconciles a local Markdown tree with the child pages of a Notion page.
//!
//! Call [`run_pass`] to load, diff and apply in one go, or [`plan`] to compute
//! the diff without mutating anything.

pub mod error;
pub mod fingerprint;
pub mod inventory;
pub mod mutation;
pub mod pipeline;
pub mod reconcile;

pub use error::SyncError;
pub use fingerprint::{extract_fingerprint, fingerprint, fingerprint_block, Fingerprint};
pub use inventory::read_remote_inventory;
pub use mutation::{
    delete_blocks_sequentially, ItemOutcome, ItemReport, Phase, Pipeline, Policy, Summary,
    SyncReport,
};
pub use pipeline::{plan, run_pass, PassOptions, Plan};
pub use reconcile::{reconcile, CreateItem, DeleteItem, DiffResult, UpdateItem};
