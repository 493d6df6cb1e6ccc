//! mdnotion: mirror a folder of Markdown files into Notion child pages.
//!
//! # Usage
//!
//! ```text
//! mdnotion [sync] [--delete-orphans] [--strict] [--json]
//! mdnotion plan [--json]
//! ```
//!
//! All connection settings come from the environment (`FOLDER`,
//! `NOTION_TOKEN`, `NOTION_ROOT_PAGE_ID`, `RELATIVE_URLS_ROOT`, ...).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mdnotion",
    version,
    about = "Publish a Markdown folder as child pages of a Notion page",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the Notion page tree with the local folder (default).
    Sync(SyncArgs),

    /// Show what a sync would create, update and delete.
    Plan(PlanArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => args.run(),
        Commands::Plan(args) => args.run(),
    }
}
