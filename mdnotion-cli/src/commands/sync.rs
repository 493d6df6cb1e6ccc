//! `mdnotion sync`: one full reconciliation pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use mdnotion_renderer::PageRenderer;
use mdnotion_sync::{run_pass, ItemOutcome, ItemReport, PassOptions, Summary, SyncReport};

/// Arguments for `mdnotion sync`.
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Delete remote pages with no local document (overrides DELETE_ORPHANED_PAGES).
    #[arg(long)]
    pub delete_orphans: bool,

    /// Abort on the first append failure (overrides IGNORE_CREATE_ERRORS).
    #[arg(long)]
    pub strict: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = super::setup()?;

        let mut options = PassOptions::from_config(&config);
        if self.delete_orphans {
            options.policy.delete_orphans = true;
        }
        if self.strict {
            options.policy.tolerate_append_failures = false;
        }

        let client = super::client(&config);
        let renderer = PageRenderer::new(config.relative_urls_root.clone(), &config.repo_root);
        let report = run_pass(&client, &renderer, &options).context("sync failed")?;

        if self.json {
            print_json(&report)?;
        } else {
            print_results(&report);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SyncReportJson<'a> {
    summary: Summary,
    #[serde(flatten)]
    report: &'a SyncReport,
}

fn print_json(report: &SyncReport) -> Result<()> {
    let payload = SyncReportJson {
        summary: report.summary(),
        report,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize sync JSON")?
    );
    Ok(())
}

fn print_results(report: &SyncReport) {
    for item in &report.items {
        println!("{}", item_line(item));
    }

    let s = report.summary();
    println!(
        "✓ {} created, {} updated, {} unchanged, {} deleted{}",
        s.created,
        s.updated,
        s.unchanged,
        s.deleted,
        extra_counts(&s).bright_black(),
    );
}

fn item_line(item: &ItemReport) -> String {
    let title = item.title.as_str();
    match &item.outcome {
        ItemOutcome::Created => format!("  {} {}", "+".green(), title),
        ItemOutcome::Updated => format!("  {} {}", "~".cyan(), title),
        ItemOutcome::Unchanged => format!("  {} {}", "=".bright_black(), title.bright_black()),
        ItemOutcome::Deleted => format!("  {} {}", "-".red(), title),
        ItemOutcome::Skipped { reason } => {
            format!("  {} {} {}", "·".bright_black(), title, format!("({reason})").bright_black())
        }
        ItemOutcome::Tolerated { error } => {
            format!("  {} {} {}", "!".yellow(), title, error.yellow())
        }
    }
}

fn extra_counts(s: &Summary) -> String {
    let mut parts = Vec::new();
    if s.skipped > 0 {
        parts.push(format!("{} skipped", s.skipped));
    }
    if s.tolerated > 0 {
        parts.push(format!("{} failed but tolerated", s.tolerated));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}
