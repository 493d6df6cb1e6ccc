//! `mdnotion plan`: read-only preview of the next pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use mdnotion_sync::{plan, DiffResult, PassOptions};

/// Arguments for `mdnotion plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let config = super::setup()?;
        let options = PassOptions::from_config(&config);
        let client = super::client(&config);

        let plan = plan(&client, &options).context("plan failed")?;
        let rows = plan_rows(&plan.diff, options.policy.delete_orphans);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        println!(
            "{} local documents | {} remote pages",
            plan.local.len(),
            plan.remote.len()
        );
        if rows.is_empty() {
            println!("{}", "Nothing to do.".bright_black());
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "action")]
    action: &'static str,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "page id")]
    remote_id: String,
}

/// Updates first, then creates, then orphans: the order a pass runs in.
fn plan_rows(diff: &DiffResult, delete_orphans: bool) -> Vec<PlanRow> {
    let updates = diff.to_update.iter().map(|u| PlanRow {
        action: "update",
        title: u.title.to_string(),
        remote_id: u.remote_id.to_string(),
    });
    let creates = diff.to_create.iter().map(|c| PlanRow {
        action: "create",
        title: c.title.to_string(),
        remote_id: String::new(),
    });
    let deletes = diff.to_delete.iter().map(|d| PlanRow {
        action: if delete_orphans { "delete" } else { "keep" },
        title: d.title.to_string(),
        remote_id: d.remote_id.to_string(),
    });
    updates.chain(creates).chain(deletes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdnotion_core::{Document, RemoteId, Title};
    use mdnotion_sync::{CreateItem, DeleteItem, UpdateItem};
    use std::path::PathBuf;

    fn doc(title: &str) -> Document {
        Document {
            title: Title::from(title),
            path: PathBuf::from(format!("{title}.md")),
            body: String::new(),
        }
    }

    fn diff() -> DiffResult {
        DiffResult {
            to_create: vec![CreateItem {
                title: Title::from("New"),
                document: doc("New"),
            }],
            to_update: vec![UpdateItem {
                title: Title::from("Kept"),
                document: doc("Kept"),
                remote_id: RemoteId::from("k1"),
            }],
            to_delete: vec![DeleteItem {
                title: Title::from("Gone"),
                remote_id: RemoteId::from("g1"),
            }],
        }
    }

    #[test]
    fn rows_follow_pass_order() {
        let rows = plan_rows(&diff(), true);
        let actions: Vec<_> = rows.iter().map(|r| (r.action, r.title.as_str())).collect();
        assert_eq!(
            actions,
            vec![("update", "Kept"), ("create", "New"), ("delete", "Gone")]
        );
        assert_eq!(rows[0].remote_id, "k1");
        assert_eq!(rows[1].remote_id, "");
    }

    #[test]
    fn orphans_are_kept_without_deletion() {
        let rows = plan_rows(&diff(), false);
        assert_eq!(rows[2].action, "keep");
    }
}
