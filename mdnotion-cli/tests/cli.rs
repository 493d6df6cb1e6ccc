//! Binary-level checks that need no network: configuration errors and
//! failures that happen before or at the first remote call.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const ROOT_PAGE: &str = "https://www.notion.so/acme/Docs-0123456789abcdef0123456789abcdef";

fn mdnotion() -> Command {
    let mut cmd = Command::cargo_bin("mdnotion").expect("mdnotion binary should be built");
    for var in [
        "FOLDER",
        "NOTION_TOKEN",
        "NOTION_ROOT_PAGE_ID",
        "RELATIVE_URLS_ROOT",
        "GITHUB_WORKSPACE",
        "DEBUG",
        "IGNORE_CREATE_ERRORS",
        "DELETE_ORPHANED_PAGES",
        "NOTION_API_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn configured(folder: &str) -> Command {
    let mut cmd = mdnotion();
    cmd.env("FOLDER", folder)
        .env("NOTION_TOKEN", "secret_test")
        .env("NOTION_ROOT_PAGE_ID", ROOT_PAGE)
        .env("RELATIVE_URLS_ROOT", "https://github.com/acme/docs")
        // Closed port: any remote call fails fast.
        .env("NOTION_API_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn help_lists_subcommands() {
    mdnotion()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync").and(predicate::str::contains("plan")));
}

#[test]
fn missing_folder_is_reported() {
    mdnotion()
        .assert()
        .failure()
        .stderr(predicate::str::contains("FOLDER not provided"));
}

#[test]
fn missing_token_is_reported() {
    mdnotion()
        .env("FOLDER", "docs")
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOTION_TOKEN not provided"));
}

#[test]
fn empty_relative_urls_root_counts_as_missing() {
    mdnotion()
        .env("FOLDER", "docs")
        .env("NOTION_TOKEN", "secret_test")
        .env("NOTION_ROOT_PAGE_ID", ROOT_PAGE)
        .env("RELATIVE_URLS_ROOT", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RELATIVE_URLS_ROOT not provided"));
}

#[test]
fn malformed_root_page_is_reported() {
    let dir = tempdir().expect("tempdir");
    configured(dir.path().to_str().expect("utf-8 path"))
        .env("NOTION_ROOT_PAGE_ID", "not a page url")
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("-<page-id>"));
}

#[test]
fn missing_source_folder_fails_before_remote_calls() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    configured(missing.to_str().expect("utf-8 path"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("source folder not found")
                .and(predicate::str::contains("root page").not()),
        );
}

#[test]
fn unreachable_root_page_fails() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("guide.md"), "# Guide\n\nHello.\n").expect("write doc");
    configured(dir.path().to_str().expect("utf-8 path"))
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("root page"));
}
