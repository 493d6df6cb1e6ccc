//! Environment configuration.
//!
//! | Variable                | Required | Default          |
//! |-------------------------|----------|------------------|
//! | `FOLDER`                | yes      |                  |
//! | `NOTION_TOKEN`          | yes      |                  |
//! | `NOTION_ROOT_PAGE_ID`   | yes      |                  |
//! | `RELATIVE_URLS_ROOT`    | yes      |                  |
//! | `DEBUG`                 | no       | off              |
//! | `IGNORE_CREATE_ERRORS`  | no       | on               |
//! | `DELETE_ORPHANED_PAGES` | no       | off              |
//! | `GITHUB_WORKSPACE`      | no       | value of `FOLDER`|
//! | `NOTION_API_URL`        | no       | public Notion API|
//!
//! Toggles are off when set to an empty string, `0`, `false`, `no` or `off`
//! (case-insensitive) and on for any other value.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::RemoteId;

const FOLDER: &str = "FOLDER";
const NOTION_TOKEN: &str = "NOTION_TOKEN";
const NOTION_ROOT_PAGE_ID: &str = "NOTION_ROOT_PAGE_ID";
const RELATIVE_URLS_ROOT: &str = "RELATIVE_URLS_ROOT";
const DEBUG: &str = "DEBUG";
const IGNORE_CREATE_ERRORS: &str = "IGNORE_CREATE_ERRORS";
const DELETE_ORPHANED_PAGES: &str = "DELETE_ORPHANED_PAGES";
const GITHUB_WORKSPACE: &str = "GITHUB_WORKSPACE";
const NOTION_API_URL: &str = "NOTION_API_URL";

/// Settings for one sync run.
#[derive(Clone)]
pub struct Config {
    /// Directory scanned for Markdown documents.
    pub source_root: PathBuf,
    /// Notion integration token.
    pub token: String,
    /// Page whose children mirror the documents.
    pub root_page: RemoteId,
    /// Repository URL used to rewrite relative links.
    pub relative_urls_root: String,
    /// Directory that repository-relative paths are computed from.
    pub repo_root: PathBuf,
    pub debug: bool,
    /// Log and continue when appending content fails, instead of aborting.
    pub tolerate_append_failures: bool,
    /// Delete remote pages that have no local document.
    pub delete_orphans: bool,
    /// Alternative API root, e.g. a local proxy.
    pub api_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("source_root", &self.source_root)
            .field("token", &"<redacted>")
            .field("root_page", &self.root_page)
            .field("relative_urls_root", &self.relative_urls_root)
            .field("repo_root", &self.repo_root)
            .field("debug", &self.debug)
            .field("tolerate_append_failures", &self.tolerate_append_failures)
            .field("delete_orphans", &self.delete_orphans)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Required variables are checked in a fixed order and the first missing
    /// one is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing { name })
        };

        let folder = required(FOLDER)?;
        let token = required(NOTION_TOKEN)?;
        let root_page = required(NOTION_ROOT_PAGE_ID)?;
        let links_root = required(RELATIVE_URLS_ROOT)?;

        let source_root = PathBuf::from(folder);
        let repo_root = lookup(GITHUB_WORKSPACE)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| source_root.clone());

        Ok(Config {
            root_page: parse_root_page_id(&root_page)?,
            source_root,
            token,
            relative_urls_root: links_root.trim_end_matches('/').to_string(),
            repo_root,
            debug: flag(lookup(DEBUG), false),
            tolerate_append_failures: flag(lookup(IGNORE_CREATE_ERRORS), true),
            delete_orphans: flag(lookup(DELETE_ORPHANED_PAGES), false),
            api_url: lookup(NOTION_API_URL).filter(|value| !value.is_empty()),
        })
    }
}

/// Extract the page id from a page URL or slug such as
/// `https://www.notion.so/Team-Docs-0123456789abcdef0123456789abcdef`.
///
/// The id is everything after the last `-`; it must be non-empty and
/// alphanumeric.
pub fn parse_root_page_id(value: &str) -> Result<RemoteId, ConfigError> {
    let invalid = || ConfigError::InvalidRootPage {
        value: value.to_string(),
    };
    let (_, id) = value.trim().rsplit_once('-').ok_or_else(invalid)?;
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(RemoteId::from(id))
}

fn flag(value: Option<String>, default: bool) -> bool {
    match value {
        None => default,
        Some(raw) => !matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (FOLDER, "docs"),
            (NOTION_TOKEN, "secret_abc"),
            (NOTION_ROOT_PAGE_ID, "https://www.notion.so/Docs-0123abcd"),
            (RELATIVE_URLS_ROOT, "https://github.com/acme/handbook/"),
        ]
    }

    #[test]
    fn complete_environment_parses_with_defaults() {
        let config = Config::from_lookup(env(&complete())).expect("config");
        assert_eq!(config.source_root, PathBuf::from("docs"));
        assert_eq!(config.repo_root, PathBuf::from("docs"));
        assert_eq!(config.root_page, RemoteId::from("0123abcd"));
        assert_eq!(config.relative_urls_root, "https://github.com/acme/handbook");
        assert!(!config.debug);
        assert!(config.tolerate_append_failures);
        assert!(!config.delete_orphans);
        assert_eq!(config.api_url, None);
    }

    #[rstest]
    #[case(FOLDER)]
    #[case(NOTION_TOKEN)]
    #[case(NOTION_ROOT_PAGE_ID)]
    #[case(RELATIVE_URLS_ROOT)]
    fn missing_required_variable_is_reported(#[case] name: &'static str) {
        let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != name).collect();
        let err = Config::from_lookup(env(&pairs)).expect_err("should fail");
        assert!(matches!(err, ConfigError::Missing { name: n } if n == name));
        assert_eq!(err.to_string(), format!("{name} not provided"));
    }

    #[test]
    fn empty_required_variable_counts_as_missing() {
        let mut pairs = complete();
        pairs[1] = (NOTION_TOKEN, "");
        let err = Config::from_lookup(env(&pairs)).expect_err("should fail");
        assert!(matches!(err, ConfigError::Missing { name: NOTION_TOKEN }));
    }

    #[rstest]
    #[case("https://www.notion.so/Docs-0123abcd", "0123abcd")]
    #[case("Team-Handbook-ffee99", "ffee99")]
    #[case("  Page-abc  ", "abc")]
    fn root_page_id_is_text_after_last_dash(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_root_page_id(input).expect("parse").as_str(), expected);
    }

    #[rstest]
    #[case("0123abcd")]
    #[case("Docs-")]
    #[case("Docs-abc/def")]
    #[case("Docs-abc?pvs=4")]
    fn malformed_root_page_is_rejected(#[case] input: &str) {
        let err = parse_root_page_id(input).expect_err("should fail");
        assert!(err.to_string().contains("-<page-id>"));
    }

    #[test]
    fn malformed_root_page_fails_config() {
        let mut pairs = complete();
        pairs[2] = (NOTION_ROOT_PAGE_ID, "not an id");
        let err = Config::from_lookup(env(&pairs)).expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidRootPage { .. }));
    }

    #[rstest]
    #[case(None, true, true)]
    #[case(None, false, false)]
    #[case(Some(""), true, false)]
    #[case(Some("0"), true, false)]
    #[case(Some("False"), true, false)]
    #[case(Some("off"), true, false)]
    #[case(Some("1"), false, true)]
    #[case(Some("yes"), false, true)]
    fn toggles_follow_truthiness_rules(
        #[case] raw: Option<&str>,
        #[case] default: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(flag(raw.map(str::to_string), default), expected);
    }

    #[test]
    fn optional_toggles_and_workspace_are_read() {
        let mut pairs = complete();
        pairs.push((DEBUG, "1"));
        pairs.push((IGNORE_CREATE_ERRORS, "false"));
        pairs.push((DELETE_ORPHANED_PAGES, "true"));
        pairs.push((GITHUB_WORKSPACE, "/home/runner/work/handbook"));
        let config = Config::from_lookup(env(&pairs)).expect("config");
        assert!(config.debug);
        assert!(!config.tolerate_append_failures);
        assert!(config.delete_orphans);
        assert_eq!(config.repo_root, PathBuf::from("/home/runner/work/handbook"));
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = Config::from_lookup(env(&complete())).expect("config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret_abc"));
        assert!(rendered.contains("<redacted>"));
    }
}
