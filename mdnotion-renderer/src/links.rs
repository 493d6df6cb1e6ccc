//! Rewrites repository-relative URLs in rendered content.

use tracing::trace;

use mdnotion_core::blocks::{visit_links_mut, Block, Link};

/// Maps links found in a document onto the repository's web UI.
///
/// * `http…` URLs are kept as is.
/// * `#anchor` URLs point at the repository root.
/// * Other URLs with a scheme (`mailto:` and the like) are kept as is; they
///   name no file in the repository, so a `tree/master` link would be broken.
/// * Everything else is taken as a path in the repository and becomes
///   `<root>/tree/master/<path>`.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    root: String,
}

impl LinkRewriter {
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn rewrite(&self, url: &str) -> String {
        if url.starts_with("http") || has_scheme(url) {
            url.to_string()
        } else if url.starts_with('#') {
            self.root.clone()
        } else {
            let path = url.strip_prefix("./").unwrap_or(url);
            format!("{}/tree/master/{}", self.root, path)
        }
    }

    /// Rewrite every link in `blocks`, nested children included.
    pub fn apply(&self, blocks: &mut [Block]) {
        visit_links_mut(blocks, &mut |link: &mut Link| {
            let rewritten = self.rewrite(&link.url);
            if rewritten != link.url {
                trace!(from = %link.url, to = %rewritten, "rewrote link");
                link.url = rewritten;
            }
        });
    }
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
