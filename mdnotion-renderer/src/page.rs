//! Full page rendering: header chrome, document body, trailer.

use std::path::{Component, Path, PathBuf};

use mdnotion_core::blocks::{Annotations, Block, ExternalFile, Icon, RichText};
use mdnotion_core::{Document, Render};

use crate::links::LinkRewriter;
use crate::markdown;

pub const GITHUB_MARK_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";
const VIEW_IN_GITHUB: &str = "View this file in GitHub";

/// [`Render`] implementation used by the `mdnotion` binary.
///
/// The page is a spacer, a "View this file in GitHub" callout and another
/// spacer, then the document body with its links rewritten, then a spacer,
/// a divider and a spacer.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    links: LinkRewriter,
    repo_root: PathBuf,
}

impl PageRenderer {
    /// `links_root` is the repository URL; `repo_root` is the local checkout
    /// that document paths are made relative to.
    pub fn new(links_root: impl Into<String>, repo_root: impl AsRef<Path>) -> Self {
        let repo_root = repo_root.as_ref();
        Self {
            links: LinkRewriter::new(links_root),
            repo_root: repo_root
                .canonicalize()
                .unwrap_or_else(|_| repo_root.to_path_buf()),
        }
    }

    /// `<root>/blob/master/<path relative to the repository root>`.
    pub fn source_url(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.repo_root).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        format!("{}/blob/master/{}", self.links.root(), parts.join("/"))
    }

    fn header(&self, document: &Document) -> Vec<Block> {
        let label = RichText::styled(
            VIEW_IN_GITHUB,
            Annotations {
                bold: true,
                ..Annotations::default()
            },
        )
        .with_link(self.source_url(&document.path));
        let icon = Icon::External {
            external: ExternalFile {
                url: GITHUB_MARK_URL.to_string(),
            },
        };
        vec![
            Block::spacer(),
            Block::callout(vec![label], Some(icon)),
            Block::spacer(),
        ]
    }
}

fn trailer() -> Vec<Block> {
    vec![Block::spacer(), Block::divider(), Block::spacer()]
}

impl Render for PageRenderer {
    fn render(&self, document: &Document) -> Vec<Block> {
        let mut body = markdown::to_blocks(&document.body);
        self.links.apply(&mut body);

        let mut blocks = self.header(document);
        blocks.extend(body);
        blocks.extend(trailer());
        blocks
    }

    fn render_notice(&self, message: &str) -> Vec<Block> {
        let blocks = markdown::to_blocks(message);
        if blocks.is_empty() {
            vec![Block::paragraph(vec![RichText::plain(message)])]
        } else {
            blocks
        }
    }
}
