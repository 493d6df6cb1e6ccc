//! Local document discovery.
//!
//! Walks the source root for `*.md` files, extracts each document's title and
//! body, and builds the [`LocalInventory`] in priority order.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{io_err, LoadError};
use crate::types::{Document, LocalInventory, Title, DEFAULT_TITLE};

const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Load every Markdown document under `root`.
///
/// A `README.md` directly at `root` comes first; all other documents keep
/// discovery order. When two documents share a title the later one replaces
/// the earlier one in its original position.
pub fn load(root: &Path) -> Result<LocalInventory, LoadError> {
    let root = root
        .canonicalize()
        .map_err(|_| LoadError::RootNotFound {
            path: root.to_path_buf(),
        })?;
    if !root.is_dir() {
        return Err(LoadError::RootNotFound { path: root });
    }

    let mut paths = Vec::new();
    discover(&root, &mut paths)?;
    if let Some(pos) = paths.iter().position(|p| is_root_readme(&root, p)) {
        let readme = paths.remove(pos);
        paths.insert(0, readme);
    }

    let mut inventory = LocalInventory::new();
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let document = parse_document(path, &content);
        if let Some(previous) = inventory.get(&document.title) {
            warn!(
                title = %document.title,
                kept = %document.path.display(),
                replaced = %previous.path.display(),
                "duplicate document title"
            );
        }
        inventory.insert(document.title.clone(), document);
    }
    debug!(count = inventory.len(), root = %root.display(), "loaded local documents");
    Ok(inventory)
}

/// Build a [`Document`] from a file's content.
pub fn parse_document(path: PathBuf, content: &str) -> Document {
    match extract_title(content) {
        Some((title, start, end)) => {
            let mut body = String::with_capacity(content.len());
            body.push_str(&content[..start]);
            body.push_str(&content[end..]);
            Document {
                title: Title::from(title),
                path,
                body,
            }
        }
        None => Document {
            title: Title::from(DEFAULT_TITLE),
            path,
            body: content.to_string(),
        },
    }
}

/// Find the first `# <text>` line outside fenced code.
///
/// Returns the trimmed text and the byte range of the whole line, including
/// its line terminator.
fn extract_title(content: &str) -> Option<(&str, usize, usize)> {
    let mut fence: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let text = line.trim_end_matches(['\n', '\r']);
        let indented = text.trim_start();

        if let Some(marker) = fence {
            if indented.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if indented.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if indented.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        let Some(rest) = text.strip_prefix('#') else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let title = rest.trim();
        if !title.is_empty() {
            return Some((title, start, offset));
        }
    }
    None
}

fn discover(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let meta = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if meta.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            discover(&path, out)?;
        } else if meta.is_file() && is_markdown(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn is_root_readme(root: &Path, path: &Path) -> bool {
    path.parent() == Some(root)
        && path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case("README.md"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
