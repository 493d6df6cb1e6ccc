//! The document renderer capability.

use crate::blocks::Block;
use crate::types::Document;

/// Turns documents into page content.
///
/// Implementations must be deterministic: the same document always renders
/// to equivalent blocks. The fingerprint block is not part of the output; the
/// sync engine appends it.
pub trait Render {
    /// Full page content for `document`, page chrome included.
    fn render(&self, document: &Document) -> Vec<Block>;

    /// Visible in-page notice used when writing the real content failed.
    fn render_notice(&self, message: &str) -> Vec<Block>;
}
