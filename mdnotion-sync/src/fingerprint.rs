//! Content fingerprints.
//!
//! Each synced page ends with a paragraph carrying `sha256: <hex>` of the
//! document body it was rendered from. The next pass compares that value with
//! the current body to decide whether the page needs rewriting.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use mdnotion_core::blocks::Annotations;
use mdnotion_core::{Block, RemoteBlock, RichText};

/// Tag that starts the fingerprint segment.
pub const FINGERPRINT_TAG: &str = "sha256:";

const DIGEST_HEX_LEN: usize = 64;

/// Hex SHA-256 digest of a document body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Accepts exactly 64 lowercase hex characters.
    pub fn parse(hex: &str) -> Option<Self> {
        let valid = hex.len() == DIGEST_HEX_LEN
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(hex.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{FINGERPRINT_TAG} {}", self.0)
    }
}

/// Fingerprint `body` after normalising CRLF to LF.
pub fn fingerprint(body: &str) -> Fingerprint {
    let normalized = body.replace("\r\n", "\n");
    let mut h = Sha256::new();
    h.update(normalized.as_bytes());
    Fingerprint(hex::encode(h.finalize()))
}

/// Read the fingerprint stored in a listed block, if it carries one.
pub fn extract_fingerprint(block: &RemoteBlock) -> Option<Fingerprint> {
    let paragraph = block.paragraph.as_ref()?;
    paragraph
        .rich_text
        .iter()
        .find_map(|segment| segment.content().trim_start().strip_prefix(FINGERPRINT_TAG))
        .and_then(|rest| Fingerprint::parse(rest.trim()))
}

/// Fingerprint stored at the end of a page's listing.
pub fn stored_fingerprint(blocks: &[RemoteBlock]) -> Option<Fingerprint> {
    blocks.last().and_then(extract_fingerprint)
}

/// A page must be rewritten unless it carries exactly `current`.
pub fn is_stale(stored: Option<&Fingerprint>, current: &Fingerprint) -> bool {
    stored != Some(current)
}

/// Trailing paragraph recording when the page was generated and from what.
pub fn fingerprint_block(fp: &Fingerprint, generated_at: DateTime<Utc>) -> Block {
    let style = || Annotations {
        italic: true,
        color: "gray".to_string(),
        ..Annotations::default()
    };
    Block::paragraph(vec![
        RichText::styled(
            format!("Generated on {}\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            style(),
        ),
        RichText::styled(fp.to_string(), style()),
    ])
}
