//! mdnotion renderer: Markdown documents to Notion page content.
//!
//! - [`markdown`]: pulldown-cmark event stream to [`Block`](mdnotion_core::Block)s
//! - [`links`]: repository-relative URL rewriting
//! - [`page`]: [`PageRenderer`], the [`Render`](mdnotion_core::Render) implementation

pub mod links;
pub mod markdown;
pub mod page;

pub use links::LinkRewriter;
pub use page::PageRenderer;
