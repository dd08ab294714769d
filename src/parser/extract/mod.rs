pub mod articles;
pub mod headings;

use scraper::Html;
use url::Url;

use super::blocks::{ContentBlock, HeadingKeys};

/// Which block-grouping strategy a section page is read with.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Heading-grouped blocks from the element with id `content_id`.
    Headings { content_id: &'a str, keys: HeadingKeys },
    /// One block per top-level `<article>`.
    Articles,
}

/// Turn a section page into content blocks.
///
/// `base_url` is what relative article links resolve against. Pages that
/// contain nothing recognisable yield an empty list.
pub fn extract(html: &str, base_url: &Url, mode: Mode<'_>) -> Vec<ContentBlock> {
    let document = Html::parse_document(html);
    match mode {
        Mode::Headings { content_id, keys } => headings::extract(&document, content_id, keys),
        Mode::Articles => articles::extract(&document, base_url),
    }
}

// ── Tests ──
