pub mod blocks;
pub mod extract;
pub mod locate;

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use unicode_normalization::UnicodeNormalization;
use url::Url;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Visible text of an element, whitespace collapsed and trimmed.
pub fn element_text(el: &ElementRef) -> String {
    let raw: String = el.text().collect();
    collapse_whitespace(&raw)
}

pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

/// Decode character references left over after HTML parsing
/// (double-encoded markup such as `&amp;eacute;`). Unknown names are kept.
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Entity-decode then canonically compose (NFC) a lead paragraph.
pub fn clean_lead_text(s: &str) -> String {
    decode_entities(s).nfc().collect()
}

/// Resolve an `href` against the page it came from. An empty href
/// resolves to `base` itself.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

// ── Tests ──
