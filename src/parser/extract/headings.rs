use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::parser::blocks::{ContentBlock, HeadingKeys};
use crate::parser::element_text;

static HEADING_OR_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, p").unwrap());

struct OpenBlock {
    level: u8,
    heading: String,
    texts: Vec<String>,
}

impl OpenBlock {
    fn close(self, keys: HeadingKeys) -> ContentBlock {
        ContentBlock::heading(self.level, self.heading, self.texts, keys)
    }
}

/// Group paragraphs under the h1/h2/h3 that precede them, inside the
/// element whose id is `content_id`. Paragraphs before the first heading
/// are dropped.
pub fn extract(document: &Html, content_id: &str, keys: HeadingKeys) -> Vec<ContentBlock> {
    let Some(container) = find_by_id(document, content_id) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for el in container.select(&HEADING_OR_PARAGRAPH) {
        match el.value().name() {
            "p" => {
                if let Some(block) = open.as_mut() {
                    let text = element_text(&el);
                    if !text.is_empty() {
                        block.texts.push(text);
                    }
                }
            }
            name => {
                if let Some(done) = open.take() {
                    blocks.push(done.close(keys));
                }
                open = Some(OpenBlock {
                    level: heading_level(name),
                    heading: element_text(&el),
                    texts: Vec::new(),
                });
            }
        }
    }

    if let Some(done) = open {
        blocks.push(done.close(keys));
    }

    blocks
}

fn find_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

fn heading_level(name: &str) -> u8 {
    match name {
        "h1" => 1,
        "h2" => 2,
        _ => 3,
    }
}

// ── Tests ──
