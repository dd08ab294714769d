use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::parser::blocks::{ArticleLink, ContentBlock};
use crate::parser::{clean_lead_text, element_text, resolve_href};

static ARTICLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static LIST_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul li a[href], ol li a[href]").unwrap());

/// One block per top-level `<article>`: its first paragraph as `Info` and
/// every link found inside a list item. Articles with neither are dropped.
pub fn extract(document: &Html, base_url: &Url) -> Vec<ContentBlock> {
    document
        .select(&ARTICLE)
        .filter(|article| !is_nested_article(article))
        .filter_map(|article| article_block(&article, base_url))
        .collect()
}

fn article_block(article: &ElementRef, base_url: &Url) -> Option<ContentBlock> {
    let info = article
        .select(&PARAGRAPH)
        .next()
        .map(|p| clean_lead_text(&element_text(&p)))
        .filter(|t| !t.is_empty());

    let links: Vec<ArticleLink> = article
        .select(&LIST_LINK)
        .filter_map(|a| {
            let link = resolve_href(base_url, a.value().attr("href")?)?;
            Some(ArticleLink {
                subtopic: element_text(&a),
                link: link.to_string(),
            })
        })
        .collect();

    if info.is_none() && links.is_empty() {
        return None;
    }
    Some(ContentBlock::Article { info, links })
}

fn is_nested_article(article: &ElementRef) -> bool {
    article
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "article")
}

// ── Tests ──
