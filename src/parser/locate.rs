use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::blocks::SectionReference;
use super::{element_text, resolve_href};
use crate::error::ScrapeError;

static TITLED_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[title]").unwrap());
static LINK_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// How section titles are matched against a page's links.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    /// Case-insensitive substring match on the anchor's `title` attribute.
    /// Output follows the requested title order.
    TitleAttribute,
    /// Exact match on visible link text inside the first `div` whose class
    /// contains `container_class`. Output follows document order.
    NavText { container_class: &'a str },
}

/// Resolve requested section titles to URLs on `page_url`'s HTML.
///
/// Titles that match nothing are left out; the caller decides what a miss
/// means. A missing navigation container is an error.
pub fn locate(
    html: &str,
    page_url: &Url,
    titles: &[String],
    strategy: Strategy<'_>,
) -> Result<Vec<SectionReference>, ScrapeError> {
    let document = Html::parse_document(html);
    match strategy {
        Strategy::TitleAttribute => Ok(by_title_attribute(&document, page_url, titles)),
        Strategy::NavText { container_class } => {
            by_nav_text(&document, page_url, titles, container_class)
        }
    }
}

fn by_title_attribute(document: &Html, page_url: &Url, titles: &[String]) -> Vec<SectionReference> {
    let anchors: Vec<ElementRef> = document.select(&TITLED_ANCHOR).collect();
    let mut found = Vec::new();

    for title in titles {
        let needle = title.to_lowercase();
        let anchor = anchors.iter().find(|a| {
            a.value()
                .attr("title")
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        });

        // The first titled match wins even if it carries no usable href.
        let Some(anchor) = anchor else {
            debug!("No anchor titled like {:?}", title);
            continue;
        };
        let href = anchor.value().attr("href").filter(|h| !h.trim().is_empty());
        match href.and_then(|h| resolve_href(page_url, h)) {
            Some(url) => found.push(SectionReference {
                title: title.clone(),
                url,
            }),
            None => debug!("Anchor for {:?} has no usable href", title),
        }
    }

    found
}

fn by_nav_text(
    document: &Html,
    page_url: &Url,
    titles: &[String],
    container_class: &str,
) -> Result<Vec<SectionReference>, ScrapeError> {
    let container = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().name() == "div"
                && el
                    .value()
                    .attr("class")
                    .is_some_and(|c| c.contains(container_class))
        })
        .ok_or_else(|| ScrapeError::LocatorMiss {
            what: format!(
                "no navigation container with class containing {:?} on {}",
                container_class, page_url
            ),
        })?;

    let found = container
        .select(&LINK_ANCHOR)
        .filter_map(|a| {
            let text = element_text(&a);
            if !titles.iter().any(|t| *t == text) {
                return None;
            }
            let url = resolve_href(page_url, a.value().attr("href")?)?;
            Some(SectionReference { title: text, url })
        })
        .collect();

    Ok(found)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn react_base() -> Url {
        Url::parse("https://react.dev/learn").unwrap()
    }

    fn aws_base() -> Url {
        Url::parse("https://docs.aws.amazon.com/lambda/latest/dg/welcome.html").unwrap()
    }

    #[test]
    fn title_attribute_substring() {
        let html = r#"<a title="Getting Started - Installation" href="/install">Go</a>"#;
        let refs = locate(html, &react_base(), &titles(&["Installation"]), Strategy::TitleAttribute).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].title, "Installation");
        assert_eq!(refs[0].url.as_str(), "https://react.dev/install");
    }

    #[test]
    fn title_attribute_case_insensitive_first_match() {
        let html = r#"
            <a title="MANAGING STATE overview" href="/learn/managing-state">1</a>
            <a title="Managing State" href="/learn/other">2</a>"#;
        let refs = locate(html, &react_base(), &titles(&["managing state"]), Strategy::TitleAttribute).unwrap();
        assert_eq!(refs[0].url.as_str(), "https://react.dev/learn/managing-state");
    }

    #[test]
    fn title_attribute_keeps_requested_order_and_skips_misses() {
        let html = r#"
            <a title="Escape Hatches" href="/learn/escape-hatches">e</a>
            <a title="Installation" href="/learn/installation">i</a>"#;
        let refs = locate(
            html,
            &react_base(),
            &titles(&["Installation", "Describing the UI", "Escape Hatches"]),
            Strategy::TitleAttribute,
        )
        .unwrap();
        let got: Vec<&str> = refs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(got, vec!["Installation", "Escape Hatches"]);
    }

    #[test]
    fn react_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/react_learn.html").unwrap();
        let wanted = titles(&[
            "Installation",
            "Describing the UI",
            "Adding Interactivity",
            "Managing State",
            "Escape Hatches",
        ]);
        let refs = locate(&html, &react_base(), &wanted, Strategy::TitleAttribute).unwrap();
        assert_eq!(refs.len(), 5);
        assert_eq!(refs[1].url.as_str(), "https://react.dev/learn/describing-the-ui");
    }

    #[test]
    fn nav_text_exact_match_only() {
        let html = r#"
            <div class="awsui_list-container_l0dv0_1k6s2_221">
              <a href="lambda-welcome.html">What is AWS Lambda? (overview)</a>
              <a href="example-apps.html"> Example apps </a>
            </div>"#;
        let refs = locate(
            html,
            &aws_base(),
            &titles(&["What is AWS Lambda?", "Example apps"]),
            Strategy::NavText { container_class: "list-container" },
        )
        .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].title, "Example apps");
        assert_eq!(
            refs[0].url.as_str(),
            "https://docs.aws.amazon.com/lambda/latest/dg/example-apps.html"
        );
    }

    #[test]
    fn nav_text_ignores_links_outside_container() {
        let html = r#"
            <a href="/outside">Example apps</a>
            <div class="side list-container"><a href="/inside">Code examples</a></div>"#;
        let refs = locate(
            html,
            &aws_base(),
            &titles(&["Example apps", "Code examples"]),
            Strategy::NavText { container_class: "list-container" },
        )
        .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url.as_str(), "https://docs.aws.amazon.com/inside");
    }

    #[test]
    fn title_attribute_empty_href_is_a_miss() {
        let html = r#"<a title="Installation" href="  ">Installation</a>"#;
        let refs = locate(html, &react_base(), &titles(&["Installation"]), Strategy::TitleAttribute).unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn nav_text_empty_href_resolves_to_page() {
        let html = r#"<div class="list-container"><a href="">Example apps</a></div>"#;
        let refs = locate(
            html,
            &aws_base(),
            &titles(&["Example apps"]),
            Strategy::NavText { container_class: "list-container" },
        )
        .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, aws_base());
    }

    #[test]
    fn nav_text_missing_container() {
        let result = locate(
            "<div class=\"nav\"><a href=\"/x\">Example apps</a></div>",
            &aws_base(),
            &titles(&["Example apps"]),
            Strategy::NavText { container_class: "list-container" },
        );
        assert!(matches!(result, Err(ScrapeError::LocatorMiss { .. })));
    }

    #[test]
    fn aws_fixture_document_order() {
        let html = std::fs::read_to_string("tests/fixtures/aws_welcome_rendered.html").unwrap();
        let wanted = titles(&[
            "What is AWS Lambda?",
            "Example apps",
            "Building with TypeScript",
            "Integrating other services",
            "Code examples",
        ]);
        let refs = locate(&html, &aws_base(), &wanted, Strategy::NavText { container_class: "list-container" })
            .unwrap();
        let got: Vec<&str> = refs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            got,
            vec!["What is AWS Lambda?", "Example apps", "Code examples", "Building with TypeScript"]
        );
        assert!(refs.iter().all(|r| r.url.as_str().starts_with("https://docs.aws.amazon.com/")));
    }
}
