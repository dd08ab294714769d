use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{FetchMode, MissingTitle, SiteConfig};
use crate::error::ScrapeError;
use crate::fetcher::{Fetch, PageSource};
use crate::parser::blocks::{PageRecord, SectionReference};
use crate::parser::extract;
use crate::parser::locate;

/// Everything one site produced: the records to write and the failures
/// that were skipped over on the way.
pub struct SiteReport {
    pub source: String,
    pub records: Vec<PageRecord>,
    pub failures: Vec<ScrapeError>,
}

impl SiteReport {
    fn new(source: &str) -> Self {
        SiteReport {
            source: source.to_string(),
            records: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, err: ScrapeError) {
        warn!("[{}] {}", self.source, err);
        self.failures.push(err);
    }
}

/// Scrape every site in order. Sites never fail as a whole; see each
/// report's `failures`.
pub async fn scrape_all<S: PageSource + ?Sized>(source: &S, sites: &[SiteConfig]) -> Vec<SiteReport> {
    let mut reports = Vec::with_capacity(sites.len());
    for site in sites {
        reports.push(scrape_site(source, site).await);
    }
    reports
}

pub async fn scrape_site<S: PageSource + ?Sized>(source: &S, site: &SiteConfig) -> SiteReport {
    let mut report = SiteReport::new(&site.source);
    let Some(base) = parse_site_url(site, &mut report) else {
        return report;
    };

    let sections = locate_sections(source, site, &base, &mut report).await;
    info!("[{}] {} of {} sections located", site.source, sections.len(), site.titles.len());
    if sections.is_empty() {
        return report;
    }

    let pb = progress_bar(sections.len());
    let mode = site.extract_mode();

    for section in &sections {
        pb.set_message(section.title.clone());
        // Section pages are always plain HTML; a failed fetch leaves the
        // record in place with no content.
        let content = match source.fetch(&section.url, Fetch::Static).await {
            Ok(html) => {
                let blocks = extract::extract(&html, &base, mode);
                let paragraphs: usize = blocks.iter().map(|b| b.texts().len()).sum();
                debug!("{}: {} blocks, {} paragraphs", section.url, blocks.len(), paragraphs);
                blocks
            }
            Err(e) => {
                report.fail(e);
                Vec::new()
            }
        };
        report.records.push(PageRecord::new(section, &site.source, content));
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("[{}] {} records, {} failures", site.source, report.records.len(), report.failures.len());
    report
}

/// Resolve the site's requested titles without fetching section pages.
pub async fn locate_site<S: PageSource + ?Sized>(
    source: &S,
    site: &SiteConfig,
) -> (Vec<SectionReference>, Vec<ScrapeError>) {
    let mut report = SiteReport::new(&site.source);
    let sections = match parse_site_url(site, &mut report) {
        Some(base) => locate_sections(source, site, &base, &mut report).await,
        None => Vec::new(),
    };
    (sections, report.failures)
}

fn parse_site_url(site: &SiteConfig, report: &mut SiteReport) -> Option<Url> {
    match Url::parse(&site.url) {
        Ok(url) => Some(url),
        Err(e) => {
            report.fail(ScrapeError::InvalidUrl {
                url: site.url.clone(),
                reason: e.to_string(),
            });
            None
        }
    }
}

async fn locate_sections<S: PageSource + ?Sized>(
    source: &S,
    site: &SiteConfig,
    base: &Url,
    report: &mut SiteReport,
) -> Vec<SectionReference> {
    let how = match site.mode {
        FetchMode::Static => Fetch::Static,
        FetchMode::Dynamic => Fetch::Dynamic {
            wait_marker: site.wait_marker.as_deref(),
        },
    };

    let html = match source.fetch(base, how).await {
        Ok(html) => html,
        Err(e) => {
            report.fail(e);
            return Vec::new();
        }
    };

    let found = match locate::locate(&html, base, &site.titles, site.strategy()) {
        Ok(found) => found,
        Err(e) => {
            report.fail(e);
            return Vec::new();
        }
    };

    for title in &site.titles {
        if !found.iter().any(|r| &r.title == title) {
            report.fail(ScrapeError::LocatorMiss {
                what: format!("no section titled {:?}", title),
            });
        }
    }

    match (site.mode, site.on_missing) {
        // Requested order, with the index page standing in for misses.
        (FetchMode::Static, MissingTitle::Fallback) => site
            .titles
            .iter()
            .map(|title| SectionReference {
                title: title.clone(),
                url: found
                    .iter()
                    .find(|r| &r.title == title)
                    .map_or_else(|| base.clone(), |r| r.url.clone()),
            })
            .collect(),
        _ => found,
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

// ── Tests ──
