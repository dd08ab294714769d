//! Scoped headless-browser session used for client-rendered pages.
//!
//! A session owns one Chromium process. It is launched per dynamic fetch,
//! never shared, and torn down before the fetch returns. Dropping a session
//! without calling [`BrowserSession::close`] still kills the process.

use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::BrowserSettings;
use crate::error::ScrapeError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| ScrapeError::Browser(format!("bad browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Browser(format!("failed to launch Chromium: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser session started");
        Ok(Self { browser, handler })
    }

    /// Navigate to `url`, wait up to `timeout` for an element carrying class
    /// `wait_marker` (if given) and return the rendered HTML.
    pub async fn render(
        &mut self,
        url: &Url,
        wait_marker: Option<&str>,
        timeout: Duration,
    ) -> Result<String, ScrapeError> {
        let page = self
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| ScrapeError::Browser(format!("navigation to {} failed: {}", url, e)))?;

        let result = capture(&page, url, wait_marker, timeout).await;
        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }
        result
    }

    /// Close the browser and reap its process.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed, killing process: {}", e);
            let _ = self.browser.kill().await;
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser wait failed: {}", e);
        }
        debug!("Browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

async fn capture(
    page: &Page,
    url: &Url,
    wait_marker: Option<&str>,
    timeout: Duration,
) -> Result<String, ScrapeError> {
    if let Some(marker) = wait_marker {
        let selector = format!(".{}", marker);
        let start = Instant::now();
        let appeared = tokio::time::timeout(timeout, async {
            while page.find_element(selector.as_str()).await.is_err() {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        if appeared.is_err() {
            return Err(ScrapeError::Timeout {
                url: url.to_string(),
                marker: marker.to_string(),
                waited_secs: timeout.as_secs(),
            });
        }
        debug!("Marker .{} present after {:?}", marker, start.elapsed());
    }

    page.content()
        .await
        .map_err(|e| ScrapeError::Browser(format!("failed to read HTML of {}: {}", url, e)))
}

/// Launch a session, render one page, and tear the session down whatever
/// the outcome.
pub async fn render_once(
    settings: &BrowserSettings,
    url: &Url,
    wait_marker: Option<&str>,
) -> Result<String, ScrapeError> {
    let mut session = BrowserSession::launch(settings).await?;
    let result = session
        .render(url, wait_marker, Duration::from_secs(settings.wait_timeout_secs))
        .await;
    session.close().await;
    result
}

// ── Tests ──
