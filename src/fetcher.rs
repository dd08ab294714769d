use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use crate::browser;
use crate::config::{BrowserSettings, Settings};
use crate::error::ScrapeError;

/// How a page is retrieved.
#[derive(Debug, Clone, Copy)]
pub enum Fetch<'a> {
    /// Plain HTTP GET; anything but 200 is a failure.
    Static,
    /// Rendered in a fresh browser session, optionally waiting for an
    /// element with class `wait_marker` first.
    Dynamic { wait_marker: Option<&'a str> },
}

/// Anything that can turn a URL into HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url, how: Fetch<'_>) -> Result<String, ScrapeError>;
}

pub struct Fetcher {
    client: reqwest::Client,
    browser: BrowserSettings,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(settings.request_timeout_secs));
        if let Some(ua) = &settings.user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            browser: settings.browser.clone(),
        })
    }

    async fn get(&self, url: &Url) -> Result<String, ScrapeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ScrapeError::network(url.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::status(url.as_str(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::network(url.as_str(), e))?;
        debug!("GET {} -> {} bytes in {}ms", url, body.len(), start.elapsed().as_millis());
        Ok(body)
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch(&self, url: &Url, how: Fetch<'_>) -> Result<String, ScrapeError> {
        match how {
            Fetch::Static => self.get(url).await,
            Fetch::Dynamic { wait_marker } => {
                info!("Rendering {} in browser", url);
                browser::render_once(&self.browser, url, wait_marker).await
            }
        }
    }
}

// ── Tests ──
