use thiserror::Error;

/// Non-fatal failures recorded while scraping a site.
///
/// None of these abort a run: the caller logs them, drops the affected
/// section (or treats its page as empty) and moves on.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("timed out after {waited_secs}s waiting for .{marker} on {url}")]
    Timeout {
        url: String,
        marker: String,
        waited_secs: u64,
    },

    #[error("locator miss: {what}")]
    LocatorMiss { what: String },

    #[error("browser session failed: {0}")]
    Browser(String),

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScrapeError {
    pub fn status(url: &str, status: u16) -> Self {
        ScrapeError::Fetch {
            url: url.to_string(),
            status: Some(status),
            reason: format!("HTTP {}", status),
        }
    }

    pub fn network(url: &str, err: impl std::fmt::Display) -> Self {
        ScrapeError::Fetch {
            url: url.to_string(),
            status: None,
            reason: err.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch { .. } => "fetch",
            ScrapeError::Timeout { .. } => "timeout",
            ScrapeError::LocatorMiss { .. } => "locator_miss",
            ScrapeError::Browser(_) => "browser",
            ScrapeError::InvalidUrl { .. } => "invalid_url",
        }
    }
}
