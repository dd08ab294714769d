use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::parser::blocks::HeadingKeys;
use crate::parser::extract::Mode;
use crate::parser::locate::Strategy;

const DEFAULT_CONFIG_FILE: &str = "docs_scraper.toml";
const ENV_PREFIX: &str = "DOCS_SCRAPER";
const DEFAULT_OUTPUT: &str = "documentation_scraped.json";
const DEFAULT_CONTAINER_CLASS: &str = "list-container";
const DEFAULT_CONTENT_ID: &str = "main-col-body";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: Option<String>,
    pub browser: BrowserSettings,
    pub sites: Vec<SiteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub executable: Option<PathBuf>,
    pub wait_timeout_secs: u64,
    pub headless: bool,
}

/// How a site's index page is fetched, and therefore how its sections are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Plain GET, sections matched by anchor `title` attribute.
    #[default]
    Static,
    /// Browser-rendered, sections matched by nav link text.
    Dynamic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    #[default]
    Articles,
    Headings,
}

/// What to do with a requested title the locator could not find.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTitle {
    #[default]
    Skip,
    /// Scrape the site's index URL under the missing title (static sites only).
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    pub source: String,
    pub titles: Vec<String>,
    #[serde(default)]
    pub mode: FetchMode,
    /// CSS class the browser waits for before capturing HTML.
    #[serde(default)]
    pub wait_marker: Option<String>,
    #[serde(default = "default_container_class")]
    pub container_class: String,
    #[serde(default)]
    pub extract: ExtractMode,
    #[serde(default = "default_content_id")]
    pub content_id: String,
    #[serde(default)]
    pub heading_keys: HeadingKeys,
    #[serde(default)]
    pub on_missing: MissingTitle,
}

fn default_container_class() -> String {
    DEFAULT_CONTAINER_CLASS.to_string()
}

fn default_content_id() -> String {
    DEFAULT_CONTENT_ID.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output: PathBuf::from(DEFAULT_OUTPUT),
            request_timeout_secs: 30,
            user_agent: None,
            browser: BrowserSettings::default(),
            sites: vec![react_site(), aws_lambda_site()],
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        BrowserSettings {
            executable: None,
            wait_timeout_secs: 10,
            headless: true,
        }
    }
}

fn react_site() -> SiteConfig {
    SiteConfig {
        url: "https://react.dev/learn".into(),
        source: "react".into(),
        titles: to_strings(&[
            "Installation",
            "Describing the UI",
            "Adding Interactivity",
            "Managing State",
            "Escape Hatches",
        ]),
        mode: FetchMode::Static,
        wait_marker: None,
        container_class: default_container_class(),
        extract: ExtractMode::Articles,
        content_id: default_content_id(),
        heading_keys: HeadingKeys::Unified,
        on_missing: MissingTitle::Skip,
    }
}

fn aws_lambda_site() -> SiteConfig {
    SiteConfig {
        url: "https://docs.aws.amazon.com/lambda/latest/dg/welcome.html".into(),
        source: "aws_lambda".into(),
        titles: to_strings(&[
            "What is AWS Lambda?",
            "Example apps",
            "Building with TypeScript",
            "Integrating other services",
            "Code examples",
        ]),
        mode: FetchMode::Dynamic,
        wait_marker: Some("awsui_list-container_l0dv0_1k6s2_221".into()),
        container_class: default_container_class(),
        extract: ExtractMode::Headings,
        content_id: default_content_id(),
        heading_keys: HeadingKeys::Unified,
        on_missing: MissingTitle::Skip,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Built-in defaults, overlaid by the TOML file (explicit `path`, or
    /// `docs_scraper.toml` if present) and then `DOCS_SCRAPER_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Keep only the sites whose source label is in `sources` (all if empty).
    pub fn retain_sources(&mut self, sources: &[String]) {
        if sources.is_empty() {
            return;
        }
        self.sites.retain(|s| sources.contains(&s.source));
    }
}

impl SiteConfig {
    pub fn strategy(&self) -> Strategy<'_> {
        match self.mode {
            FetchMode::Static => Strategy::TitleAttribute,
            FetchMode::Dynamic => Strategy::NavText {
                container_class: &self.container_class,
            },
        }
    }

    pub fn extract_mode(&self) -> Mode<'_> {
        match self.extract {
            ExtractMode::Articles => Mode::Articles,
            ExtractMode::Headings => Mode::Headings {
                content_id: &self.content_id,
                keys: self.heading_keys,
            },
        }
    }
}

// ── Tests ──
