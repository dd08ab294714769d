mod browser;
mod config;
mod error;
mod fetcher;
mod output;
mod parser;
mod pipeline;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::Settings;
use crate::fetcher::Fetcher;

#[derive(Parser)]
#[command(name = "docs_scraper", about = "Scrape documentation sections into JSON")]
struct Cli {
    /// TOML config file (default: ./docs_scraper.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output file, overriding the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only scrape sites with this source label (repeatable)
    #[arg(short, long = "site")]
    sites: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve section URLs without scraping their content
    Locate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.retain_sources(&cli.sites);
    if let Some(path) = cli.output {
        settings.output = path;
    }
    if settings.sites.is_empty() {
        warn!("No sites configured");
    }

    let fetcher = Fetcher::new(&settings)?;

    match cli.command {
        Some(Commands::Locate) => {
            for site in &settings.sites {
                let (sections, failures) = pipeline::locate_site(&fetcher, site).await;
                println!("{} ({} of {} found)", site.source, sections.len(), site.titles.len());
                for s in &sections {
                    println!("  {:<32} {}", s.title, s.url);
                }
                for f in &failures {
                    println!("  ! {}", f);
                }
            }
        }
        None => {
            info!("Scraping {} sites", settings.sites.len());
            let reports = pipeline::scrape_all(&fetcher, &settings.sites).await;

            let mut failure_kinds: BTreeMap<&str, usize> = BTreeMap::new();
            for f in reports.iter().flat_map(|r| &r.failures) {
                *failure_kinds.entry(f.kind()).or_default() += 1;
            }
            if !failure_kinds.is_empty() {
                warn!("Skipped over failures: {:?}", failure_kinds);
            }

            let records: Vec<_> = reports.into_iter().flat_map(|r| r.records).collect();
            output::write_records(&settings.output, &records)?;
            println!("Scraping completed. Data saved to {}", settings.output.display());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
