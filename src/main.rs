//! # AI Safety Scraper
//!
//! A polite web scraper for the public sites of AI safety organizations,
//! plus utilities for working with the JSON archives it produces.
//!
//! ## Features
//!
//! - Scrapes ten AI safety organizations (METR, UK AISI, Lakera, NIST AISI,
//!   the Canadian AI Safety Institute, Apollo Research, Anthropic, Google
//!   DeepMind, CSER, and CHAI) through one shared, config-driven engine
//! - Honors robots.txt rules and crawl delays, with per-host rate limiting
//! - Converts page HTML to clean text with inline `[text](url)` link markers
//! - Writes one JSON file per site, atomically
//! - Filters archives by date range and keyword, streaming record by record
//! - Splits archives into near-equal parts for downstream processing
//!
//! ## Usage
//!
//! ```sh
//! ai_safety_scraper scrape --output-dir ./scraped_data
//! ai_safety_scraper filter metr_org_data.json --keyword evaluation
//! ai_safety_scraper split metr_org_data.json --parts 3
//! ```

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod extract;
mod fetch;
mod filter;
mod models;
mod robots;
mod scrapers;
mod split;
mod store;

use cli::{Cli, Command};
use fetch::Fetcher;
use filter::FilterCriteria;
use models::output_filename;
use scrapers::SiteScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Scrape {
            site,
            output_dir,
            delay,
        } => {
            let min_delay = Duration::from_secs_f64(delay.max(0.0));
            match site {
                Some(site) => {
                    let scraper = scrapers::create_scraper(&site, Fetcher::new(min_delay)?)?;
                    scrape_one(scraper, &output_dir).await?;
                }
                None => {
                    // Sites are scraped one after another; a failure on one
                    // site is reported and the rest still run.
                    let mut failures = 0usize;
                    for config in scrapers::REGISTRY {
                        let scraper = SiteScraper::new(config, Fetcher::new(min_delay)?);
                        let source = scraper.source();
                        if let Err(e) = scrape_one(scraper, &output_dir).await {
                            error!(source, error = %e, "Site scrape failed");
                            failures += 1;
                        }
                    }
                    if failures == scrapers::REGISTRY.len() {
                        return Err("every site scrape failed".into());
                    }
                }
            }
        }
        Command::Filter {
            input,
            from,
            to,
            keyword,
        } => {
            let criteria = FilterCriteria { from, to, keyword };
            let output = filter::filter_file(&input, &criteria)?;
            info!(output = %output.display(), "Filter complete");
        }
        Command::Split { input, parts } => {
            let outputs = split::split_file(&input, parts)?;
            info!(parts = outputs.len(), "Split complete");
        }
    }

    Ok(())
}

async fn scrape_one(mut scraper: SiteScraper, output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let records = scraper.scrape_all().await?;
    let path = output_dir.join(output_filename(scraper.base_url()));
    store::save(&records, &path)?;
    Ok(())
}
