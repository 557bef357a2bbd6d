//! Command-line interface definitions for the AI safety scraper.
//!
//! This module defines the CLI subcommands and options using the `clap`
//! crate. Each subcommand maps to one stage of the workflow: scraping sites
//! into JSON archives, filtering an archive, or splitting one into parts.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the AI safety scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every supported organization into ./scraped_data
/// ai_safety_scraper scrape
///
/// # Scrape a single site
/// ai_safety_scraper scrape --site https://metr.org --output-dir ./out
///
/// # Keep only records mentioning "evaluation" from 2024
/// ai_safety_scraper filter metr_org_data.json \
///     --from 2024-01-01 --to 2024-12-31 --keyword evaluation
///
/// # Split an archive into three parts
/// ai_safety_scraper split metr_org_data.json --parts 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape supported organizations into per-site JSON files
    Scrape {
        /// Scrape only the site matching this URL instead of all of them
        #[arg(short, long)]
        site: Option<String>,

        /// Directory the per-site JSON files are written to
        #[arg(short, long, default_value = "scraped_data")]
        output_dir: PathBuf,

        /// Minimum delay between requests to the same host, in seconds
        #[arg(long, default_value_t = 1.0)]
        delay: f64,
    },

    /// Filter a record file by date range and keyword
    Filter {
        /// Input JSON file produced by `scrape`
        input: PathBuf,

        /// Keep records dated on or after this day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Keep records dated on or before this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Keep records whose title or body contains this text
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Split a record file into N parts of near-equal size
    Split {
        /// Input JSON file produced by `scrape`
        input: PathBuf,

        /// Number of output parts
        #[arg(short, long)]
        parts: usize,
    },
}
