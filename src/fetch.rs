//! Rate-limited HTTP fetching with robots.txt courtesy.
//!
//! The fetcher owns one `reqwest` client plus two per-host maps: the time of
//! the last request (for the minimum inter-request delay) and the parsed
//! robots.txt rules (fetched once per host, before the first page request).
//! Transient failures are retried with exponential backoff and jitter.
//!
//! # Retry strategy
//!
//! - Transport errors, 429 and 5xx responses are retried
//! - Delay doubles per attempt from the base, capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::error::{Result, ScrapeError};
use crate::robots::RobotsRules;
use rand::{Rng, rng};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

const USER_AGENT: &str = concat!("ai_safety_scraper/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;
const MAX_RETRIES: usize = 3;
const BASE_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    /// Minimum delay between consecutive requests to the same host.
    min_delay: Duration,
    last_request: HashMap<String, Instant>,
    robots: HashMap<String, RobotsRules>,
}

impl Fetcher {
    pub fn new(min_delay: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            min_delay,
            last_request: HashMap::new(),
            robots: HashMap::new(),
        })
    }

    /// Fetch a page body, enforcing robots.txt and the per-host delay.
    ///
    /// Returns [`ScrapeError::PolicyDisallowed`] without touching the network
    /// when the host's robots.txt forbids the path, and
    /// [`ScrapeError::Fetch`] once retries are exhausted.
    #[instrument(level = "info", skip(self), fields(url = %url))]
    pub async fn fetch(&mut self, url: &Url) -> Result<String> {
        let host = url
            .host_str()
            .ok_or_else(|| ScrapeError::Fetch {
                url: url.to_string(),
                status: None,
                reason: "URL has no host".to_string(),
            })?
            .to_string();

        let rules = self.robots_for(url, &host).await;
        if !rules.is_allowed(url.path()) {
            return Err(ScrapeError::PolicyDisallowed(url.to_string()));
        }
        // robots.txt Crawl-delay wins over our default when it is longer.
        let delay = rules.crawl_delay.unwrap_or(self.min_delay).max(self.min_delay);

        self.wait_for_host(&host, delay).await;
        self.get_with_backoff(url).await
    }

    /// Look up cached robots.txt rules for `host`, fetching them on first use.
    /// An unfetchable robots.txt means allow-all.
    async fn robots_for(&mut self, url: &Url, host: &str) -> RobotsRules {
        if let Some(rules) = self.robots.get(host) {
            return rules.clone();
        }

        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        self.wait_for_host(host, self.min_delay).await;
        let rules = match self.client.get(robots_url.as_str()).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => {
                    debug!(%host, "Parsed robots.txt");
                    RobotsRules::parse(&body, USER_AGENT)
                }
                Err(e) => {
                    warn!(%host, error = %e, "Failed reading robots.txt body; assuming allow-all");
                    RobotsRules::default()
                }
            },
            Ok(resp) => {
                debug!(%host, status = %resp.status(), "No usable robots.txt; assuming allow-all");
                RobotsRules::default()
            }
            Err(e) => {
                warn!(%host, error = %e, "Failed fetching robots.txt; assuming allow-all");
                RobotsRules::default()
            }
        };

        self.robots.insert(host.to_string(), rules.clone());
        rules
    }

    /// Sleep out the remainder of the minimum inter-request interval for
    /// `host`, then mark the request as started.
    async fn wait_for_host(&mut self, host: &str, delay: Duration) {
        if let Some(last) = self.last_request.get(host) {
            let elapsed = last.elapsed();
            if elapsed < delay {
                let wait = delay - elapsed;
                debug!(%host, ?wait, "Rate limiting");
                sleep(wait).await;
            }
        }
        self.last_request.insert(host.to_string(), Instant::now());
    }

    async fn get_with_backoff(&self, url: &Url) -> Result<String> {
        let mut attempt = 0usize;

        loop {
            let (status, reason, retryable) = match self.client.get(url.as_str()).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let body = resp.text().await?;
                        info!(bytes = body.len(), "Fetched page");
                        return Ok(body);
                    }
                    (Some(status), format!("HTTP {status}"), retryable_status(status))
                }
                Err(e) => (e.status(), e.to_string(), true),
            };
            attempt += 1;
            if !retryable || attempt > MAX_RETRIES {
                return Err(ScrapeError::Fetch {
                    url: url.to_string(),
                    status: status.map(|s| s.as_u16()),
                    reason,
                });
            }

            let mut delay = BASE_RETRY_DELAY.saturating_mul(1 << (attempt - 1));
            if delay > MAX_RETRY_DELAY {
                delay = MAX_RETRY_DELAY;
            }
            let jitter_ms: u64 = rng().random_range(0..=250);
            let delay = delay + Duration::from_millis(jitter_ms);
            warn!(attempt, max = MAX_RETRIES, ?delay, %reason, "Fetch failed; backing off");
            sleep(delay).await;
        }
    }
}

fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_host_enforces_delay() {
        let mut fetcher = Fetcher::new(Duration::from_millis(500)).unwrap();

        let start = tokio::time::Instant::now();
        fetcher.wait_for_host("example.org", Duration::from_millis(500)).await;
        // First request goes straight through.
        assert_eq!(start.elapsed(), Duration::ZERO);

        fetcher.wait_for_host("example.org", Duration::from_millis(500)).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hosts_rate_limited_independently() {
        let mut fetcher = Fetcher::new(Duration::from_millis(500)).unwrap();

        fetcher.wait_for_host("one.org", Duration::from_millis(500)).await;
        let start = tokio::time::Instant::now();
        fetcher.wait_for_host("two.org", Duration::from_millis(500)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_retryable_status() {
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
        assert!(!retryable_status(StatusCode::FORBIDDEN));
    }
}
