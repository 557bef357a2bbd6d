//! Site scrapers.
//!
//! Each supported organization is described declaratively by a [`SiteConfig`]
//! in [`sites`]; one shared engine ([`SiteScraper`]) interprets those configs.
//! A config lists the site's entry sections, and for each section either
//! records the entry page itself or discovers article links from it, with
//! include/exclude path patterns and optional pagination.

mod sites;

pub use sites::REGISTRY;

use crate::error::{Result, ScrapeError};
use crate::extract::{self, ExtractHints};
use crate::fetch::Fetcher;
use crate::models::{ContentRecord, ContentType};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};
use url::Url;

/// Pagination safety cap so a misbehaving site cannot loop forever.
const MAX_PAGES: u32 = 10;

/// How a section's listing advances to further pages.
#[derive(Debug, Clone, Copy)]
pub enum Pagination {
    /// The entry page lists everything.
    None,
    /// Follow a next-page anchor matching this CSS selector.
    NextLink { selector: &'static str },
    /// Request successive pages via a numeric query parameter.
    Numbered { param: &'static str },
}

/// Link-discovery rules for a listing section.
#[derive(Debug, Clone, Copy)]
pub struct FollowRules {
    /// A discovered URL must contain at least one of these fragments.
    pub include: &'static [&'static str],
    /// And none of these.
    pub exclude: &'static [&'static str],
    pub pagination: Pagination,
}

/// One entry point on a site: a path relative to the base URL, the content
/// type assigned to records it produces, and whether links are followed
/// from it or the page itself is the record.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub path: &'static str,
    pub content_type: ContentType,
    pub follow: Option<FollowRules>,
}

/// Declarative description of one supported site.
#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    /// Source label stamped into every record.
    pub name: &'static str,
    /// Lowercase substrings matched against a requested URL by the factory.
    pub matchers: &'static [&'static str],
    pub base_url: &'static str,
    pub hints: ExtractHints,
    pub sections: &'static [Section],
}

/// Select the scraper responsible for `base_url` by substring match against
/// the registry. Unrecognized sources are refused rather than guessed at.
pub fn create_scraper(base_url: &str, fetcher: Fetcher) -> Result<SiteScraper> {
    let lowered = base_url.to_lowercase();
    for config in REGISTRY {
        if config.matchers.iter().any(|m| lowered.contains(m)) {
            return Ok(SiteScraper::new(config, fetcher));
        }
    }
    Err(ScrapeError::UnknownSource(base_url.to_string()))
}

/// The shared scraping engine: walks a site's sections sequentially, one
/// page at a time, deduplicating URLs across the whole run.
#[derive(Debug)]
pub struct SiteScraper {
    config: &'static SiteConfig,
    fetcher: Fetcher,
}

impl SiteScraper {
    pub fn new(config: &'static SiteConfig, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    pub fn source(&self) -> &'static str {
        self.config.name
    }

    pub fn base_url(&self) -> &'static str {
        self.config.base_url
    }

    /// Scrape every section of the site.
    ///
    /// A failure to fetch a section's entry page aborts the run; failures on
    /// individual discovered pages are logged and skipped. Each URL yields at
    /// most one record even when sections overlap.
    pub async fn scrape_all(&mut self) -> Result<Vec<ContentRecord>> {
        let base = Url::parse(self.config.base_url)?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();

        for section in self.config.sections {
            let entry = base.join(section.path)?;
            info!(source = self.config.name, url = %entry, "Scraping section");
            let html = self.fetcher.fetch(&entry).await?;

            match &section.follow {
                None => {
                    if seen.insert(entry.to_string()) {
                        self.record_page(&entry, &html, section.content_type, &mut records);
                    }
                }
                Some(rules) => {
                    let targets = self.discover_section(&entry, html, rules).await;
                    for target in targets {
                        if !seen.insert(target.to_string()) {
                            continue;
                        }
                        match self.fetcher.fetch(&target).await {
                            Ok(page_html) => {
                                self.record_page(
                                    &target,
                                    &page_html,
                                    section.content_type,
                                    &mut records,
                                );
                            }
                            Err(e) => {
                                warn!(url = %target, error = %e, "Skipping page");
                            }
                        }
                    }
                }
            }
        }

        info!(
            source = self.config.name,
            records = records.len(),
            "Site scrape complete"
        );
        Ok(records)
    }

    fn record_page(
        &self,
        url: &Url,
        html: &str,
        content_type: ContentType,
        records: &mut Vec<ContentRecord>,
    ) {
        match extract::extract(html, url, &self.config.hints) {
            Ok(page) => {
                records.push(ContentRecord {
                    source: self.config.name.to_string(),
                    url: url.to_string(),
                    title: page.title,
                    body: page.body,
                    content_type,
                    retrieved_at: Utc::now(),
                });
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping page");
            }
        }
    }

    /// Walk a listing section's pages and return the article URLs to visit,
    /// in discovery order and without duplicates.
    async fn discover_section(
        &mut self,
        entry: &Url,
        first_html: String,
        rules: &FollowRules,
    ) -> Vec<Url> {
        let mut targets = Vec::new();
        let mut found: HashSet<String> = HashSet::new();
        let mut listing_url = entry.clone();
        let mut listing_html = first_html;

        for page_no in 1..=MAX_PAGES {
            let mut new_on_page = 0usize;
            for link in section_links(&listing_html, &listing_url, rules) {
                if found.insert(link.to_string()) {
                    targets.push(link);
                    new_on_page += 1;
                }
            }

            let next = match rules.pagination {
                Pagination::None => None,
                Pagination::NextLink { selector } => {
                    extract::find_next_link(&listing_html, &listing_url, selector)
                }
                Pagination::Numbered { param } => {
                    let mut next = entry.clone();
                    next.query_pairs_mut()
                        .append_pair(param, &(page_no + 1).to_string());
                    Some(next)
                }
            };

            let Some(next) = next else { break };
            // A numbered page that adds nothing new means the listing ended.
            if matches!(rules.pagination, Pagination::Numbered { .. }) && new_on_page == 0 {
                break;
            }
            match self.fetcher.fetch(&next).await {
                Ok(html) => {
                    listing_url = next;
                    listing_html = html;
                }
                Err(e) => {
                    warn!(url = %next, error = %e, "Stopping pagination");
                    break;
                }
            }
        }

        targets
    }
}

/// Filter the links on a listing page down to this section's articles:
/// same host as the listing, at least one include fragment, no exclude
/// fragment. Fragments are dropped so `#section` anchors don't duplicate.
fn section_links(html: &str, listing_url: &Url, rules: &FollowRules) -> Vec<Url> {
    extract::discover_links(html, listing_url)
        .into_iter()
        .map(|mut u| {
            u.set_fragment(None);
            u
        })
        .filter(|u| u.host_str() == listing_url.host_str())
        .filter(|u| rules.include.iter().any(|p| u.as_str().contains(p)))
        .filter(|u| !rules.exclude.iter().any(|p| u.as_str().contains(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;
    use std::time::Duration;

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_millis(0)).unwrap()
    }

    #[test]
    fn test_factory_matches_known_sources() {
        for (url, expected) in [
            ("https://metr.org", "metr.org"),
            ("https://www.anthropic.com", "anthropic.com"),
            ("https://deepmind.google/research", "deepmind.google"),
            ("https://www.aisi.gov.uk/", "aisi.gov.uk"),
            ("https://humancompatible.ai", "humancompatible.ai"),
        ] {
            let scraper = create_scraper(url, fetcher()).unwrap();
            assert_eq!(scraper.source(), expected, "for {url}");
        }
    }

    #[test]
    fn test_factory_rejects_unknown_source() {
        let err = create_scraper("https://example.com", fetcher()).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownSource(_)));
    }

    #[test]
    fn test_registry_configs_are_well_formed() {
        for config in REGISTRY {
            let base = Url::parse(config.base_url).unwrap();
            assert!(base.host_str().is_some(), "{} has no host", config.name);
            assert!(!config.matchers.is_empty(), "{} has no matchers", config.name);
            assert!(!config.sections.is_empty(), "{} has no sections", config.name);
            for section in config.sections {
                base.join(section.path).unwrap();
            }
        }
    }

    #[test]
    fn test_section_links_filters_by_pattern_and_host() {
        let listing = Url::parse("https://metr.org/blog").unwrap();
        let rules = FollowRules {
            include: &["/blog/"],
            exclude: &["/blog/?", "/page/"],
            pagination: Pagination::None,
        };
        let html = r#"<body>
            <a href="/blog/first-post">First</a>
            <a href="/blog/second-post#comments">Second</a>
            <a href="/about">About</a>
            <a href="/blog/?tag=ai">Tag</a>
            <a href="/blog/page/2">Older</a>
            <a href="https://twitter.com/blog/external">External</a>
        </body>"#;

        let links = section_links(html, &listing, &rules);
        let strings: Vec<&str> = links.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            strings,
            vec![
                "https://metr.org/blog/first-post",
                "https://metr.org/blog/second-post",
            ]
        );
    }
}
