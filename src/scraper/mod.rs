//! Competitor price scraper for the Jumia Kenya storefront.
//!
//! A scrape never fails as a whole from the caller's point of view: request and
//! page-level problems end up in [`ScrapeReport::failure`] with no listings, and
//! cards that cannot be read are listed in [`ScrapeReport::skipped`]. Scraping is
//! only triggered explicitly; costing never waits on the network.

/// Search page parsing and price/size extraction
pub mod parse;

pub use parse::{extract_size_info, parse_price, parse_search_page};

use crate::{config::ScraperSettings, errors::Result};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// One product card read from a search result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub product_name: String,
    pub competitor: String,
    pub price: f64,
    /// Absolute link to the listing, empty when the card had none
    pub url: String,
    pub size_info: String,
}

/// Why a whole scrape produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeFailure {
    /// Connection, timeout or body read failure
    #[error("request failed: {message}")]
    Network { message: String },
    /// Non-success HTTP status
    #[error("retailer answered with HTTP {status}")]
    Status { status: u16 },
    /// The page or the request URL could not be handled
    #[error("could not parse page: {message}")]
    Parse { message: String },
}

/// Why a single card was left out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemSkip {
    #[error("card {index} has no name")]
    MissingName { index: usize },
    #[error("'{name}' has no price")]
    MissingPrice { name: String },
    #[error("'{name}' has an unreadable price '{text}'")]
    UnparseablePrice { name: String, text: String },
}

/// Outcome of one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeReport {
    pub listings: Vec<Listing>,
    pub skipped: Vec<ItemSkip>,
    /// Set when the request or page failed as a whole
    pub failure: Option<ScrapeFailure>,
}

impl ScrapeReport {
    /// Empty report carrying a page-level failure.
    #[must_use]
    pub fn failed(failure: ScrapeFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }
}

/// HTTP client for Jumia search pages.
#[derive(Debug, Clone)]
pub struct JumiaScraper {
    client: reqwest::Client,
    settings: ScraperSettings,
}

impl JumiaScraper {
    /// Builds the client with the configured User-Agent and timeout.
    ///
    /// # Errors
    /// Returns `Http` if the TLS backend cannot be initialised.
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Label stored with every observation from this scraper.
    #[must_use]
    pub fn competitor(&self) -> &str {
        &self.settings.competitor
    }

    /// Default cap on listings per search.
    #[must_use]
    pub const fn default_max_results(&self) -> usize {
        self.settings.max_results
    }

    /// Catalog search URL for a term, e.g. `https://www.jumia.co.ke/catalog/?q=omo+1kg`.
    pub fn search_url(&self, term: &str) -> std::result::Result<Url, ScrapeFailure> {
        let mut url = Url::parse(&self.settings.base_url)
            .and_then(|base| base.join("/catalog/"))
            .map_err(|e| ScrapeFailure::Parse {
                message: format!("invalid base URL '{}': {e}", self.settings.base_url),
            })?;
        url.query_pairs_mut().append_pair("q", term.trim());
        Ok(url)
    }

    /// Fetches one search page and parses up to `max_results` cards.
    #[instrument(skip(self))]
    pub async fn scrape(&self, term: &str, max_results: usize) -> ScrapeReport {
        let report = match self.fetch(term).await {
            Ok(html) => parse_search_page(
                &html,
                &self.settings.base_url,
                &self.settings.competitor,
                max_results,
            ),
            Err(failure) => ScrapeReport::failed(failure),
        };

        if let Some(failure) = &report.failure {
            warn!("Scrape for '{term}' failed: {failure}");
        }
        for skip in &report.skipped {
            debug!("Skipped listing: {skip}");
        }
        info!(
            "Scrape for '{term}' found {} listing(s), skipped {}",
            report.listings.len(),
            report.skipped.len()
        );
        report
    }

    async fn fetch(&self, term: &str) -> std::result::Result<String, ScrapeFailure> {
        let url = self.search_url(term)?;
        debug!("Fetching {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeFailure::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeFailure::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ScrapeFailure::Network {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_search_url_encodes_term() {
        let scraper = JumiaScraper::new(&ScraperSettings::default()).unwrap();
        let url = scraper.search_url(" omo 1kg ").unwrap();
        assert_eq!(url.as_str(), "https://www.jumia.co.ke/catalog/?q=omo+1kg");
        assert_eq!(scraper.competitor(), "Jumia");
        assert_eq!(scraper.default_max_results(), 10);
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = ScraperSettings {
            base_url: "::nope::".to_string(),
            ..ScraperSettings::default()
        };
        let scraper = JumiaScraper::new(&settings).unwrap();
        assert!(matches!(scraper.search_url("omo"), Err(ScrapeFailure::Parse { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_network_failure() {
        let settings = ScraperSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ScraperSettings::default()
        };
        let scraper = JumiaScraper::new(&settings).unwrap();
        let report = scraper.scrape("omo", 5).await;
        assert!(matches!(report.failure, Some(ScrapeFailure::Network { .. })));
        assert!(report.listings.is_empty());
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ScrapeFailure::Status { status: 503 }.to_string(),
            "retailer answered with HTTP 503"
        );
        assert_eq!(
            ItemSkip::MissingPrice {
                name: "Omo".to_string()
            }
            .to_string(),
            "'Omo' has no price"
        );
    }
}
