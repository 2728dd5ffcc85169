use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::debug;
use url::Url;

use super::id_selector;
use crate::config::PaginationConfig;
use crate::error::{Result, ScraperError};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Finds the sibling pages of a category listing.
///
/// Pages belong to the same listing when they share the current page's host
/// and carry every query parameter named in `match_params` with the same
/// value; they differ only in the page-number parameter. A current page that
/// lacks any of those parameters is not a listing and has no siblings.
pub struct PaginationDiscoverer {
    base_url: Url,
    container_selector: Selector,
    match_params: Vec<String>,
}

impl PaginationDiscoverer {
    pub fn new(base_url: Url, config: &PaginationConfig) -> Result<Self> {
        if config.match_params.is_empty() {
            return Err(ScraperError::Config(format!(
                "Pagination for container '{}' needs at least one match param",
                config.container_id
            )));
        }
        Ok(Self {
            base_url,
            container_selector: id_selector(&config.container_id)?,
            match_params: config.match_params.clone(),
        })
    }

    /// Returns the sorted, deduplicated page URLs to crawl, always including `current_url`
    pub fn discover(&self, html: &str, current_url: &str) -> Vec<String> {
        let current = self.base_url.join(current_url).ok();
        let current_key = current.as_ref().and_then(|u| self.listing_key(u));

        let mut urls = BTreeSet::new();
        urls.insert(
            current
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_else(|| current_url.to_string()),
        );

        let Some(current_key) = current_key else {
            debug!("{} is not a listing page, not following pagination", current_url);
            return urls.into_iter().collect();
        };

        let document = Html::parse_document(html);
        let Some(container) = document.select(&self.container_selector).next() else {
            debug!("Pagination container not found on {}", current_url);
            return urls.into_iter().collect();
        };

        // Relative page links are resolved against the page they appear on
        let link_base = current.as_ref().unwrap_or(&self.base_url);
        for anchor in container.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else { continue };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }
            let Ok(link) = link_base.join(href) else {
                debug!("Skipping unresolvable pagination link '{}'", href);
                continue;
            };
            let same_host = current.as_ref().map(Url::host_str) == Some(link.host_str());
            if same_host && self.listing_key(&link).as_ref() == Some(&current_key) {
                urls.insert(link.to_string());
            }
        }

        debug!("Discovered {} listing pages from {}", urls.len(), current_url);
        urls.into_iter().collect()
    }

    /// Values of the matched query parameters, or `None` when any is missing.
    /// The first occurrence of each parameter wins.
    fn listing_key(&self, url: &Url) -> Option<Vec<String>> {
        self.match_params
            .iter()
            .map(|param| {
                url.query_pairs()
                    .find(|(key, _)| key == param.as_str())
                    .map(|(_, value)| value.into_owned())
            })
            .collect()
    }
}

/// Canonical text form of `url` relative to `base`, as used by [`PaginationDiscoverer::discover`]
pub fn normalize_url(base: &Url, url: &str) -> String {
    base.join(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}
