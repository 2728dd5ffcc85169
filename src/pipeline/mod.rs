pub mod merge;
pub mod year_filter;

pub use merge::merge_events;
pub use year_filter::{filter_and_sort, mentions_year, sort_key, year_tokens};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::apis::pagination::normalize_url;
use crate::apis::{PaginationDiscoverer, SiteParser};
use crate::app::ports::PageFetcher;
use crate::config::{Config, SourceConfig};
use crate::error::Result;
use crate::types::{EventCandidate, ListingParser, Source};

/// How many candidates one source contributed before merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: Source,
    pub count: usize,
}

/// Result of one crawl run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub per_source: Vec<SourceCount>,
    pub merged_count: usize,
    pub target_year: i32,
    pub events: Vec<EventCandidate>,
}

impl RunReport {
    /// e.g. `NTHU: 12 NYCU_Infonews: 40 → merged: 48 → 2025: 30`
    pub fn summary_line(&self) -> String {
        let sources = self
            .per_source
            .iter()
            .map(|c| format!("{}: {}", c.source, c.count))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} → merged: {} → {}: {}",
            sources,
            self.merged_count,
            self.target_year,
            self.events.len()
        )
    }
}

/// Crawls every start page of one source.
///
/// A failed start page aborts the run. A failed sibling page found through
/// pagination is logged and skipped.
#[instrument(skip(fetcher, config), fields(source = %config.source))]
pub async fn crawl_source(
    fetcher: &dyn PageFetcher,
    config: &SourceConfig,
) -> Result<Vec<EventCandidate>> {
    let parser = SiteParser::from_config(config)?;

    if let Some(path) = &config.html_file {
        info!("Parsing saved page {}", path.display());
        let html = tokio::fs::read_to_string(path).await?;
        return Ok(parser.parse_events(&html));
    }

    let base = config.base()?;
    let discoverer = config
        .pagination
        .as_ref()
        .map(|p| PaginationDiscoverer::new(base.clone(), p))
        .transpose()?;

    let mut events = Vec::new();
    for start_url in config.start_urls()? {
        let first_html = fetcher.fetch(&start_url).await?;

        let Some(discoverer) = &discoverer else {
            events.extend(parser.parse_events(&first_html));
            continue;
        };

        let start_key = normalize_url(&base, &start_url);
        let pages = discoverer.discover(&first_html, &start_url);
        info!("Crawling {} listing pages from {}", pages.len(), start_url);

        for page_url in pages {
            if page_url == start_key {
                events.extend(parser.parse_events(&first_html));
                continue;
            }
            match fetcher.fetch(&page_url).await {
                Ok(html) => events.extend(parser.parse_events(&html)),
                Err(e) => warn!("Skipping listing page {}: {}", page_url, e),
            }
        }
    }

    info!("Collected {} candidates", events.len());
    Ok(events)
}

/// Runs the whole crawl: every configured source in order, then merge,
/// then the year filter and sort.
pub async fn run(config: &Config, fetcher: &dyn PageFetcher) -> Result<RunReport> {
    let mut per_source = Vec::new();
    let mut groups = Vec::new();

    for source in &config.sources {
        let events = crawl_source(fetcher, source).await?;
        per_source.push(SourceCount {
            source: source.source,
            count: events.len(),
        });
        groups.push(events);
    }

    Ok(assemble(per_source, groups, config.target_year))
}

/// Parses one saved page for `config` without touching the network
pub fn parse_saved_page(config: &SourceConfig, html: &str, target_year: i32) -> Result<RunReport> {
    let parser = SiteParser::from_config(config)?;
    let events = parser.parse_events(html);
    let per_source = vec![SourceCount {
        source: config.source,
        count: events.len(),
    }];
    Ok(assemble(per_source, vec![events], target_year))
}

fn assemble(
    per_source: Vec<SourceCount>,
    groups: Vec<Vec<EventCandidate>>,
    target_year: i32,
) -> RunReport {
    let merged = merge_events(groups);
    let merged_count = merged.len();
    let events = filter_and_sort(merged, target_year);
    info!(
        "Merged {} events, {} kept for {}",
        merged_count,
        events.len(),
        target_year
    );

    RunReport {
        per_source,
        merged_count,
        target_year,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_format() {
        let report = RunReport {
            per_source: vec![
                SourceCount { source: Source::Nthu, count: 12 },
                SourceCount { source: Source::NycuInfonews, count: 40 },
            ],
            merged_count: 48,
            target_year: 2025,
            events: Vec::new(),
        };
        assert_eq!(
            report.summary_line(),
            "NTHU: 12 NYCU_Infonews: 40 → merged: 48 → 2025: 0"
        );
    }

    #[test]
    fn test_parse_saved_page_filters_by_year() {
        let html = r#"<table class="category-style">
            <tr><td><img alt="學術"><a href="a.html">Old talk</a></td></tr><tr><td>2024-05-01</td></tr><tr><td>s</td></tr>
            <tr><td><img alt="學術"><a href="b.html">New talk</a></td></tr><tr><td>2025-05-01</td></tr><tr><td>s</td></tr>
            <tr><td><img alt="學術"><a href="b.html">New talk</a></td></tr><tr><td>2025-05-01</td></tr><tr><td>s</td></tr>
        </table>"#;
        let report = parse_saved_page(&SourceConfig::nycu(), html, 2025).unwrap();
        assert_eq!(report.per_source[0].count, 3);
        assert_eq!(report.merged_count, 2);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].title.as_deref(), Some("New talk"));
    }
}
