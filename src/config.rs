use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::apis::{PaginationDiscoverer, SiteParser};
use crate::constants::{
    default_output_file, CONFIG_ENV_VAR, DEFAULT_LOG_DIR, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_USER_AGENT, LISTING_MATCH_PARAMS, NTHU_BASE_URL, NTHU_LIST_ID, NYCU_BASE_URL,
    NYCU_PAGINATION_ID, NYCU_START_PAGES, NYCU_TABLE_SELECTOR,
};
use crate::error::{Result, ScraperError};
use crate::types::Source;

/// Everything one crawl run needs. All fields default to the built-in
/// NTHU + NYCU setup, so an empty file (or none at all) is valid.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Year kept by the year filter
    pub target_year: i32,
    /// Output JSON file; defaults to `merged_events_<year>.json`
    pub output: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Directory for rolling JSON log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceConfig {
    pub source: Source,
    /// Base every relative link on this site is resolved against
    pub base_url: String,
    /// Listing pages to crawl; empty means the base URL itself
    #[serde(default)]
    pub start_pages: Vec<String>,
    /// Parse this saved page instead of fetching the start pages
    #[serde(default)]
    pub html_file: Option<PathBuf>,
    pub layout: Layout,
    #[serde(default)]
    pub pagination: Option<PaginationConfig>,
}

/// The closed set of markup shapes we know how to read
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Event tiles as direct `li` children of the element with this id
    CardList { list_id: String },
    /// Table whose rows come in groups of three
    RowGroupedTable { table_selector: String },
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::CardList { .. } => "card_list",
            Layout::RowGroupedTable { .. } => "row_grouped_table",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PaginationConfig {
    /// Id of the element holding the page links
    pub container_id: String,
    /// Query parameters a link must share with the current page
    #[serde(default = "default_match_params")]
    pub match_params: Vec<String>,
}

fn default_match_params() -> Vec<String> {
    LISTING_MATCH_PARAMS.iter().map(|p| p.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_year: chrono::Local::now().year(),
            output: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            sources: vec![SourceConfig::nthu(), SourceConfig::nycu()],
        }
    }
}

impl SourceConfig {
    pub fn nthu() -> Self {
        Self {
            source: Source::Nthu,
            base_url: NTHU_BASE_URL.to_string(),
            start_pages: vec![NTHU_BASE_URL.to_string()],
            html_file: None,
            layout: Layout::CardList {
                list_id: NTHU_LIST_ID.to_string(),
            },
            pagination: None,
        }
    }

    pub fn nycu() -> Self {
        Self {
            source: Source::NycuInfonews,
            base_url: NYCU_BASE_URL.to_string(),
            start_pages: NYCU_START_PAGES.iter().map(|p| p.to_string()).collect(),
            html_file: None,
            layout: Layout::RowGroupedTable {
                table_selector: NYCU_TABLE_SELECTOR.to_string(),
            },
            pagination: Some(PaginationConfig {
                container_id: NYCU_PAGINATION_ID.to_string(),
                match_params: default_match_params(),
            }),
        }
    }

    pub fn base(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ScraperError::Config(format!(
                "{}: invalid base_url '{}': {}",
                self.source, self.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScraperError::Config(format!(
                "{}: base_url must be http(s), got '{}'",
                self.source, self.base_url
            )));
        }
        Ok(url)
    }

    /// Absolute start page URLs, resolved against the base URL
    pub fn start_urls(&self) -> Result<Vec<String>> {
        let base = self.base()?;
        if self.start_pages.is_empty() {
            return Ok(vec![base.to_string()]);
        }
        self.start_pages
            .iter()
            .map(|page| {
                base.join(page.trim()).map(|u| u.to_string()).map_err(|e| {
                    ScraperError::Config(format!(
                        "{}: invalid start page '{}': {}",
                        self.source, page, e
                    ))
                })
            })
            .collect()
    }
}

impl Config {
    /// Reads and validates a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path`, else the file named by `CAMPUS_EVENTS_CONFIG`, else the built-in defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(env_path) if !env_path.trim().is_empty() => Self::load(Path::new(env_path.trim())),
            _ => {
                debug!("No config file given, using built-in sources");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ScraperError::Config("No sources configured".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ScraperError::Config("timeout_seconds must be positive".into()));
        }
        if !(2000..=2099).contains(&self.target_year) {
            return Err(ScraperError::Config(format!(
                "target_year {} is outside 2000-2099",
                self.target_year
            )));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.source) {
                return Err(ScraperError::Config(format!(
                    "Source {} is configured twice",
                    source.source
                )));
            }
            source.start_urls()?;
            // Building these compiles every configured selector
            SiteParser::from_config(source)?;
            if let Some(pagination) = &source.pagination {
                PaginationDiscoverer::new(source.base()?, pagination)?;
            }
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_output_file(self.target_year)))
    }

    /// Keeps only the named sources, in their configured order
    pub fn retain_sources(&mut self, wanted: &[Source]) -> Result<()> {
        for source in wanted {
            if !self.sources.iter().any(|s| s.source == *source) {
                return Err(ScraperError::Config(format!(
                    "Source {source} is not configured"
                )));
            }
        }
        self.sources.retain(|s| wanted.contains(&s.source));
        Ok(())
    }

    pub fn source(&self, source: Source) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.source == source)
    }
}
