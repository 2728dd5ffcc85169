pub mod card_list;
pub mod pagination;
pub mod row_table;

pub use card_list::CardListParser;
pub use pagination::PaginationDiscoverer;
pub use row_table::RowTableParser;

use scraper::Selector;

use crate::config::{Layout, SourceConfig};
use crate::error::{Result, ScraperError};
use crate::types::{EventCandidate, ListingParser, Source};

/// Parser for one configured source, chosen by its layout
pub enum SiteParser {
    CardList(CardListParser),
    RowTable(RowTableParser),
}

impl SiteParser {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let base = config.base()?;
        let parser = match &config.layout {
            Layout::CardList { list_id } => {
                SiteParser::CardList(CardListParser::new(config.source, base, list_id)?)
            }
            Layout::RowGroupedTable { table_selector } => {
                SiteParser::RowTable(RowTableParser::new(config.source, base, table_selector)?)
            }
        };
        Ok(parser)
    }
}

impl ListingParser for SiteParser {
    fn source(&self) -> Source {
        match self {
            SiteParser::CardList(p) => p.source(),
            SiteParser::RowTable(p) => p.source(),
        }
    }

    fn parse_events(&self, html: &str) -> Vec<EventCandidate> {
        match self {
            SiteParser::CardList(p) => p.parse_events(html),
            SiteParser::RowTable(p) => p.parse_events(html),
        }
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| ScraperError::Selector(selector.to_string()))
}

/// Selector for the element whose `id` attribute equals `id`
pub(crate) fn id_selector(id: &str) -> Result<Selector> {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    parse_selector(&format!("[id=\"{escaped}\"]"))
}
