use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::parse_selector;
use crate::error::Result;
use crate::parser::text::{clean_opt, element_text, resolve_url};
use crate::types::{EventCandidate, ListingParser, Source};

const ROWS_PER_GROUP: usize = 3;

struct Selectors {
    row: Selector,
    anchor: Selector,
    image: Selector,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    row: Selector::parse("tr").unwrap(),
    anchor: Selector::parse("a").unwrap(),
    image: Selector::parse("img").unwrap(),
});

/// Reads a listing table where each event spans three rows:
/// category image plus title link, then the period, then a subtitle.
pub struct RowTableParser {
    source: Source,
    base_url: Url,
    table_selector: Selector,
}

impl RowTableParser {
    pub fn new(source: Source, base_url: Url, table_selector: &str) -> Result<Self> {
        Ok(Self {
            source,
            base_url,
            table_selector: parse_selector(table_selector)?,
        })
    }

    /// A group starts at a row carrying a link or a category image
    fn is_group_header(row: &ElementRef) -> bool {
        row.select(&SELECTORS.anchor).next().is_some()
            || row.select(&SELECTORS.image).next().is_some()
    }

    fn parse_group(&self, header: &ElementRef, period: &ElementRef, subtitle: &ElementRef) -> EventCandidate {
        let mut event = EventCandidate::new(self.source);

        event.category = header
            .select(&SELECTORS.image)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .and_then(clean_opt);

        if let Some(anchor) = header.select(&SELECTORS.anchor).next() {
            event.title = clean_opt(&element_text(&anchor));
            event.href = anchor
                .value()
                .attr("href")
                .and_then(|href| resolve_url(&self.base_url, href));
        }

        event.period = clean_opt(&element_text(period));
        event.subtitle = clean_opt(&element_text(subtitle));
        event
    }
}

impl ListingParser for RowTableParser {
    fn source(&self) -> Source {
        self.source
    }

    fn parse_events(&self, html: &str) -> Vec<EventCandidate> {
        let document = Html::parse_document(html);

        let Some(table) = document.select(&self.table_selector).next() else {
            debug!("{}: listing table not found", self.source);
            return Vec::new();
        };

        let rows: Vec<ElementRef> = table.select(&SELECTORS.row).collect();
        let mut events = Vec::new();
        let mut cursor = 0;

        while cursor + ROWS_PER_GROUP <= rows.len() {
            let header = &rows[cursor];
            if !Self::is_group_header(header) {
                debug!("{}: stray row {} is not a group header", self.source, cursor);
                cursor += 1;
                continue;
            }

            let event = self.parse_group(header, &rows[cursor + 1], &rows[cursor + 2]);
            if event.is_addressable() {
                events.push(event);
            } else {
                debug!("{}: row group at {} has neither title nor link", self.source, cursor);
            }
            cursor += ROWS_PER_GROUP;
        }

        if cursor < rows.len() {
            debug!(
                "{}: discarding {} trailing rows of an incomplete group",
                self.source,
                rows.len() - cursor
            );
        }

        info!("{}: parsed {} events from listing table", self.source, events.len());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> RowTableParser {
        RowTableParser::new(
            Source::NycuInfonews,
            Url::parse("https://infonews.nycu.edu.tw/").unwrap(),
            "table.category-style",
        )
        .unwrap()
    }

    fn group(alt: &str, title: &str, href: &str, period: &str, subtitle: &str) -> String {
        format!(
            r#"<tr><td><img src="c.gif" alt="{alt}"></td><td><a href="{href}">{title}</a></td></tr>
               <tr><td>{period}</td></tr>
               <tr><td>{subtitle}</td></tr>"#
        )
    }

    fn table(rows: &str) -> String {
        format!(r#"<html><body><table class="category-style">{rows}</table></body></html>"#)
    }

    #[test]
    fn test_parses_row_groups() {
        let html = table(&format!(
            "{}{}",
            group(" 學術 ", "AI  研討會", "index.php?action=detail&id=1", "2025-10-01 ~ 2025-10-02", "主講：王教授"),
            group("藝文", "音樂會", "/index.php?action=detail&id=2", "2025-11-05", ""),
        ));
        let events = parser().parse_events(&html);
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.source, Source::NycuInfonews);
        assert_eq!(first.category.as_deref(), Some("學術"));
        assert_eq!(first.title.as_deref(), Some("AI 研討會"));
        assert_eq!(
            first.href.as_deref(),
            Some("https://infonews.nycu.edu.tw/index.php?action=detail&id=1")
        );
        assert_eq!(first.period.as_deref(), Some("2025-10-01 ~ 2025-10-02"));
        assert_eq!(first.subtitle.as_deref(), Some("主講：王教授"));
        assert_eq!(first.description, None);
        assert_eq!(first.date_info, None);
        assert_eq!(first.location, None);
        assert_eq!(first.image, None);

        assert_eq!(events[1].subtitle, None);
    }

    #[test]
    fn test_trailing_partial_group_is_discarded() {
        let html = table(&format!(
            "{}<tr><td><a href='x.html'>Partial</a></td></tr><tr><td>2025-01-01</td></tr>",
            group("學術", "Full", "a.html", "2025-01-01", "sub"),
        ));
        let events = parser().parse_events(&html);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Full"));
    }

    #[test]
    fn test_stray_row_advances_by_one() {
        let html = table(&format!(
            "<tr><td>header text</td></tr>{}",
            group("學術", "Talk", "t.html", "2025-03-01", "sub"),
        ));
        let events = parser().parse_events(&html);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Talk"));
        assert_eq!(events[0].period.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_empty_group_is_skipped_but_consumes_three_rows() {
        let html = table(&format!(
            r#"<tr><td><img src="c.gif" alt="學術"></td></tr><tr><td>p</td></tr><tr><td>s</td></tr>{}"#,
            group("藝文", "Next", "n.html", "2025-04-01", "sub"),
        ));
        let events = parser().parse_events(&html);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Next"));
        assert_eq!(events[0].category.as_deref(), Some("藝文"));
    }

    #[test]
    fn test_missing_table_yields_empty() {
        assert!(parser().parse_events("<table class='other'><tr><td>x</td></tr></table>").is_empty());
    }
}
