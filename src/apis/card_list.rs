use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::id_selector;
use crate::error::Result;
use crate::parser::field_recovery;
use crate::parser::text::{clean_opt, clean_text, element_text_excluding, resolve_url};
use crate::types::{EventCandidate, ListingParser, Source};

struct Selectors {
    anchor: Selector,
    image: Selector,
    info: Selector,
    title: Selector,
    read_more: Selector,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    anchor: Selector::parse("a").unwrap(),
    image: Selector::parse("img").unwrap(),
    info: Selector::parse("p").unwrap(),
    title: Selector::parse("span:not(.more)").unwrap(),
    read_more: Selector::parse("span.more").unwrap(),
});

/// Reads event tiles laid out as `li` entries of one list, e.g. the NTHU
/// homepage carousel:
///
/// ```html
/// <ul id="flexiselDemo2">
///   <li><a href="..."><img src="..."><p><span>Title</span> text <span class="more">more</span></p></a></li>
/// </ul>
/// ```
pub struct CardListParser {
    source: Source,
    base_url: Url,
    list_selector: Selector,
}

impl CardListParser {
    pub fn new(source: Source, base_url: Url, list_id: &str) -> Result<Self> {
        Ok(Self {
            source,
            base_url,
            list_selector: id_selector(list_id)?,
        })
    }

    fn parse_item(&self, item: ElementRef) -> Option<EventCandidate> {
        let anchor = item.select(&SELECTORS.anchor).next()?;

        let mut event = EventCandidate::new(self.source);
        event.href = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_url(&self.base_url, href));
        event.image = anchor
            .select(&SELECTORS.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_url(&self.base_url, src));

        if let Some(info) = anchor.select(&SELECTORS.info).next() {
            event.title = info
                .select(&SELECTORS.title)
                .next()
                .and_then(|span| clean_opt(&element_text_excluding(&span, None)));

            // The "more" span is a UI affordance, not content
            let raw = clean_text(&element_text_excluding(&info, Some(&SELECTORS.read_more)));
            let description = match event.title.as_deref() {
                Some(title) if raw.starts_with(title) => clean_opt(&raw[title.len()..]),
                _ => clean_opt(&raw),
            };

            if let Some(description) = &description {
                let recovered = field_recovery::recover(description);
                event.date_info = recovered.date_info;
                event.location = recovered.location;
            }
            event.description = description;
        }

        Some(event)
    }
}

impl ListingParser for CardListParser {
    fn source(&self) -> Source {
        self.source
    }

    fn parse_events(&self, html: &str) -> Vec<EventCandidate> {
        let document = Html::parse_document(html);

        let Some(list) = document.select(&self.list_selector).next() else {
            debug!("{}: event list container not found", self.source);
            return Vec::new();
        };

        let mut events = Vec::new();
        for item in list
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "li")
        {
            match self.parse_item(item) {
                Some(event) if event.is_addressable() => events.push(event),
                Some(_) => debug!("{}: skipping item with neither title nor link", self.source),
                None => debug!("{}: skipping item without a link", self.source),
            }
        }

        info!("{}: parsed {} events from card list", self.source, events.len());
        events
    }
}
