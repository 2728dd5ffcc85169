use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{NTHU_SOURCE, NYCU_SOURCE};
use crate::error::ScraperError;

/// Which site (and therefore which extractor) produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "NTHU")]
    Nthu,
    #[serde(rename = "NYCU_Infonews")]
    NycuInfonews,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Nthu => NTHU_SOURCE,
            Source::NycuInfonews => NYCU_SOURCE,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nthu" => Ok(Source::Nthu),
            "nycu" | "nycu_infonews" => Ok(Source::NycuInfonews),
            other => Err(ScraperError::Config(format!("Unknown source: {other}"))),
        }
    }
}

/// One extracted, not yet deduplicated event.
///
/// Field order matches the key order of the JSON output. Absent values
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCandidate {
    pub source: Source,
    pub category: Option<String>,
    pub title: Option<String>,
    pub period: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub date_info: Option<String>,
    pub location: Option<String>,
    pub href: Option<String>,
    pub image: Option<String>,
}

impl EventCandidate {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            category: None,
            title: None,
            period: None,
            subtitle: None,
            description: None,
            date_info: None,
            location: None,
            href: None,
            image: None,
        }
    }

    /// A record with neither title nor href cannot be told apart from others
    pub fn is_addressable(&self) -> bool {
        self.title.is_some() || self.href.is_some()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            source: self.source,
            title: self.title.clone(),
            href: self.href.clone(),
        }
    }

    /// Fills every absent field from `other`. Present values are never replaced.
    pub fn backfill_from(&mut self, other: EventCandidate) {
        fn fill(slot: &mut Option<String>, incoming: Option<String>) {
            if slot.is_none() {
                *slot = incoming;
            }
        }

        fill(&mut self.category, other.category);
        fill(&mut self.title, other.title);
        fill(&mut self.period, other.period);
        fill(&mut self.subtitle, other.subtitle);
        fill(&mut self.description, other.description);
        fill(&mut self.date_info, other.date_info);
        fill(&mut self.location, other.location);
        fill(&mut self.href, other.href);
        fill(&mut self.image, other.image);
    }
}

/// Identity key: equal fingerprints denote the same logical event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub source: Source,
    pub title: Option<String>,
    pub href: Option<String>,
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.source,
            self.title.as_deref().unwrap_or(""),
            self.href.as_deref().unwrap_or("")
        )
    }
}

/// Core capability shared by every site layout: markup in, candidates out.
///
/// A page without the expected container yields an empty list, not an error.
pub trait ListingParser: Send + Sync {
    fn source(&self) -> Source;

    fn parse_events(&self, html: &str) -> Vec<EventCandidate>;
}
