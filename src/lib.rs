//! Campus event aggregation: crawls the NTHU and NYCU listing pages, merges
//! duplicate records and keeps the events of one year.

pub mod apis;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{Result, ScraperError};
pub use types::{EventCandidate, Fingerprint, ListingParser, Source};
