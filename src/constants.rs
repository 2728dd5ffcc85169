/// Source identifiers and the default crawl targets for each site.
/// These are the values the built-in configuration starts from.

// Source names as they appear in output and on the CLI
pub const NTHU_SOURCE: &str = "NTHU";
pub const NYCU_SOURCE: &str = "NYCU_Infonews";

// National Tsing Hua University homepage carousel
pub const NTHU_BASE_URL: &str = "https://www.nthu.edu.tw/";
pub const NTHU_LIST_ID: &str = "flexiselDemo2";

// NYCU infonews category listings
pub const NYCU_BASE_URL: &str = "https://infonews.nycu.edu.tw/";
pub const NYCU_TABLE_SELECTOR: &str = "table.category-style";
pub const NYCU_PAGINATION_ID: &str = "category";
pub const NYCU_START_PAGES: &[&str] = &[
    // Academic
    "https://infonews.nycu.edu.tw/index.php?SuperType=6&action=more&categoryid=all&pagekey=1",
    // Arts
    "https://infonews.nycu.edu.tw/index.php?SuperType=7&action=more&categoryid=all&pagekey=1",
];

/// Query parameters two listing pages must agree on to be siblings
pub const LISTING_MATCH_PARAMS: &[&str] = &["action", "SuperType"];

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Environment variable consulted when `--config` is not passed
pub const CONFIG_ENV_VAR: &str = "CAMPUS_EVENTS_CONFIG";

/// Default output file for a given target year
pub fn default_output_file(year: i32) -> String {
    format!("merged_events_{year}.json")
}
