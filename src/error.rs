use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    /// Non-success status, timeout or connection failure while fetching a page.
    #[error("Fetching {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),
}

impl ScraperError {
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        ScraperError::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
