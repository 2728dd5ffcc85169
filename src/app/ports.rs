use async_trait::async_trait;

use crate::error::Result;

/// Retrieves raw page markup. One attempt per call; failures surface as
/// `ScraperError::Transport`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
