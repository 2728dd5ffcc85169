use crate::app::ports::PageFetcher;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!("HTTP GET request to: {}", url);
        let resp = self
            .client
            .get(url)
            .header("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| ScraperError::transport(url, describe(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::transport(
                url,
                format!("request failed with status: {status}"),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ScraperError::transport(url, describe(&e)))?;
        debug!("HTTP response: status={}, size={} bytes", status.as_u16(), body.len());
        Ok(body)
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port and returns its URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/html; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/index.php?action=more")
    }

    // Same settings as `ReqwestFetcher::new`, minus any proxy from the environment
    fn local_fetcher() -> ReqwestFetcher {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("campus-events-test")
            .no_proxy()
            .build()
            .unwrap();
        ReqwestFetcher { client }
    }

    #[test]
    fn test_new_builds_client() {
        assert!(ReqwestFetcher::new(20, "campus-events-test").is_ok());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_transport() {
        let url = serve_once("500 Internal Server Error", "oops").await;
        let fetcher = local_fetcher();

        match fetcher.fetch(&url).await {
            Err(ScraperError::Transport { url: failed, message }) => {
                assert_eq!(failed, url);
                assert!(message.contains("500"));
            }
            other => panic!("expected a transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let url = serve_once("200 OK", "<html>活動</html>").await;
        let fetcher = local_fetcher();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>活動</html>");
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = local_fetcher();
        let result = fetcher.fetch(&format!("http://{addr}/")).await;
        assert!(matches!(result, Err(ScraperError::Transport { .. })));
    }
}
