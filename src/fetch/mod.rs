//! Retrieval of the raw CSV snapshot.
//!
//! The primary source is tried first; only a non-success answer (an HTTP
//! error status, or a missing local file) moves on to the fallback. Both
//! attempts run under a single timeout, and [`fetch_records`] turns every
//! failure into an empty record list.

mod basic;
mod cache_bust;
mod client;
mod source;

pub use basic::BasicClient;
pub use cache_bust::{CACHE_BUST_PARAM, CacheBust};
pub use client::HttpClient;
pub use source::Source;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, info, warn};

use crate::config::SourceConfig;
use crate::parser::parse;
use crate::record::RawRecord;

/// Fetches and parses the feed. Never fails: any error is logged and
/// reported as an empty list.
pub async fn fetch_records<C: HttpClient>(client: &C, config: &SourceConfig) -> Vec<RawRecord> {
    match fetch_csv(client, config).await {
        Ok(text) => parse(&text),
        Err(e) => {
            error!(error = %e, "Feed synchronisation failed");
            Vec::new()
        }
    }
}

/// Loads the CSV text from the primary source, or from the fallback when the
/// primary answers with a non-success status.
#[tracing::instrument(skip_all, fields(primary = %config.primary, fallback = %config.fallback))]
pub async fn fetch_csv<C: HttpClient>(client: &C, config: &SourceConfig) -> Result<String> {
    tokio::time::timeout(config.timeout, primary_then_fallback(client, config))
        .await
        .with_context(|| format!("fetch timed out after {:?}", config.timeout))?
}

async fn primary_then_fallback<C: HttpClient>(client: &C, config: &SourceConfig) -> Result<String> {
    if let Some(text) = load(client, &config.primary).await? {
        return Ok(text);
    }

    info!("Primary source unavailable, trying fallback");
    load(client, &config.fallback)
        .await?
        .ok_or_else(|| anyhow!("all data sources are unreachable"))
}

/// `Ok(None)` means the source answered but had nothing to give.
async fn load<C: HttpClient>(client: &C, source: &Source) -> Result<Option<String>> {
    match source {
        Source::File(path) => match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "Read local snapshot");
                Ok(Some(text))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Local snapshot not readable");
                Ok(None)
            }
        },
        Source::Http(url) => {
            let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
            let resp = client.execute(req).await?;

            let status = resp.status();
            if !status.is_success() {
                warn!(url = %url, status = status.as_u16(), "Source returned non-success status");
                return Ok(None);
            }

            let text = resp.text().await.context("failed to decode response body")?;
            debug!(url = %url, bytes = text.len(), "Downloaded snapshot");
            Ok(Some(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    const CSV: &str = "date,x,player\n01/03/2024,,Alice\n02/03/2024,,Bob\n";

    /// Answers by host: `primary.test` and `fallback.test` get the
    /// configured statuses; anything else is a 404.
    struct FakeClient {
        primary_status: u16,
        fallback_status: u16,
        delay: Option<Duration>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(primary_status: u16, fallback_status: u16) -> Self {
            Self {
                primary_status,
                fallback_status,
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.seen.lock().unwrap().push(req.url().to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let status = match req.url().host_str() {
                Some("primary.test") => self.primary_status,
                Some("fallback.test") => self.fallback_status,
                _ => 404,
            };
            let resp = http::Response::builder()
                .status(status)
                .body(CSV.to_string())
                .unwrap();
            Ok(resp.into())
        }
    }

    fn http_config() -> SourceConfig {
        SourceConfig {
            primary: Source::parse("http://primary.test/dados.csv"),
            fallback: Source::parse("http://fallback.test/pub?output=csv"),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let client = FakeClient::new(200, 200);
        let records = fetch_records(&client, &http_config()).await;

        assert_eq!(records.len(), 2);
        assert_eq!(client.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_primary_404_tries_fallback_once() {
        let client = FakeClient::new(404, 200);
        let records = fetch_records(&client, &http_config()).await;

        assert_eq!(records.len(), 2);
        let seen = client.seen();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].starts_with("http://fallback.test/"));
    }

    #[tokio::test]
    async fn test_both_fail_returns_empty() {
        let client = FakeClient::new(404, 500);
        let records = fetch_records(&client, &http_config()).await;

        assert!(records.is_empty());
        assert_eq!(client.seen().len(), 2);
    }

    #[tokio::test]
    async fn test_timeout_returns_empty() {
        let mut client = FakeClient::new(200, 200);
        client.delay = Some(Duration::from_secs(5));
        let mut config = http_config();
        config.timeout = Duration::from_millis(50);

        assert!(fetch_csv(&client, &config).await.is_err());
        assert!(fetch_records(&client, &config).await.is_empty());
    }

    #[tokio::test]
    async fn test_cache_bust_appends_timestamp() {
        let client = CacheBust::new(FakeClient::new(404, 200));
        fetch_records(&client, &http_config()).await;

        let seen = client.inner.seen();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("http://primary.test/dados.csv?t="));
        // existing query is preserved
        assert!(seen[1].starts_with("http://fallback.test/pub?output=csv&t="));
    }

    #[tokio::test]
    async fn test_missing_local_primary_falls_back() {
        let client = FakeClient::new(200, 200);
        let mut config = http_config();
        config.primary = Source::File(std::env::temp_dir().join("ks_board_missing_snapshot.csv"));

        let records = fetch_records(&client, &config).await;
        assert_eq!(records.len(), 2);
        assert_eq!(client.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_local_primary_is_read() {
        let path = std::env::temp_dir().join("ks_board_test_primary.csv");
        std::fs::write(&path, CSV).unwrap();

        let client = FakeClient::new(500, 500);
        let mut config = http_config();
        config.primary = Source::File(path.clone());

        let records = fetch_records(&client, &config).await;
        assert_eq!(records.len(), 2);
        assert!(client.seen().is_empty());

        std::fs::remove_file(&path).unwrap();
    }
}
