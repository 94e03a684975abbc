use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use chrono::Utc;

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// An [`HttpClient`] wrapper that appends `t=<unix millis>` to every request
/// so CDNs and the spreadsheet export never serve a stale copy.
pub struct CacheBust<C> {
    pub inner: C,
}

impl<C> CacheBust<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for CacheBust<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let stamp = Utc::now().timestamp_millis().to_string();
        req.url_mut()
            .query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &stamp);
        self.inner.execute(req).await
    }
}
