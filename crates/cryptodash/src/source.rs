//! CoinMarketCap ticker source

use std::time::Duration;

use async_trait::async_trait;
use cryptodash_core::{DataSource, Error, RawGlobal, RawRecord, Result};

/// Per-request transport timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches `GET {api_url}?limit=N` for the JSON array of tickers and
/// `GET {global_url}` for the market-wide totals.
#[derive(Debug, Clone)]
pub struct TickerSource {
    client: reqwest::Client,
    url: String,
    global_url: String,
    timeout: Duration,
}

impl TickerSource {
    pub fn new(url: impl Into<String>, global_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            global_url: global_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl DataSource for TickerSource {
    async fn fetch_ranked(&self, limit: u32) -> Result<Vec<RawRecord>> {
        let request = self.client.get(&self.url).query(&[("limit", limit)]);
        decode(&self.body(request, "ticker").await?)
    }

    async fn fetch_global(&self) -> Result<RawGlobal> {
        let request = self.client.get(&self.global_url);
        decode_global(&self.body(request, "global").await?)
    }
}

impl TickerSource {
    async fn body(&self, request: reqwest::RequestBuilder, what: &str) -> Result<Vec<u8>> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{what} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!("{what} API returned {status}")));
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|e| Error::transport(format!("Failed to read {what} response: {e}")))
    }
}

/// Decode a ticker payload. Malformed JSON is a transport failure.
pub fn decode(body: &[u8]) -> Result<Vec<RawRecord>> {
    serde_json::from_slice(body)
        .map_err(|e| Error::transport(format!("Failed to parse ticker response: {e}")))
}

/// Decode a global totals payload. Malformed JSON is a transport failure.
pub fn decode_global(body: &[u8]) -> Result<RawGlobal> {
    serde_json::from_slice(body)
        .map_err(|e| Error::transport(format!("Failed to parse global response: {e}")))
}
