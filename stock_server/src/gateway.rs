//! Quote gateway: latest price for a symbol from the upstream price source.
//!
//! The upstream answers `GET <template with {symbol}>` with a JSON quote carrying a
//! `latestPrice` number. Unknown tickers come back as a bare JSON string
//! (`"Unknown symbol"`), which fails to decode and is reported like any other
//! upstream failure. One attempt per call, bounded by the client timeout.
//!
//! The placeholder must be a whole path segment; the symbol is percent-encoded
//! into it, so `/`, `?` or `#` in a symbol can never reach another resource.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use stock_common::{Result, StockError, Symbol};

/// Placeholder in the price source URL that receives the symbol.
const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// Source of current prices.
#[async_trait]
pub trait QuoteGateway: Send + Sync {
    /// Latest price of `symbol`, or `QuoteUnavailable`.
    async fn fetch_price(&self, symbol: &Symbol) -> Result<f64>;
}

/// Upstream quote body; only the price is used.
#[derive(Debug, Deserialize)]
struct UpstreamQuote {
    #[serde(rename = "latestPrice")]
    latest_price: Option<f64>,
}

/// HTTP-backed [`QuoteGateway`].
pub struct HttpQuoteGateway {
    client: Client,
    url_template: String,
    timeout: Duration,
}

impl HttpQuoteGateway {
    /// Build a gateway for `url_template`, whose path has a `{symbol}` segment.
    ///
    /// A template that is not a URL, or has no such segment, is a `Config` error.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url_template = url_template.into();
        let marker = "symbol-segment";
        let sample = quote_url(&url_template, marker)?;
        let in_path = sample
            .path_segments()
            .is_some_and(|mut segments| segments.any(|segment| segment == marker));
        if !in_path {
            return Err(StockError::Config(format!(
                "quote URL template needs a {} path segment: {}",
                SYMBOL_PLACEHOLDER, url_template
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StockError::Http(e.to_string()))?;
        Ok(Self {
            client,
            url_template,
            timeout,
        })
    }
}

/// Fill the placeholder of `template` with `symbol` encoded as one path segment.
///
/// `.` and `..` would be dropped or resolved as path steps, so they are refused.
fn quote_url(template: &str, symbol: &str) -> Result<Url> {
    if matches!(symbol, "." | "..") {
        return Err(StockError::InvalidRequest(format!(
            "symbol {} is not a ticker",
            symbol
        )));
    }
    let mut scratch = Url::parse("http://localhost/").map_err(config_error)?;
    scratch
        .path_segments_mut()
        .map_err(|_| StockError::Config("scratch URL cannot hold path segments".into()))?
        .pop()
        .push(symbol);
    let encoded = &scratch.path()[1..];
    Url::parse(&template.replace(SYMBOL_PLACEHOLDER, encoded)).map_err(config_error)
}

fn config_error(err: impl std::fmt::Display) -> StockError {
    StockError::Config(format!("invalid quote URL: {}", err))
}

#[async_trait]
impl QuoteGateway for HttpQuoteGateway {
    async fn fetch_price(&self, symbol: &Symbol) -> Result<f64> {
        let url = quote_url(&self.url_template, symbol.as_str())?;
        debug!("Fetching quote for {} from {}", symbol, url);

        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| self.upstream_error(symbol, e))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.upstream_error(symbol, e))?;

        parse_latest_price(symbol, &body).inspect_err(|e| warn!("{}", e))
    }
}

impl HttpQuoteGateway {
    fn upstream_error(&self, symbol: &Symbol, err: reqwest::Error) -> StockError {
        let reason = if err.is_timeout() {
            format!("timed out after {} ms", self.timeout.as_millis())
        } else if let Some(status) = err.status() {
            format!("upstream returned {}", status)
        } else {
            format!("request failed: {}", err)
        };
        warn!("Quote fetch for {} failed: {}", symbol, reason);
        StockError::quote_unavailable(symbol.as_str(), reason)
    }
}

/// Extract a usable `latestPrice` from an upstream body.
fn parse_latest_price(symbol: &Symbol, body: &[u8]) -> Result<f64> {
    let quote: UpstreamQuote = serde_json::from_slice(body).map_err(|_| {
        StockError::quote_unavailable(
            symbol.as_str(),
            format!("unexpected body: {}", String::from_utf8_lossy(&body[..body.len().min(64)])),
        )
    })?;
    match quote.latest_price {
        Some(price) if price.is_finite() => Ok(price),
        Some(price) => Err(StockError::quote_unavailable(
            symbol.as_str(),
            format!("non-finite price {}", price),
        )),
        None => Err(StockError::quote_unavailable(
            symbol.as_str(),
            "no latestPrice in response",
        )),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted gateway for aggregator and route tests.
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub(crate) struct FakeGateway {
        prices: HashMap<String, f64>,
        delays: HashMap<String, Duration>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeGateway {
        pub(crate) fn with_price(mut self, symbol: &str, price: f64) -> Self {
            self.prices.insert(symbol.to_string(), price);
            self
        }

        pub(crate) fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
            self.delays.insert(symbol.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl QuoteGateway for FakeGateway {
        async fn fetch_price(&self, symbol: &Symbol) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(symbol.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.prices
                .get(symbol.as_str())
                .copied()
                .ok_or_else(|| StockError::quote_unavailable(symbol.as_str(), "Unknown symbol"))
        }
    }
}
