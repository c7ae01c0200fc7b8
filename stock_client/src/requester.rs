//! Sending lookups to the stock price server over HTTP.
//!
//! This module builds the `GET /api/stock-prices` URL for a validated query and
//! decodes either the success payload or the server's error body.
use log::{debug, info};
use reqwest::{Client, Url};
use stock_common::net::STOCK_PRICES_PATH;
use stock_common::stock_data::ErrorBody;
use stock_common::{Result, StockError, StockPricesResponse, StockQuery};

/// Helper type for querying the server.
pub struct StockRequester {
    client: Client,
    server: String,
}

impl StockRequester {
    /// Creates a requester for the server at base URL `server`.
    pub fn new(server: &str) -> Self {
        Self {
            client: Client::new(),
            server: server.trim_end_matches('/').to_string(),
        }
    }

    /// Full request URL for `query`, with every query value form-encoded.
    pub fn url(&self, query: &StockQuery, like: bool) -> Result<Url> {
        let mut params: Vec<(&str, &str)> = query
            .symbols()
            .into_iter()
            .map(|symbol| ("stock", symbol.as_str()))
            .collect();
        if like {
            params.push(("like", "true"));
        }
        let base = format!("{}{}", self.server, STOCK_PRICES_PATH);
        Url::parse_with_params(&base, params)
            .map_err(|e| StockError::Config(format!("invalid server URL {}: {}", self.server, e)))
    }

    /// Performs the lookup and decodes the response.
    pub async fn lookup(&self, query: &StockQuery, like: bool) -> Result<StockPricesResponse> {
        let url = self.url(query, like)?;
        info!("Requesting {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StockError::Http(format!("request to {} failed: {}", url, e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StockError::Http(format!("reading response failed: {}", e)))?;
        debug!("Server answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(err) => format!("{} ({}): {}", status, err.error, err.message),
                Err(_) => format!("{}: {}", status, String::from_utf8_lossy(&body)),
            };
            return Err(StockError::Http(message));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
