//! Response payloads for the stock price endpoint.
//!
//! A single lookup answers with absolute likes:
//! `{"stockData": {"stock": "TSLA", "price": 250.5, "likes": 0}}`.
//! A comparison answers with relative likes only, in request order:
//! `{"stockData": [{"stock": "GOOG", "price": 1.0, "rel_likes": -2}, ...]}`.
use serde::{Deserialize, Serialize};

/// Price and absolute like count for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Normalized symbol.
    pub stock: String,
    /// Latest price reported by the price source.
    pub price: f64,
    /// Number of distinct identities that liked the symbol.
    pub likes: u64,
}

/// Price and like difference against the other symbol of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeStockRecord {
    /// Normalized symbol.
    pub stock: String,
    /// Latest price reported by the price source.
    pub price: f64,
    /// This symbol's likes minus the other symbol's likes.
    pub rel_likes: i64,
}

/// Either a single record or a two-record comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockData {
    /// One symbol was requested.
    Single(StockRecord),
    /// Two symbols were requested.
    Pair([RelativeStockRecord; 2]),
}

impl StockData {
    /// Turns two absolute records into a comparison.
    ///
    /// Each side gets `rel_likes = own likes - other likes`; absolute counts are dropped.
    /// Differences beyond the `i64` range saturate.
    pub fn compare(first: StockRecord, second: StockRecord) -> Self {
        let a = i64::try_from(first.likes).unwrap_or(i64::MAX);
        let b = i64::try_from(second.likes).unwrap_or(i64::MAX);
        StockData::Pair([
            RelativeStockRecord {
                stock: first.stock,
                price: first.price,
                rel_likes: a.saturating_sub(b),
            },
            RelativeStockRecord {
                stock: second.stock,
                price: second.price,
                rel_likes: b.saturating_sub(a),
            },
        ])
    }
}

/// Body of a successful `GET /api/stock-prices` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPricesResponse {
    /// Lookup result.
    #[serde(rename = "stockData")]
    pub stock_data: StockData,
}

/// Body of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Failure kind, e.g. `QuoteUnavailable`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}
