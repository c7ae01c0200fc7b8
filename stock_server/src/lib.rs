//! Stock price checker core.
//!
//! - `anonymizer` — SHA-256 identity tokens derived from requester addresses.
//! - `gateway` — `QuoteGateway` and its HTTP implementation.
//! - `model` — the persistent `StockLikeRecord`.
//! - `store` — `LikeStore` backends (in-memory, JSON document).
//! - `ledger` — `LikeLedger`, at-most-once likes per identity and symbol.
//! - `aggregator` — `QuoteAggregator`, prices plus likes for one or two symbols.
//! - `routes` — axum router exposing the aggregator.
//! - `args` — server configuration.
#![warn(missing_docs)]
pub mod aggregator;
pub mod anonymizer;
pub mod args;
pub mod gateway;
pub mod ledger;
pub mod model;
pub mod routes;
pub mod store;
