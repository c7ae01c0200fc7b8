//!
//! Common types and utilities shared by the stock price server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `StockError` and its `ErrorKind`.
//! - `result` — handy `Result<T, StockError>` alias.
//! - `symbol` — symbol normalization and the one-or-two symbol `StockQuery`.
//! - `stock_data` — response payloads exchanged over HTTP.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod result;
pub mod stock_data;
pub mod symbol;

pub use error::{ErrorKind, StockError};
pub use result::Result;
pub use stock_data::{StockData, StockPricesResponse, StockRecord};
pub use symbol::{StockQuery, Symbol};
