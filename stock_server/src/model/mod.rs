//! Domain models for the stock price server.
//!
//! - `stock_record` — persistent like record kept per symbol.

pub mod stock_record;
