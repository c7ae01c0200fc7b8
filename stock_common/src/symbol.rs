//! Stock symbols and the validated lookup request.
//!
//! Symbols arrive as free-form strings; a `Symbol` is always trimmed and upper-cased,
//! which is the form used both for the price lookup and as the like-record key.
//! `StockQuery` is the explicit one-or-two symbol shape the aggregator accepts.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::result::Result;

/// Upper-cased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalizes `raw` to an upper-case symbol.
    ///
    /// Returns `InvalidRequest` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StockError::InvalidRequest("empty stock symbol".into()));
        }
        Ok(Symbol(trimmed.to_uppercase()))
    }

    /// Symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A lookup for one symbol or a comparison of two.
///
/// The two symbols of `Two` may be equal; they are processed independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockQuery {
    /// Single lookup, answered with absolute likes.
    One(Symbol),
    /// Comparison, answered with relative likes in request order.
    Two(Symbol, Symbol),
}

impl StockQuery {
    /// Builds a query from raw symbol strings in request order.
    ///
    /// Zero symbols, more than two, or any blank symbol is an `InvalidRequest`.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        match raw {
            [] => Err(StockError::InvalidRequest(
                "at least one stock symbol is required".into(),
            )),
            [one] => Ok(StockQuery::One(Symbol::parse(one.as_ref())?)),
            [first, second] => Ok(StockQuery::Two(
                Symbol::parse(first.as_ref())?,
                Symbol::parse(second.as_ref())?,
            )),
            more => Err(StockError::InvalidRequest(format!(
                "at most two stock symbols are supported, got {}",
                more.len()
            ))),
        }
    }

    /// Symbols in request order.
    pub fn symbols(&self) -> Vec<&Symbol> {
        match self {
            StockQuery::One(symbol) => vec![symbol],
            StockQuery::Two(first, second) => vec![first, second],
        }
    }
}
