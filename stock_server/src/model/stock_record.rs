//! Per-symbol like record.
//!
//! A `StockLikeRecord` pairs a like counter with the set of identity tokens that
//! produced it. The counter only moves through [`StockLikeRecord::add_like`], so it
//! always equals the number of distinct identities in `liked_by`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Like state for a single upper-cased symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLikeRecord {
    /// Upper-cased ticker, unique per record.
    pub symbol: String,
    /// Count of distinct identities that liked the symbol.
    pub likes: u64,
    /// Anonymized identity tokens that already liked the symbol.
    pub liked_by: BTreeSet<String>,
}

impl StockLikeRecord {
    /// Create an empty record for `symbol`.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            likes: 0,
            liked_by: BTreeSet::new(),
        }
    }

    /// Record a like from `identity`.
    ///
    /// Returns `false` without touching the record if the identity already liked it.
    pub fn add_like(&mut self, identity: &str) -> bool {
        if !self.liked_by.insert(identity.to_string()) {
            return false;
        }
        self.likes += 1;
        true
    }

    /// Check whether `identity` already liked this symbol.
    pub fn is_liked_by(&self, identity: &str) -> bool {
        self.liked_by.contains(identity)
    }
}
