//! Like ledger: at-most-once likes per identity and symbol.
//!
//! The ledger is the only writer of like records. It owns an injected store handle
//! and exposes three operations:
//!
//! - `LikeLedger::get_or_create(symbol)` — fetch a record, creating an empty one on first use.
//! - `LikeLedger::register_like(symbol, identity)` — idempotent like; returns the count.
//! - `LikeLedger::get_like_count(symbol)` — read-only count, `0` for unseen symbols.
//!
//! Symbols are taken as [`Symbol`] so keys are always upper-cased before they reach
//! the store.

use crate::anonymizer::IdentityToken;
use crate::model::stock_record::StockLikeRecord;
use crate::store::LikeStore;
use log::{debug, error, info};
use std::sync::Arc;
use stock_common::{Result, StockError, Symbol};

/// Per-symbol like counters backed by a [`LikeStore`].
#[derive(Clone)]
pub struct LikeLedger {
    store: Arc<dyn LikeStore>,
}

impl LikeLedger {
    /// Create a ledger writing through `store`.
    pub fn new(store: Arc<dyn LikeStore>) -> Self {
        Self { store }
    }

    /// Record for `symbol`, created empty on first use.
    pub async fn get_or_create(&self, symbol: &Symbol) -> Result<StockLikeRecord> {
        self.store
            .get_or_create(symbol.as_str())
            .await
            .inspect_err(|e| log_store_error(symbol, e))
    }

    /// Register a like from `identity`, at most once per symbol.
    ///
    /// Repeating the call with the same identity leaves the record untouched and
    /// returns the unchanged count.
    pub async fn register_like(&self, symbol: &Symbol, identity: &IdentityToken) -> Result<u64> {
        let outcome = self
            .store
            .append_like(symbol.as_str(), identity.as_str())
            .await
            .inspect_err(|e| log_store_error(symbol, e))?;
        if outcome.added {
            info!("{} liked by {}..., now {} likes", symbol, identity.short(), outcome.likes);
        } else {
            debug!("{} already liked by {}...", symbol, identity.short());
        }
        Ok(outcome.likes)
    }

    /// Current like count without mutation; `0` for a symbol never seen.
    pub async fn get_like_count(&self, symbol: &Symbol) -> Result<u64> {
        let count = self
            .store
            .like_count(symbol.as_str())
            .await
            .inspect_err(|e| log_store_error(symbol, e))?;
        Ok(count.unwrap_or(0))
    }
}

fn log_store_error(symbol: &Symbol, err: &StockError) {
    error!("Like store failed for {}: {}", symbol, err);
}
