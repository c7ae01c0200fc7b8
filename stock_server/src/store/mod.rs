//! Backing stores for like records.
//!
//! A store is a keyed document table of [`StockLikeRecord`]s supporting exactly the
//! three primitives the ledger needs. Implementations must make `append_like` atomic
//! per symbol: concurrent calls with distinct identities all count, concurrent calls
//! with the same identity count once.
//!
//! - `memory` — process-local `DashMap`, lost on restart.
//! - `json_file` — JSON document on disk, rewritten after every mutation.

pub mod json_file;
pub mod memory;

use crate::model::stock_record::StockLikeRecord;
use async_trait::async_trait;
use std::sync::Arc;
use stock_common::Result;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Store descriptor selecting the in-process store.
pub const MEMORY_DESCRIPTOR: &str = "memory";

/// Result of a conditional append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// Like count after the call.
    pub likes: u64,
    /// Whether this call added the identity.
    pub added: bool,
}

/// Keyed record table used by the like ledger.
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Return the record for `symbol`, creating an empty one if it does not exist.
    async fn get_or_create(&self, symbol: &str) -> Result<StockLikeRecord>;

    /// Add `identity` to the record of `symbol` and bump its count, unless already present.
    ///
    /// Creates the record first if needed.
    async fn append_like(&self, symbol: &str, identity: &str) -> Result<LikeOutcome>;

    /// Current like count, or `None` for a symbol never seen.
    async fn like_count(&self, symbol: &str) -> Result<Option<u64>>;

    /// Short human-readable description used in startup logs.
    fn describe(&self) -> String;
}

/// Open the store named by `descriptor`: `memory`, or a path to a JSON document file.
pub async fn open(descriptor: &str) -> Result<Arc<dyn LikeStore>> {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() || descriptor.eq_ignore_ascii_case(MEMORY_DESCRIPTOR) {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(JsonFileStore::open(descriptor).await?))
}
