//! Process-local like store.

use super::{LikeOutcome, LikeStore};
use crate::model::stock_record::StockLikeRecord;
use async_trait::async_trait;
use dashmap::DashMap;
use stock_common::Result;

/// Like records held in a sharded concurrent map.
///
/// The map entry lock serializes writers of one symbol.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, StockLikeRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn get_or_create(&self, symbol: &str) -> Result<StockLikeRecord> {
        let record = self
            .records
            .entry(symbol.to_string())
            .or_insert_with(|| StockLikeRecord::new(symbol));
        Ok(record.value().clone())
    }

    async fn append_like(&self, symbol: &str, identity: &str) -> Result<LikeOutcome> {
        let mut record = self
            .records
            .entry(symbol.to_string())
            .or_insert_with(|| StockLikeRecord::new(symbol));
        let added = record.add_like(identity);
        Ok(LikeOutcome {
            likes: record.likes,
            added,
        })
    }

    async fn like_count(&self, symbol: &str) -> Result<Option<u64>> {
        Ok(self.records.get(symbol).map(|record| record.likes))
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
