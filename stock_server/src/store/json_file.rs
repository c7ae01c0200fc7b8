//! Like store persisted as a single JSON document.
//!
//! The file maps each symbol to its record:
//! `{"TSLA": {"symbol": "TSLA", "likes": 1, "liked_by": ["ba78..."]}}`.
//! All records are kept in memory behind one async lock; every mutation rewrites
//! the file through a temporary sibling and an atomic rename (both on `tokio::fs`,
//! off the runtime workers) before the lock is released. If the write fails the
//! mutation is undone, so memory never runs ahead of disk.

use super::{LikeOutcome, LikeStore};
use crate::model::stock_record::StockLikeRecord;
use async_trait::async_trait;
use log::error;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stock_common::{Result, StockError};
use tokio::fs;
use tokio::sync::Mutex;

type Records = BTreeMap<String, StockLikeRecord>;

/// File-backed like store.
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonFileStore {
    /// Open the document at `path`, creating an empty one if it does not exist.
    ///
    /// Fails with `PersistenceUnavailable` if the file cannot be read, parsed or written.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| persistence(&path, "stat", e))?;
        let records = if exists {
            let data = fs::read(&path)
                .await
                .map_err(|e| persistence(&path, "read", e))?;
            if data.iter().all(u8::is_ascii_whitespace) {
                Records::new()
            } else {
                serde_json::from_slice(&data).map_err(|e| persistence(&path, "parse", e))?
            }
        } else {
            Records::new()
        };
        write_document(&path, &records).await?;

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Apply `mutate` to the record of `symbol` and persist the result.
    ///
    /// Nothing is written when `mutate` reports that it changed nothing.
    async fn update<T>(
        &self,
        symbol: &str,
        mutate: impl FnOnce(&mut StockLikeRecord) -> (T, bool),
    ) -> Result<T> {
        let mut records = self.records.lock().await;
        let previous = records.get(symbol).cloned();
        let record = records
            .entry(symbol.to_string())
            .or_insert_with(|| StockLikeRecord::new(symbol));
        let (value, changed) = mutate(record);

        if !changed && previous.is_some() {
            return Ok(value);
        }
        if let Err(e) = write_document(&self.path, &records).await {
            error!("Rolling back {} after failed write: {}", symbol, e);
            match previous {
                Some(prev) => records.insert(symbol.to_string(), prev),
                None => records.remove(symbol),
            };
            return Err(e);
        }
        Ok(value)
    }
}

#[async_trait]
impl LikeStore for JsonFileStore {
    async fn get_or_create(&self, symbol: &str) -> Result<StockLikeRecord> {
        self.update(symbol, |record| (record.clone(), false)).await
    }

    async fn append_like(&self, symbol: &str, identity: &str) -> Result<LikeOutcome> {
        self.update(symbol, |record| {
            let added = record.add_like(identity);
            (
                LikeOutcome {
                    likes: record.likes,
                    added,
                },
                added,
            )
        })
        .await
    }

    async fn like_count(&self, symbol: &str) -> Result<Option<u64>> {
        let records = self.records.lock().await;
        Ok(records.get(symbol).map(|record| record.likes))
    }

    fn describe(&self) -> String {
        format!("JSON document {}", self.path.display())
    }
}

async fn write_document(path: &Path, records: &Records) -> Result<()> {
    let data = serde_json::to_vec_pretty(records).map_err(|e| persistence(path, "encode", e))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data)
        .await
        .map_err(|e| persistence(&tmp, "write", e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| persistence(path, "replace", e))?;
    Ok(())
}

fn persistence(path: &Path, action: &str, err: impl std::fmt::Display) -> StockError {
    StockError::PersistenceUnavailable(format!(
        "failed to {} {}: {}",
        action,
        path.display(),
        err
    ))
}
