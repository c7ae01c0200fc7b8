//! Quote aggregation: prices plus likes for one or two symbols.
//!
//! A request is answered in two phases. First the prices of all requested symbols
//! are fetched concurrently; then, in request order, each symbol's like is
//! registered (or its count looked up). Any failure fails the whole request, and
//! since every price is known before the ledger is touched, a failed quote never
//! leaves a like behind.

use crate::anonymizer::{IdentityToken, anonymize};
use crate::gateway::QuoteGateway;
use crate::ledger::LikeLedger;
use log::debug;
use std::sync::Arc;
use stock_common::{Result, StockData, StockQuery, StockRecord, Symbol};

/// Combines the quote gateway and the like ledger.
pub struct QuoteAggregator {
    gateway: Arc<dyn QuoteGateway>,
    ledger: LikeLedger,
}

impl QuoteAggregator {
    /// Create an aggregator over `gateway` and `ledger`.
    pub fn new(gateway: Arc<dyn QuoteGateway>, ledger: LikeLedger) -> Self {
        Self { gateway, ledger }
    }

    /// Answer `query` for the requester at `raw_address`.
    ///
    /// With `wants_like`, the requester's anonymized identity likes every requested
    /// symbol. One symbol yields absolute likes; two yield relative likes in request order.
    pub async fn lookup(
        &self,
        query: &StockQuery,
        wants_like: bool,
        raw_address: &str,
    ) -> Result<StockData> {
        let identity = anonymize(raw_address);
        let like = wants_like.then_some(&identity);
        debug!(
            "Lookup {:?} like={} from {}...",
            query,
            wants_like,
            identity.short()
        );

        match query {
            StockQuery::One(symbol) => {
                let price = self.gateway.fetch_price(symbol).await?;
                let record = self.record(symbol, price, like).await?;
                Ok(StockData::Single(record))
            }
            StockQuery::Two(first, second) => {
                let (first_price, second_price) = futures::try_join!(
                    self.gateway.fetch_price(first),
                    self.gateway.fetch_price(second)
                )?;
                let first = self.record(first, first_price, like).await?;
                let second = self.record(second, second_price, like).await?;
                Ok(StockData::compare(first, second))
            }
        }
    }

    async fn record(
        &self,
        symbol: &Symbol,
        price: f64,
        like: Option<&IdentityToken>,
    ) -> Result<StockRecord> {
        let likes = match like {
            Some(identity) => self.ledger.register_like(symbol, identity).await?,
            None => self.ledger.get_or_create(symbol).await?.likes,
        };
        Ok(StockRecord {
            stock: symbol.to_string(),
            price,
            likes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::store::fake::FailingStore;
    use crate::store::{LikeStore, MemoryStore};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use stock_common::ErrorKind;
    use stock_common::stock_data::RelativeStockRecord;

    fn aggregator(gateway: FakeGateway, store: Arc<MemoryStore>) -> QuoteAggregator {
        QuoteAggregator::new(Arc::new(gateway), LikeLedger::new(store))
    }

    fn query(symbols: &[&str]) -> StockQuery {
        StockQuery::from_raw(symbols).unwrap()
    }

    async fn seed_likes(store: &MemoryStore, symbol: &str, count: usize) {
        for i in 0..count {
            store
                .append_like(symbol, &format!("seed-{}", i))
                .await
                .unwrap();
        }
    }

    fn pair(data: StockData) -> [RelativeStockRecord; 2] {
        match data {
            StockData::Pair(pair) => pair,
            other => panic!("expected a pair, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn new_symbol_without_like() {
        let store = Arc::new(MemoryStore::new());
        let agg = aggregator(FakeGateway::default().with_price("TSLA", 250.5), store.clone());

        let data = agg.lookup(&query(&["tsla"]), false, "10.0.0.1").await.unwrap();
        assert_eq!(
            data,
            StockData::Single(StockRecord {
                stock: "TSLA".into(),
                price: 250.5,
                likes: 0,
            })
        );
        assert_eq!(store.like_count("TSLA").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn repeated_like_from_same_address_counts_once() {
        let store = Arc::new(MemoryStore::new());
        let agg = aggregator(FakeGateway::default().with_price("TSLA", 250.5), store);

        let q = query(&["TSLA"]);
        agg.lookup(&q, true, "abc").await.unwrap();
        let StockData::Single(record) = agg.lookup(&q, true, "abc").await.unwrap() else {
            panic!("expected a single record");
        };
        assert_eq!(record.likes, 1);

        let StockData::Single(record) = agg.lookup(&q, true, "def").await.unwrap() else {
            panic!("expected a single record");
        };
        assert_eq!(record.likes, 2);
    }

    #[tokio::test]
    async fn two_symbols_report_relative_likes() {
        let store = Arc::new(MemoryStore::new());
        seed_likes(&store, "GOOG", 3).await;
        seed_likes(&store, "MSFT", 5).await;
        let gateway = FakeGateway::default()
            .with_price("GOOG", 140.1)
            .with_price("MSFT", 410.2);
        let agg = aggregator(gateway, store);

        let [goog, msft] = pair(
            agg.lookup(&query(&["goog", "msft"]), false, "10.0.0.1")
                .await
                .unwrap(),
        );
        assert_eq!((goog.stock.as_str(), goog.price, goog.rel_likes), ("GOOG", 140.1, -2));
        assert_eq!((msft.stock.as_str(), msft.price, msft.rel_likes), ("MSFT", 410.2, 2));
    }

    #[tokio::test]
    async fn like_applies_to_both_symbols() {
        let store = Arc::new(MemoryStore::new());
        seed_likes(&store, "MSFT", 1).await;
        let gateway = FakeGateway::default()
            .with_price("GOOG", 1.0)
            .with_price("MSFT", 2.0);
        let agg = aggregator(gateway, store.clone());

        let [goog, msft] = pair(
            agg.lookup(&query(&["GOOG", "MSFT"]), true, "10.0.0.1")
                .await
                .unwrap(),
        );
        assert_eq!(goog.rel_likes, -1);
        assert_eq!(msft.rel_likes, 1);
        assert_eq!(store.like_count("GOOG").await.unwrap(), Some(1));
        assert_eq!(store.like_count("MSFT").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn order_follows_request_not_completion() {
        let gateway = FakeGateway::default()
            .with_price("GOOG", 1.0)
            .with_price("MSFT", 2.0)
            .with_delay("GOOG", Duration::from_millis(50));
        let agg = aggregator(gateway, Arc::new(MemoryStore::new()));

        let [first, second] = pair(
            agg.lookup(&query(&["GOOG", "MSFT"]), false, "10.0.0.1")
                .await
                .unwrap(),
        );
        assert_eq!(first.stock, "GOOG");
        assert_eq!(second.stock, "MSFT");
    }

    #[tokio::test]
    async fn duplicate_symbols_are_processed_independently() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(FakeGateway::default().with_price("AAPL", 3.0));
        let agg = QuoteAggregator::new(gateway.clone(), LikeLedger::new(store.clone()));

        let [a, b] = pair(
            agg.lookup(&query(&["aapl", "AAPL"]), true, "10.0.0.1")
                .await
                .unwrap(),
        );
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
        assert_eq!((a.rel_likes, b.rel_likes), (0, 0));
        assert_eq!(store.like_count("AAPL").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn failed_quote_fails_whole_request_without_liking() {
        let store = Arc::new(MemoryStore::new());
        let agg = aggregator(FakeGateway::default().with_price("GOOG", 1.0), store.clone());

        let err = agg
            .lookup(&query(&["GOOG", "NOPE"]), true, "10.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QuoteUnavailable);
        assert_eq!(store.like_count("GOOG").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_like_on_second_symbol_fails_whole_request() {
        let gateway = FakeGateway::default()
            .with_price("GOOG", 1.0)
            .with_price("MSFT", 2.0);
        let agg = QuoteAggregator::new(
            Arc::new(gateway),
            LikeLedger::new(Arc::new(FailingStore::failing_on(&["MSFT"]))),
        );

        let err = agg
            .lookup(&query(&["GOOG", "MSFT"]), true, "10.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceUnavailable);

        let err = agg
            .lookup(&query(&["MSFT"]), false, "10.0.0.1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceUnavailable);
    }
}
