//! Stock price checker server.
//!
//! Serves `GET /api/stock-prices`, which returns the latest price of one or two
//! stocks together with how many distinct requesters liked them. The binary wires
//! together four building blocks:
//!
//! - `anonymizer` — turns the requester address into a SHA-256 identity token.
//! - `gateway` — `QuoteGateway` fetching the latest price from the upstream price source.
//! - `ledger` — `LikeLedger`, at-most-once likes per identity and symbol, on top of a
//!   `store` (in-memory `DashMap` or a JSON document file).
//! - `aggregator` — `QuoteAggregator`, fetching prices concurrently, applying likes in
//!   request order, and shaping single or relative-likes responses.
//!
//! `routes` exposes the aggregator over HTTP; `args` holds the configuration.
//! Any failure fails the whole request and is surfaced as a `StockError` kind.
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stock_common::{Result, StockError};
use stock_server::aggregator::QuoteAggregator;
use stock_server::args::Args;
use stock_server::gateway::HttpQuoteGateway;
use stock_server::ledger::LikeLedger;
use stock_server::routes::{self, AppState};
use stock_server::store;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), StockError> {
    init_logger();
    let args = Args::parse();

    let store = store::open(&args.db).await?;
    info!("Like records kept in {}", store.describe());

    let gateway = HttpQuoteGateway::new(
        args.quote_url.as_str(),
        Duration::from_millis(args.quote_timeout_ms),
    )?;
    info!("Quotes fetched from {}", args.quote_url);

    let state = AppState {
        aggregator: Arc::new(QuoteAggregator::new(
            Arc::new(gateway),
            LikeLedger::new(store),
        )),
        trust_forwarded: args.trust_forwarded,
    };
    let app = routes::router(state);

    let listener = TcpListener::bind(&args.bind).await?;
    info!("Stock price server listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
