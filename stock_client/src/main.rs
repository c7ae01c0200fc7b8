//! Stock Client — looks up one stock, or compares two, against a running stock price
//! server and prints the result.
//!
//! Usage example (CLI):
//! ```bash
//! stock_client --server http://127.0.0.1:3000 --like goog msft
//! ```
//!
//! A single symbol prints its price and absolute likes; two symbols print prices and
//! likes relative to each other.
#![warn(missing_docs)]
mod args;
mod requester;

use crate::args::Args;
use crate::requester::StockRequester;
use clap::Parser;
use log::{error, info};
use stock_common::{Result, StockData, StockError, StockQuery};

#[tokio::main]
async fn main() -> Result<(), StockError> {
    init_logger();
    let args = Args::parse();

    let query = StockQuery::from_raw(&args.symbols)?;
    let requester = StockRequester::new(&args.server);

    match requester.lookup(&query, args.like).await {
        Ok(response) => {
            print_stock_data(&response.stock_data);
            Ok(())
        }
        Err(e) => {
            error!("Lookup failed: {}", e);
            Err(e)
        }
    }
}

fn print_stock_data(data: &StockData) {
    match data {
        StockData::Single(record) => {
            info!(
                "STOCK: {} Price={:.2} Likes={}",
                record.stock, record.price, record.likes
            );
        }
        StockData::Pair(records) => {
            for record in records {
                info!(
                    "STOCK: {} Price={:.2} RelLikes={:+}",
                    record.stock, record.price, record.rel_likes
                );
            }
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
