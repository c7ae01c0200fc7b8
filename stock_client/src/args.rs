//! Command-line arguments for the Stock Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use stock_common::net::DEFAULT_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the stock price server.
    #[clap(long, default_value_t = format!("http://127.0.0.1:{}", DEFAULT_PORT))]
    pub server: String,

    /// Like every requested stock.
    #[clap(long)]
    pub like: bool,

    /// One symbol to look up, or two to compare.
    #[clap(required = true, num_args = 1..=2)]
    pub symbols: Vec<String>,
}
