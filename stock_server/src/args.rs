//! Command-line arguments for the stock price server.
//!
//! Every option can also be given through the environment; `DB` names the like
//! record store the same way a hosted deployment passes its connection string.
use clap::Parser;
use stock_common::net::{DEFAULT_PORT, DEFAULT_QUOTE_URL, addr};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[clap(long, env = "STOCK_BIND", default_value_t = addr("0.0.0.0", DEFAULT_PORT))]
    pub bind: String,

    /// Price source URL; `{symbol}` is replaced by the requested ticker.
    #[clap(long, env = "STOCK_QUOTE_URL", default_value = DEFAULT_QUOTE_URL)]
    pub quote_url: String,

    /// Upper bound for a single price fetch, in milliseconds.
    #[clap(long, env = "STOCK_QUOTE_TIMEOUT_MS", default_value_t = 5000)]
    pub quote_timeout_ms: u64,

    /// Like record store: `memory`, or a path to a JSON document file.
    #[clap(long, env = "DB", default_value = "memory")]
    pub db: String,

    /// Take the requester address from `X-Forwarded-For` when present.
    #[clap(long, env = "STOCK_TRUST_FORWARDED")]
    pub trust_forwarded: bool,
}
