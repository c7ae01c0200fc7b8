//! Shared networking constants and helpers used by client and server.

/// Default HTTP port of the stock price server.
pub const DEFAULT_PORT: u16 = 3000;
/// Route serving price and like lookups.
pub const STOCK_PRICES_PATH: &str = "/api/stock-prices";
/// Default price source; `{symbol}` is replaced by the normalized ticker.
pub const DEFAULT_QUOTE_URL: &str =
    "https://stock-price-checker-proxy.freecodecamp.rocks/v1/stock/{symbol}/quote";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
