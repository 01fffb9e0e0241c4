use std::time::Duration;

pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// REST constraints: 1000 klines per page and the pause between history pages.
pub struct RestLimits {
    pub klines_limit: i32,
    pub page_delay: Duration,
}

pub struct HistoryConfig {
    /// Full refetch starts here (2017-01-01T00:00:00Z), before any Binance spot listing.
    pub start_ms: i64,
    /// Added to the last open time to form the next page cursor.
    pub cursor_step_ms: i64,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

pub struct MarketDefaults {
    pub symbol: &'static str,
    pub timeframe: &'static str,
    pub limit: u32,
}

pub struct BinanceConfig {
    pub limits: RestLimits,
    pub history: HistoryConfig,
    pub client: ClientDefaults,
    pub defaults: MarketDefaults,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        klines_limit: 1000,
        page_delay: Duration::from_secs(1),
    },
    history: HistoryConfig {
        start_ms: 1_483_228_800_000,
        cursor_step_ms: 1,
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 5,
        backoff_ms: 5000,
    },
    defaults: MarketDefaults {
        symbol: "BTC/USDT",
        timeframe: "1d",
        limit: 1000,
    },
};

/// Quote assets recognised when splitting a bare Binance symbol such as `ETHBTC`.
pub const BINANCE_QUOTE_ASSETS: &[&str] = &["USDT", "USDC", "FDUSD", "BUSD", "BTC", "ETH", "BNB", "EUR"];
