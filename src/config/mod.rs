//! Configuration module for the profit horizon service.

// Can all be private now because we have a public re-export.
mod app;
mod binance;
mod debug;
mod forecast;
mod persistence;
mod service;

// Re-export commonly used items
pub use app::AppConfig;
pub use binance::{BINANCE, BINANCE_QUOTE_ASSETS, BinanceApiConfig};
pub use debug::DF;
pub use forecast::{FORECAST, ModelSettings, SeasonalitySpec};
pub use persistence::PERSISTENCE;
pub use service::SERVICE;
