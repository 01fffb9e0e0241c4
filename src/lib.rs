#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod service;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs, inspect_store.rs and tests/)
pub use config::AppConfig;
pub use data::{BinanceProvider, HistoryPager, MarketDataProvider, PriceStore, SqliteStorage};
pub use domain::{MarketSpec, PricePoint};
pub use error::HorizonError;
pub use service::{AppContext, router};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite file holding the price history
    #[arg(long, env = "PROFIT_HORIZON_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Where the trained model is written and read
    #[arg(long, env = "PROFIT_HORIZON_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    #[arg(long, env = "PROFIT_HORIZON_BIND")]
    pub bind: Option<String>,

    #[arg(long, env = "PROFIT_HORIZON_PORT")]
    pub port: Option<u16>,

    /// Report typed failures with their own HTTP status instead of a blanket 500
    #[arg(long, env = "PROFIT_HORIZON_DISTINCT_STATUS_CODES", default_value_t = false)]
    pub distinct_status_codes: bool,
}
