mod bn_kline;
mod model_io;
mod provider;
mod storage;

pub use {
    provider::{BinanceProvider, HistoryPager, MarketDataProvider, fetch_full, fetch_recent},
    storage::{PriceStore, SqliteStorage},
};

pub(crate) use model_io::{load_model, save_model};

#[cfg(test)]
pub(crate) use provider::tests::ScriptedProvider;
