use std::sync::Arc;

use crate::{
    config::AppConfig,
    data::{HistoryPager, MarketDataProvider, PriceStore},
    forecast::Forecaster,
};

/// Shared handles passed to every handler via `axum::extract::State`.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn PriceStore>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub forecaster: Forecaster,
    pub pager: HistoryPager,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn PriceStore>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Arc<Self> {
        Self::with_pager(config, store, provider, HistoryPager::default())
    }

    pub fn with_pager(
        config: AppConfig,
        store: Arc<dyn PriceStore>,
        provider: Arc<dyn MarketDataProvider>,
        pager: HistoryPager,
    ) -> Arc<Self> {
        let forecaster = Forecaster::new(
            Arc::clone(&store),
            config.model_path.clone(),
            config.model.clone(),
        );
        Arc::new(Self {
            config,
            store,
            provider,
            forecaster,
            pager,
        })
    }
}
