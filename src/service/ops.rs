//! The service operations, independent of the HTTP wiring.

use serde::Deserialize;

use crate::{
    config::{BINANCE, FORECAST, SERVICE},
    data::{fetch_full, fetch_recent},
    domain::{MarketSpec, PricePoint},
    error::HorizonError,
    forecast::{ProfitForecast, TrainingSummary},
    service::AppContext,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchDataRequest {
    pub symbol: String,
    pub timeframe: String,
    pub limit: u32,
    #[serde(alias = "fetchAll")]
    pub fetch_all: bool,
}

impl Default for FetchDataRequest {
    fn default() -> Self {
        Self {
            symbol: BINANCE.defaults.symbol.to_string(),
            timeframe: BINANCE.defaults.timeframe.to_string(),
            limit: BINANCE.defaults.limit,
            fetch_all: false,
        }
    }
}

fn default_max_days() -> u32 {
    FORECAST.default_max_days
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(alias = "targetProfitPercent", alias = "target_profit_percent")]
    pub target_profit: f64,
    #[serde(default = "default_max_days", alias = "maxDays")]
    pub max_days: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub market: MarketSpec,
    pub rows_fetched: usize,
    pub rows_new: u64,
    pub cleared: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub row_count: u64,
    pub first_rows: Vec<PricePoint>,
    pub last_rows: Vec<PricePoint>,
}

/// Pulls candles and stores them. A full pull empties the store before the first page is requested.
pub async fn fetch_data(ctx: &AppContext, req: &FetchDataRequest) -> Result<FetchReport, HorizonError> {
    let market = MarketSpec::parse(&req.symbol, &req.timeframe)?;

    let (points, cleared) = if req.fetch_all {
        let cleared = ctx.store.clear().await.map_err(HorizonError::Storage)?;
        log::info!("{}: cleared {} rows before full history pull.", market, cleared);
        let points = fetch_full(ctx.provider.as_ref(), &market, &ctx.pager).await?;
        (points, Some(cleared))
    } else {
        let points = fetch_recent(ctx.provider.as_ref(), &market, req.limit).await?;
        (points, None)
    };

    let rows_new = ctx
        .store
        .insert(&points)
        .await
        .map_err(HorizonError::Storage)?;

    log::info!(
        "{}: stored {} fetched rows ({} new).",
        market,
        points.len(),
        rows_new
    );

    Ok(FetchReport {
        market,
        rows_fetched: points.len(),
        rows_new,
        cleared,
    })
}

pub async fn clear_database(ctx: &AppContext) -> Result<u64, HorizonError> {
    let removed = ctx.store.clear().await.map_err(HorizonError::Storage)?;
    log::info!("Price store cleared ({} rows removed).", removed);
    Ok(removed)
}

pub async fn train_model(ctx: &AppContext) -> Result<TrainingSummary, HorizonError> {
    ctx.forecaster.train().await
}

pub async fn predict_days_profit(
    ctx: &AppContext,
    req: &PredictRequest,
) -> Result<ProfitForecast, HorizonError> {
    ctx.forecaster.predict(req.target_profit, req.max_days).await
}

pub async fn validate_data(ctx: &AppContext, query: &ValidateQuery) -> Result<ValidationReport, HorizonError> {
    let limit = query.limit.unwrap_or(SERVICE.validate_rows);
    let row_count = ctx.store.count().await.map_err(HorizonError::Storage)?;
    let first_rows = ctx.store.head(limit).await.map_err(HorizonError::Storage)?;
    let last_rows = ctx.store.tail(limit).await.map_err(HorizonError::Storage)?;

    Ok(ValidationReport {
        row_count,
        first_rows,
        last_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        data::{HistoryPager, PriceStore, ScriptedProvider, SqliteStorage},
        utils::epoch_ms_to_naive,
    };
    use std::{sync::Arc, time::Duration};

    async fn context(provider: ScriptedProvider) -> (tempfile::TempDir, Arc<AppContext>) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("prices.sqlite"),
            model_path: dir.path().join("model.bin"),
            ..AppConfig::default()
        };
        let store = Arc::new(SqliteStorage::open(&config.db_path).await.unwrap());
        let pager = HistoryPager {
            page_limit: 40,
            page_delay: Duration::ZERO,
            ..HistoryPager::default()
        };
        let ctx = AppContext::with_pager(config, store, Arc::new(provider), pager);
        (dir, ctx)
    }

    #[tokio::test]
    async fn full_refetch_replaces_existing_rows() {
        let (_dir, ctx) =
            context(ScriptedProvider::daily(100, BINANCE.history.start_ms)).await;

        // A stale row from some earlier pull, far outside what the exchange serves.
        let stale = PricePoint::new(epoch_ms_to_naive(1_000_000_000_000).unwrap(), 1.0);
        ctx.store.insert(&[stale]).await.unwrap();

        let req = FetchDataRequest {
            fetch_all: true,
            ..FetchDataRequest::default()
        };
        let report = fetch_data(&ctx, &req).await.unwrap();
        assert_eq!(report.cleared, Some(1));
        assert_eq!(report.rows_fetched, 100);
        assert_eq!(report.rows_new, 100);

        let rows = ctx.store.read_all().await.unwrap();
        assert_eq!(rows.len(), 100);
        assert!(!rows.contains(&stale));
    }

    #[tokio::test]
    async fn recent_fetch_is_idempotent() {
        let (_dir, ctx) =
            context(ScriptedProvider::daily(100, BINANCE.history.start_ms)).await;
        let req = FetchDataRequest {
            limit: 30,
            ..FetchDataRequest::default()
        };

        assert_eq!(fetch_data(&ctx, &req).await.unwrap().rows_new, 30);
        let again = fetch_data(&ctx, &req).await.unwrap();
        assert_eq!(again.rows_fetched, 30);
        assert_eq!(again.rows_new, 0);
        assert_eq!(ctx.store.count().await.unwrap(), 30);
    }

    #[tokio::test]
    async fn bad_timeframe_never_touches_the_store() {
        let (_dir, ctx) =
            context(ScriptedProvider::daily(10, BINANCE.history.start_ms)).await;
        ctx.store
            .insert(&[PricePoint::new(epoch_ms_to_naive(0).unwrap(), 1.0)])
            .await
            .unwrap();

        let req = FetchDataRequest {
            timeframe: "fortnightly".to_string(),
            fetch_all: true,
            ..FetchDataRequest::default()
        };
        assert!(matches!(
            fetch_data(&ctx, &req).await,
            Err(HorizonError::InvalidRequest(_))
        ));
        assert_eq!(ctx.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn validate_reports_both_ends() {
        let (_dir, ctx) =
            context(ScriptedProvider::daily(12, BINANCE.history.start_ms)).await;
        fetch_data(&ctx, &FetchDataRequest::default()).await.unwrap();

        let report = validate_data(&ctx, &ValidateQuery { limit: Some(2) })
            .await
            .unwrap();
        assert_eq!(report.row_count, 12);
        assert_eq!(
            report.first_rows.iter().map(|p| p.close).collect::<Vec<_>>(),
            vec![100.0, 101.0]
        );
        assert_eq!(
            report.last_rows.iter().map(|p| p.close).collect::<Vec<_>>(),
            vec![110.0, 111.0]
        );

        assert_eq!(clear_database(&ctx).await.unwrap(), 12);
        assert_eq!(validate_data(&ctx, &ValidateQuery::default()).await.unwrap().row_count, 0);
    }

    #[test]
    fn requests_accept_defaults_and_camel_case() {
        let fetch: FetchDataRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(fetch.symbol, "BTC/USDT");
        assert_eq!(fetch.timeframe, "1d");
        assert_eq!(fetch.limit, 1000);
        assert!(!fetch.fetch_all);

        let fetch: FetchDataRequest = serde_json::from_str(r#"{"fetchAll": true}"#).unwrap();
        assert!(fetch.fetch_all);

        let predict: PredictRequest = serde_json::from_str(r#"{"target_profit": 5}"#).unwrap();
        assert_eq!(predict.max_days, 365);

        let predict: PredictRequest =
            serde_json::from_str(r#"{"targetProfitPercent": 2.5, "maxDays": 30}"#).unwrap();
        assert_eq!(predict.target_profit, 2.5);
        assert_eq!(predict.max_days, 30);
    }
}
