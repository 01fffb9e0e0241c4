use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    binance_sdk::spot::rest_api::{KlinesParams, RestApi},
    std::time::Duration,
};

use crate::{
    config::BINANCE,
    data::bn_kline::{configure_binance_client, convert_klines, fetch_binance_klines},
    domain::{MarketSpec, PricePoint},
    error::HorizonError,
    utils::naive_to_epoch_ms,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// One page of candles reduced to closes, ascending.
    /// `start_time: None` asks for the most recent `limit` candles.
    async fn fetch_candles(
        &self,
        market: &MarketSpec,
        start_time: Option<i64>,
        limit: i32,
    ) -> Result<Vec<PricePoint>>;
}

pub struct BinanceProvider {
    rest_client: RestApi,
}

impl BinanceProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rest_client: configure_binance_client()?,
        })
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    async fn fetch_candles(
        &self,
        market: &MarketSpec,
        start_time: Option<i64>,
        limit: i32,
    ) -> Result<Vec<PricePoint>> {
        let params = KlinesParams::builder(
            market.bn_name().to_string(),
            market.timeframe.klines_interval(),
        )
        .limit(limit)
        .start_time(start_time)
        .build()?;

        let rows = fetch_binance_klines(&self.rest_client, params, market).await?;
        convert_klines(rows).with_context(|| format!("Malformed kline payload for {}", market))
    }
}

/// How a full-history pull walks the exchange.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    pub start_ms: i64,
    pub page_limit: i32,
    pub page_delay: Duration,
}

impl Default for HistoryPager {
    fn default() -> Self {
        Self {
            start_ms: BINANCE.history.start_ms,
            page_limit: BINANCE.limits.klines_limit,
            page_delay: BINANCE.limits.page_delay,
        }
    }
}

/// Up to `limit` most recent candles, ascending.
pub async fn fetch_recent(
    provider: &dyn MarketDataProvider,
    market: &MarketSpec,
    limit: u32,
) -> Result<Vec<PricePoint>, HorizonError> {
    if limit == 0 {
        return Err(HorizonError::InvalidRequest(
            "limit must be at least 1".to_string(),
        ));
    }
    let max = BINANCE.limits.klines_limit;
    let page_limit = i32::try_from(limit).unwrap_or(max).min(max);
    if page_limit as u32 != limit {
        log::warn!(
            "{}: limit {} exceeds the exchange maximum, clamping to {}.",
            market,
            limit,
            page_limit
        );
    }

    let mut points = provider
        .fetch_candles(market, None, page_limit)
        .await
        .map_err(HorizonError::UpstreamFetch)?;
    points.sort_by_key(|p| p.timestamp);

    log::info!("{}: fetched {} recent candles.", market, points.len());
    Ok(points)
}

/// Everything from `pager.start_ms` onwards. Each page starts one millisecond after the
/// previous page's last open time; an empty page ends the walk.
/// A failing page aborts the whole pull.
pub async fn fetch_full(
    provider: &dyn MarketDataProvider,
    market: &MarketSpec,
    pager: &HistoryPager,
) -> Result<Vec<PricePoint>, HorizonError> {
    let mut all_points: Vec<PricePoint> = Vec::new();
    let mut since = pager.start_ms;

    loop {
        let page = provider
            .fetch_candles(market, Some(since), pager.page_limit)
            .await
            .with_context(|| {
                format!(
                    "History page starting at {} failed after {} records",
                    since,
                    all_points.len()
                )
            })
            .map_err(HorizonError::UpstreamFetch)?;

        let Some(last) = page.last() else {
            break;
        };

        #[cfg(debug_assertions)]
        if DF.log_pagination {
            log::info!(
                "{}: page from cursor {} returned {} candles.",
                market,
                since,
                page.len()
            );
        }

        let next = naive_to_epoch_ms(last.timestamp) + BINANCE.history.cursor_step_ms;
        if next <= since {
            return Err(HorizonError::upstream(anyhow::anyhow!(
                "{}: exchange returned a page ending before cursor {}",
                market,
                since
            )));
        }
        since = next;
        all_points.extend(page);

        log::info!("{}: downloaded {} records...", market, all_points.len());

        if !pager.page_delay.is_zero() {
            tokio::time::sleep(pager.page_delay).await;
        }
    }

    all_points.sort_by_key(|p| p.timestamp);
    Ok(all_points)
}
