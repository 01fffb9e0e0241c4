use {
    anyhow::Result,
    binance_sdk::{
        config::ConfigurationRestApi,
        errors::{self, ConnectorError as connection_error},
        spot::{
            SpotRestApi,
            rest_api::{KlinesItemInner, KlinesParams, RestApi},
        },
    },
    std::convert::TryFrom,
    thiserror::Error,
};

use crate::{
    config::BinanceApiConfig,
    domain::{MarketSpec, PricePoint},
    utils::epoch_ms_to_naive,
};

/// The two fields we keep from a Binance kline row.
#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64,
    pub close_price: f64,
}

#[derive(Debug, Error)]
pub enum BNKlineError {
    #[error("kline row has too few fields")]
    InvalidLength,
    #[error("kline field '{0}' is malformed")]
    InvalidType(String),
    #[error("Binance klines request failed: {0}")]
    ConnectionFailed(String),
}

fn kline_item_as_f64(item: Option<KlinesItemInner>) -> Option<f64> {
    item.and_then(|inner| match inner {
        KlinesItemInner::String(s) => s.parse::<f64>().ok(),
        _ => None,
    })
}

// Row layout: [open_time, open, high, low, close, volume, close_time, quote_vol, trades, ...]
impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        if vec_inner_klines.len() < 5 {
            return Err(BNKlineError::InvalidLength);
        }

        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        // Skip open, high, low
        let close_price = kline_item_as_f64(items.nth(3))
            .filter(|c| c.is_finite())
            .ok_or_else(|| BNKlineError::InvalidType("close".to_string()))?;

        Ok(BNKline {
            open_timestamp_ms,
            close_price,
        })
    }
}

impl TryFrom<BNKline> for PricePoint {
    type Error = BNKlineError;

    fn try_from(bn: BNKline) -> Result<Self, Self::Error> {
        let timestamp = epoch_ms_to_naive(bn.open_timestamp_ms)
            .ok_or_else(|| BNKlineError::InvalidType("open_time out of range".to_string()))?;
        Ok(PricePoint::new(timestamp, bn.close_price))
    }
}

pub(crate) fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<PricePoint>, BNKlineError> {
    data.into_iter()
        .map(|row| BNKline::try_from(row).and_then(PricePoint::try_from))
        .collect()
}

pub(crate) fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

/// One klines call. Connector errors are logged by kind and returned as `ConnectionFailed`.
pub(crate) async fn fetch_binance_klines(
    rest_client: &RestApi,
    params: KlinesParams,
    market: &MarketSpec,
) -> Result<Vec<Vec<KlinesItemInner>>> {
    let response_result = rest_client.klines(params).await;
    match response_result {
        Ok(r) => {
            let data = r.data().await?;
            Ok(data)
        }
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!(
                            "{}: klines request rejected (check symbol and timeframe). {}",
                            market,
                            msg
                        );
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::warn!(
                            "{}: Binance rate limit hit during price fetch. {}",
                            market,
                            msg
                        );
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!(
                            "{}: IP banned by Binance for exceeding rate limits; stop fetching. {}",
                            market,
                            msg
                        );
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!(
                            "{}: Binance server error while fetching klines: {} (status {:?})",
                            market,
                            msg,
                            status_code
                        );
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!(
                            "{}: network error reaching Binance. {}",
                            market,
                            msg
                        );
                    }
                    errors::ConnectorError::NotFoundError(msg) => {
                        log::error!("{}: klines endpoint not found. {}", market, msg);
                    }
                    connection_error::BadRequestError(msg) => {
                        log::warn!(
                            "{}: bad klines request, unknown symbol or interval? {}",
                            market,
                            msg
                        );
                    }
                    other => {
                        log::error!("{}: unexpected Binance connector error: {:?}", market, other);
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Fetching prices for {} failed", market)),
                )
            } else {
                log::error!("{}: klines request failed outside the connector: {:#}", market, e);
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string()))
                        .context(format!("Fetching prices for {} failed", market)),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::format_store_timestamp;

    fn s(v: &str) -> KlinesItemInner {
        KlinesItemInner::String(v.to_string())
    }

    fn row(open_ms: i64, close: &str) -> Vec<KlinesItemInner> {
        vec![
            KlinesItemInner::Integer(open_ms),
            s("1.0"),
            s("2.0"),
            s("0.5"),
            s(close),
            s("123.4"),
            KlinesItemInner::Integer(open_ms + 86_399_999),
            s("999.0"),
        ]
    }

    #[test]
    fn keeps_open_time_and_close() {
        let points = convert_klines(vec![row(1_483_228_800_000, "963.38")]).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(
            format_store_timestamp(points[0].timestamp),
            "2017-01-01 00:00:00"
        );
        assert_eq!(points[0].close, 963.38);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(matches!(
            convert_klines(vec![row(0, "not-a-number")]),
            Err(BNKlineError::InvalidType(_))
        ));
        assert!(matches!(
            convert_klines(vec![vec![KlinesItemInner::Integer(0)]]),
            Err(BNKlineError::InvalidLength)
        ));
        assert!(matches!(
            convert_klines(vec![vec![s("0"), s("1"), s("1"), s("1"), s("1")]]),
            Err(BNKlineError::InvalidType(_))
        ));
        assert_eq!(
            BNKlineError::InvalidType("close".to_string()).to_string(),
            "kline field 'close' is malformed"
        );
    }
}
