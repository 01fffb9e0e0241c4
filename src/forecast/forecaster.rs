use {
    chrono::{Duration, NaiveDateTime},
    serde::{Deserialize, Serialize},
    std::{path::PathBuf, sync::Arc},
};

use crate::{
    config::{FORECAST, ModelSettings, PERSISTENCE},
    data::{PriceStore, load_model, save_model},
    domain::{ForecastPoint, PricePoint},
    error::HorizonError,
    forecast::{
        AdditiveModel,
        horizon::{HorizonOutcome, days_until_target, peak_forecast},
    },
    utils::now_timestamp_ms,
};

/// What goes to disk after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub format_version: u32,
    pub trained_at_ms: i64,
    pub model: AdditiveModel,
}

impl TrainedModel {
    pub const FORMAT_VERSION: u32 = PERSISTENCE.model.format_version;

    pub fn new(model: AdditiveModel, trained_at_ms: i64) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            trained_at_ms,
            model,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub last_date: NaiveDateTime,
    pub last_price: f64,
    pub rows_used: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitForecast {
    pub last_date: NaiveDateTime,
    pub last_close: f64,
    pub price_target: f64,
    pub outcome: HorizonOutcome,
    /// Best estimate inside the horizon, reported when the target is out of reach
    pub peak: Option<ForecastPoint>,
    pub model_trained_through: NaiveDateTime,
}

/// Owns the model artifact. Reads prices from the store it is handed.
pub struct Forecaster {
    store: Arc<dyn PriceStore>,
    model_path: PathBuf,
    settings: ModelSettings,
    min_rows: usize,
}

impl Forecaster {
    pub fn new(store: Arc<dyn PriceStore>, model_path: impl Into<PathBuf>, settings: ModelSettings) -> Self {
        Self {
            store,
            model_path: model_path.into(),
            settings,
            min_rows: FORECAST.min_training_rows,
        }
    }

    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    fn ensure_enough(&self, found: usize) -> Result<(), HorizonError> {
        if found < self.min_rows {
            return Err(HorizonError::InsufficientData {
                found,
                required: self.min_rows,
            });
        }
        Ok(())
    }

    /// Fits on every stored close and replaces the artifact. Nothing is written when
    /// the store is too small or the fit fails.
    pub async fn train(&self) -> Result<TrainingSummary, HorizonError> {
        let points = self.store.read_all().await.map_err(HorizonError::Storage)?;
        self.ensure_enough(points.len())?;

        let Some(last) = points.last() else {
            return Err(HorizonError::InsufficientData {
                found: 0,
                required: self.min_rows,
            });
        };
        let summary = TrainingSummary {
            last_date: last.timestamp,
            last_price: last.close,
            rows_used: points.len(),
        };

        let history: Vec<(NaiveDateTime, f64)> =
            points.iter().map(|p| (p.timestamp, p.close)).collect();
        let settings = self.settings.clone();
        let path = self.model_path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), HorizonError> {
            let model = AdditiveModel::fit(&history, &settings)?;
            save_model(&path, &TrainedModel::new(model, now_timestamp_ms()))
                .map_err(HorizonError::Storage)
        })
        .await
        .map_err(|e| HorizonError::ModelFit(format!("training task failed: {}", e)))??;

        log::info!(
            "Model trained on {} rows through {} (last close {:.2}).",
            summary.rows_used,
            summary.last_date,
            summary.last_price
        );
        Ok(summary)
    }

    /// Loads the artifact and projects `max_days` daily steps past the last stored observation.
    pub async fn forecast(
        &self,
        max_days: u32,
    ) -> Result<(PricePoint, TrainedModel, Vec<ForecastPoint>), HorizonError> {
        if max_days > FORECAST.max_horizon_days {
            return Err(HorizonError::InvalidRequest(format!(
                "max_days {} exceeds the supported horizon of {} days",
                max_days, FORECAST.max_horizon_days
            )));
        }

        let path = self.model_path.clone();
        let trained = tokio::task::spawn_blocking(move || load_model(&path))
            .await
            .map_err(|e| HorizonError::Storage(anyhow::anyhow!("model load task failed: {}", e)))?
            .map_err(HorizonError::Storage)?
            .ok_or_else(|| HorizonError::ModelNotFound(self.model_path.clone()))?;

        let found = self.store.count().await.map_err(HorizonError::Storage)?;
        self.ensure_enough(found as usize)?;
        let last = self
            .store
            .tail(1)
            .await
            .map_err(HorizonError::Storage)?
            .pop()
            .ok_or(HorizonError::InsufficientData {
                found: 0,
                required: self.min_rows,
            })?;

        let dates: Vec<NaiveDateTime> = (1..=i64::from(max_days))
            .map(|k| last.timestamp + Duration::days(k))
            .collect();
        let forecast = trained.model.predict(&dates);
        Ok((last, trained, forecast))
    }

    /// Days until the forecast reaches `last_close * (1 + target_profit_pct / 100)`.
    pub async fn predict(
        &self,
        target_profit_pct: f64,
        max_days: u32,
    ) -> Result<ProfitForecast, HorizonError> {
        if !target_profit_pct.is_finite() {
            return Err(HorizonError::InvalidRequest(format!(
                "target profit must be a finite percentage, got {}",
                target_profit_pct
            )));
        }

        let (last, trained, forecast) = self.forecast(max_days).await?;
        let price_target = last.close * (1.0 + target_profit_pct / 100.0);
        let outcome = days_until_target(&forecast, last.timestamp, price_target);

        log::info!(
            "Target {:.2} ({:+}% over {:.2}) within {} days: {}",
            price_target,
            target_profit_pct,
            last.close,
            max_days,
            match outcome.days() {
                Some(d) => format!("reached after {} days", d),
                None => "not reached".to_string(),
            }
        );

        Ok(ProfitForecast {
            last_date: last.timestamp,
            last_close: last.close,
            price_target,
            outcome,
            peak: peak_forecast(&forecast, last.timestamp),
            model_trained_through: trained.model.history_end,
        })
    }
}
