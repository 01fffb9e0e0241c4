//! Forecasting model configuration

use serde::{Deserialize, Serialize};

/// One Fourier seasonality block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySpec {
    pub enabled: bool,
    /// Period in days
    pub period_days: f64,
    /// Number of sin/cos pairs
    pub fourier_order: usize,
}

impl SeasonalitySpec {
    pub const fn active_order(&self) -> usize {
        if self.enabled { self.fourier_order } else { 0 }
    }
}

/// Settings for the additive trend + seasonality model.
/// Stored inside the model artifact so predictions always use the settings the model was fitted with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub yearly: SeasonalitySpec,
    pub weekly: SeasonalitySpec,
    pub daily: SeasonalitySpec,

    /// Upper bound on trend changepoints
    pub n_changepoints: usize,
    /// Fraction of history (by row) in which changepoints may sit
    pub changepoint_range: f64,
    /// Prior scale on changepoint rate adjustments. Smaller = stiffer trend.
    pub changepoint_prior_scale: f64,
    /// Prior scale on Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Floor on the noise variance (scaled units) used to turn prior scales into ridge penalties
    pub noise_variance_floor: f64,
    /// Width of the reported prediction interval (0.8 = 80%)
    pub interval_width: f64,
}

pub struct ForecastConfig {
    /// Rows required before training or predicting
    pub min_training_rows: usize,
    /// Horizon used when a request does not name one
    pub default_max_days: u32,
    /// Longest horizon a request may ask for
    pub max_horizon_days: u32,
    pub model: ModelSettings,
}

pub const FORECAST: ForecastConfig = ForecastConfig {
    min_training_rows: 10,
    default_max_days: 365,
    max_horizon_days: 3650,
    model: ModelSettings {
        yearly: SeasonalitySpec {
            enabled: true,
            period_days: 365.25,
            fourier_order: 10,
        },
        weekly: SeasonalitySpec {
            enabled: true,
            period_days: 7.0,
            fourier_order: 3,
        },
        daily: SeasonalitySpec {
            enabled: false,
            period_days: 1.0,
            fourier_order: 4,
        },
        n_changepoints: 25,
        changepoint_range: 0.8,
        changepoint_prior_scale: 0.05,
        seasonality_prior_scale: 10.0,
        noise_variance_floor: 1e-4,
        interval_width: 0.8,
    },
};

impl Default for ModelSettings {
    fn default() -> Self {
        FORECAST.model
    }
}
