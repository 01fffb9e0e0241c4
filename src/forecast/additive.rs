//! Additive trend + seasonality model.
//!
//! `y(t) = trend(t) + Σ seasonal(t)` where the trend is piecewise linear with
//! changepoints over the early part of the history and each seasonality is a
//! truncated Fourier series on absolute time. Coefficients come from one ridge
//! solve; the prior scales in [`ModelSettings`] become the ridge penalties.

use {
    chrono::NaiveDateTime,
    serde::{Deserialize, Serialize},
    statrs::distribution::{ContinuousCDF, Normal},
    std::f64::consts::TAU,
};

use crate::{
    config::{ModelSettings, SeasonalitySpec},
    domain::ForecastPoint,
    error::HorizonError,
    forecast::solver::ridge_least_squares,
    utils::days_since_epoch,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// z for a central 80% band, used if statrs cannot build the unit normal.
const Z_80: f64 = 1.281_551_565_544_600_4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveModel {
    pub settings: ModelSettings,
    pub history_start: NaiveDateTime,
    pub history_end: NaiveDateTime,
    pub rows_used: usize,

    // Trend time is (days - origin) / span, so the history maps to [0, 1].
    t_origin_days: f64,
    t_span_days: f64,
    y_scale: f64,
    /// In scaled trend time
    changepoints: Vec<f64>,
    /// [intercept, slope, deltas.., fourier..]
    coefficients: Vec<f64>,
    /// Residual standard deviation in scaled units
    residual_sd: f64,
}

fn seasonal_blocks(settings: &ModelSettings) -> [SeasonalitySpec; 3] {
    [settings.yearly, settings.weekly, settings.daily]
}

fn seasonal_width(settings: &ModelSettings) -> usize {
    seasonal_blocks(settings)
        .iter()
        .map(|s| 2 * s.active_order())
        .sum()
}

fn push_fourier(row: &mut Vec<f64>, days: f64, settings: &ModelSettings) {
    for spec in seasonal_blocks(settings) {
        for n in 1..=spec.active_order() {
            let angle = TAU * n as f64 * days / spec.period_days;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }
}

fn check_settings(settings: &ModelSettings) -> Result<(), HorizonError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if let Some(spec) = seasonal_blocks(settings)
        .iter()
        .find(|s| s.active_order() > 0 && !positive(s.period_days))
    {
        return Err(HorizonError::ModelFit(format!(
            "seasonality period must be positive, got {}",
            spec.period_days
        )));
    }
    if !positive(settings.changepoint_prior_scale) || !positive(settings.seasonality_prior_scale) {
        return Err(HorizonError::ModelFit(
            "prior scales must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&settings.changepoint_range) {
        return Err(HorizonError::ModelFit(format!(
            "changepoint range {} outside [0, 1]",
            settings.changepoint_range
        )));
    }
    Ok(())
}

/// Changepoints sit on evenly spaced rows within the first `changepoint_range` of history.
fn place_changepoints(t_scaled: &[f64], settings: &ModelSettings) -> Vec<f64> {
    let hist_size = (t_scaled.len() as f64 * settings.changepoint_range).floor() as usize;
    let n_changepoints = settings.n_changepoints.min(hist_size.saturating_sub(1));
    if n_changepoints == 0 {
        return Vec::new();
    }

    let last_idx = (hist_size - 1) as f64;
    let mut points: Vec<f64> = (1..=n_changepoints)
        .map(|k| {
            let idx = (last_idx * k as f64 / n_changepoints as f64).round() as usize;
            t_scaled[idx]
        })
        .collect();
    points.dedup();
    points
}

impl AdditiveModel {
    /// Fits on `(timestamp, value)` pairs. Order does not matter; at least two distinct
    /// timestamps are required.
    pub fn fit(
        history: &[(NaiveDateTime, f64)],
        settings: &ModelSettings,
    ) -> Result<Self, HorizonError> {
        check_settings(settings)?;
        let mut history = history.to_vec();
        history.sort_by_key(|(ts, _)| *ts);

        let (Some(&(history_start, _)), Some(&(history_end, _))) =
            (history.first(), history.last())
        else {
            return Err(HorizonError::ModelFit("no history to fit".to_string()));
        };
        if let Some((ts, v)) = history.iter().find(|(_, v)| !v.is_finite()) {
            return Err(HorizonError::ModelFit(format!(
                "non-finite value {} at {}",
                v, ts
            )));
        }

        let days: Vec<f64> = history.iter().map(|(ts, _)| days_since_epoch(*ts)).collect();
        let t_origin_days = days[0];
        let t_span_days = days[days.len() - 1] - t_origin_days;
        if t_span_days <= 0.0 {
            return Err(HorizonError::ModelFit(
                "history must span more than one timestamp".to_string(),
            ));
        }

        let y_scale = history
            .iter()
            .fold(0.0_f64, |m, (_, v)| m.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = history.iter().map(|(_, v)| v / y_scale).collect();

        let t_scaled: Vec<f64> = days
            .iter()
            .map(|d| (d - t_origin_days) / t_span_days)
            .collect();
        let changepoints = place_changepoints(&t_scaled, settings);

        let mut model = Self {
            settings: settings.clone(),
            history_start,
            history_end,
            rows_used: history.len(),
            t_origin_days,
            t_span_days,
            y_scale,
            changepoints,
            coefficients: Vec::new(),
            residual_sd: 0.0,
        };

        // Noise level for the penalties comes from a plain linear trend.
        let trend_rows: Vec<Vec<f64>> = t_scaled.iter().map(|&t| vec![1.0, t]).collect();
        let line = ridge_least_squares(&trend_rows, &y, &[0.0, 0.0])
            .map_err(|e| HorizonError::ModelFit(format!("trend pre-fit: {}", e)))?;
        let noise_var = mean_square_residual(&trend_rows, &y, &line)
            .max(settings.noise_variance_floor);

        let rows: Vec<Vec<f64>> = days.iter().map(|&d| model.design_row(d)).collect();
        let penalties = model.penalties(noise_var);
        model.coefficients = ridge_least_squares(&rows, &y, &penalties)
            .map_err(|e| HorizonError::ModelFit(e.to_string()))?;
        model.residual_sd = mean_square_residual(&rows, &y, &model.coefficients).sqrt();

        #[cfg(debug_assertions)]
        if DF.log_model_fit {
            log::info!(
                "MODEL FIT: {} rows x {} cols, {} changepoints, noise var {:.3e}, residual sd {:.4} (scaled).",
                rows.len(),
                penalties.len(),
                model.changepoints.len(),
                noise_var,
                model.residual_sd
            );
        }

        Ok(model)
    }

    fn trend_width(&self) -> usize {
        2 + self.changepoints.len()
    }

    fn penalties(&self, noise_var: f64) -> Vec<f64> {
        let cp_penalty = noise_var / self.settings.changepoint_prior_scale.powi(2);
        let season_penalty = noise_var / self.settings.seasonality_prior_scale.powi(2);

        let mut penalties = vec![0.0, 0.0];
        penalties.extend(std::iter::repeat_n(cp_penalty, self.changepoints.len()));
        penalties.extend(std::iter::repeat_n(
            season_penalty,
            seasonal_width(&self.settings),
        ));
        penalties
    }

    fn design_row(&self, days: f64) -> Vec<f64> {
        let t = (days - self.t_origin_days) / self.t_span_days;
        let mut row = Vec::with_capacity(self.trend_width() + seasonal_width(&self.settings));
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&s| (t - s).max(0.0)));
        push_fourier(&mut row, days, &self.settings);
        row
    }

    fn interval_z(&self) -> f64 {
        let upper_q = 0.5 + self.settings.interval_width.clamp(0.0, 0.999) / 2.0;
        Normal::new(0.0, 1.0)
            .map(|n| n.inverse_cdf(upper_q))
            .unwrap_or(Z_80)
    }

    /// Point estimate, trend and interval for each date, in input order.
    pub fn predict(&self, dates: &[NaiveDateTime]) -> Vec<ForecastPoint> {
        let half_width = self.interval_z() * self.residual_sd * self.y_scale;
        let split = self.trend_width();

        dates
            .iter()
            .map(|&date| {
                let row = self.design_row(days_since_epoch(date));
                let contribution = |range: std::ops::Range<usize>| -> f64 {
                    row[range.clone()]
                        .iter()
                        .zip(&self.coefficients[range])
                        .map(|(x, b)| x * b)
                        .sum::<f64>()
                };
                let trend = contribution(0..split) * self.y_scale;
                let yhat = trend + contribution(split..row.len()) * self.y_scale;

                ForecastPoint {
                    date,
                    yhat,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                    trend,
                }
            })
            .collect()
    }

    pub fn changepoint_count(&self) -> usize {
        self.changepoints.len()
    }

    /// Residual standard deviation in price units.
    pub fn residual_sd(&self) -> f64 {
        self.residual_sd * self.y_scale
    }
}

fn mean_square_residual(rows: &[Vec<f64>], y: &[f64], coefficients: &[f64]) -> f64 {
    let rss: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, target)| {
            let fitted: f64 = row.iter().zip(coefficients).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();
    rss / y.len().max(1) as f64
}
