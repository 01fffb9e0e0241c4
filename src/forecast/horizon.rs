use {
    argminmax::ArgMinMax,
    chrono::NaiveDateTime,
    serde::Serialize,
};

use crate::domain::ForecastPoint;

#[cfg(debug_assertions)]
use crate::config::DF;

/// Answer to "when does the forecast first reach the target?"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HorizonOutcome {
    Reached {
        /// Calendar days after the last observation
        days: i64,
        date: NaiveDateTime,
        yhat: f64,
    },
    NotReached,
}

impl HorizonOutcome {
    /// Legacy integer encoding of `NotReached`.
    pub const NOT_REACHED_SENTINEL: i64 = -1;

    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Reached { days, .. } => Some(*days),
            Self::NotReached => None,
        }
    }

    pub fn as_sentinel(&self) -> i64 {
        self.days().unwrap_or(Self::NOT_REACHED_SENTINEL)
    }
}

/// Earliest forecast date strictly after `last_observed` whose point estimate is at
/// least `price_target`. Exact equality counts as reached; there is no tolerance band.
pub fn days_until_target(
    forecast: &[ForecastPoint],
    last_observed: NaiveDateTime,
    price_target: f64,
) -> HorizonOutcome {
    let outcome = forecast
        .iter()
        .filter(|p| p.date > last_observed && p.yhat >= price_target)
        .min_by_key(|p| p.date)
        .map_or(HorizonOutcome::NotReached, |p| HorizonOutcome::Reached {
            days: (p.date - last_observed).num_days(),
            date: p.date,
            yhat: p.yhat,
        });

    #[cfg(debug_assertions)]
    if DF.log_horizon {
        log::info!(
            "HORIZON: target {:.2} over {} points after {} -> {:?}",
            price_target,
            forecast.len(),
            last_observed,
            outcome
        );
    }

    outcome
}

/// Highest point estimate strictly after `last_observed`.
pub fn peak_forecast(forecast: &[ForecastPoint], last_observed: NaiveDateTime) -> Option<ForecastPoint> {
    let future: Vec<&ForecastPoint> = forecast.iter().filter(|p| p.date > last_observed).collect();
    if future.is_empty() {
        return None;
    }
    let yhat: Vec<f64> = future.iter().map(|p| p.yhat).collect();
    let idx = yhat.argmax();
    future.get(idx).map(|p| **p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn origin() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Day k (1-based) carries values[k - 1].
    fn trajectory(values: &[f64]) -> Vec<ForecastPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ForecastPoint::exact(origin() + Duration::days(i as i64 + 1), v))
            .collect()
    }

    #[test]
    fn ascending_then_plateau_hits_first_index_at_or_above_target() {
        let forecast = trajectory(&[100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 110.0, 110.0]);

        let outcome = days_until_target(&forecast, origin(), 105.0);
        assert_eq!(outcome.days(), Some(4));
        assert_eq!(
            outcome,
            HorizonOutcome::Reached {
                days: 4,
                date: origin() + Duration::days(4),
                yhat: 106.0
            }
        );

        // Exactly on the plateau value still counts.
        assert_eq!(days_until_target(&forecast, origin(), 110.0).days(), Some(6));
    }

    #[test]
    fn target_above_every_estimate_is_not_reached() {
        let forecast = trajectory(&[100.0, 102.0, 104.0, 110.0, 110.0]);
        let outcome = days_until_target(&forecast, origin(), 110.01);
        assert_eq!(outcome, HorizonOutcome::NotReached);
        assert_eq!(outcome.as_sentinel(), HorizonOutcome::NOT_REACHED_SENTINEL);
    }

    #[test]
    fn earlier_of_two_qualifying_days_wins() {
        let forecast = trajectory(&[90.0, 120.0, 121.0, 95.0]);
        assert_eq!(days_until_target(&forecast, origin(), 120.0).days(), Some(2));
    }

    #[test]
    fn history_rows_are_ignored() {
        // Points on or before the last observation never count, however high.
        let mut forecast = vec![
            ForecastPoint::exact(origin() - Duration::days(1), 500.0),
            ForecastPoint::exact(origin(), 500.0),
        ];
        forecast.extend(trajectory(&[100.0, 200.0]));
        assert_eq!(days_until_target(&forecast, origin(), 150.0).days(), Some(2));
    }

    #[test]
    fn empty_horizon_is_not_reached() {
        assert_eq!(
            days_until_target(&[], origin(), 1.0),
            HorizonOutcome::NotReached
        );
        assert!(peak_forecast(&[], origin()).is_none());
    }

    #[test]
    fn peak_is_the_highest_future_estimate() {
        let forecast = trajectory(&[100.0, 130.0, 120.0]);
        let peak = peak_forecast(&forecast, origin()).unwrap();
        assert_eq!(peak.yhat, 130.0);
        assert_eq!(peak.date, origin() + Duration::days(2));
    }
}
