use {
    chrono::NaiveDateTime,
    serde::{Deserialize, Serialize},
};

/// One stored observation. The timestamp is the primary key in the price store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// One step of a forecast trajectory.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDateTime,
    /// Point estimate
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
}

impl ForecastPoint {
    /// A point with no uncertainty band; handy for synthetic trajectories.
    pub fn exact(date: NaiveDateTime, yhat: f64) -> Self {
        Self {
            date,
            yhat,
            yhat_lower: yhat,
            yhat_upper: yhat,
            trend: yhat,
        }
    }
}
