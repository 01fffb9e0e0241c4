//! Model fitting and the "days until target" query.

mod additive;
mod forecaster;
mod horizon;
mod solver;

pub use additive::AdditiveModel;
pub use forecaster::{Forecaster, ProfitForecast, TrainedModel, TrainingSummary};
pub use horizon::{HorizonOutcome, days_until_target, peak_forecast};
pub use solver::{SolveError, ridge_least_squares};
