// Domain types and value objects
mod market;
mod price_point;
mod timeframe;

pub use market::MarketSpec;
pub use price_point::{ForecastPoint, PricePoint};
pub use timeframe::Timeframe;
