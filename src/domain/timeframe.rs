use {
    binance_sdk::spot::rest_api::KlinesIntervalEnum,
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter, EnumString},
};

/// Kline widths Binance serves. String forms match the exchange shorthand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Timeframe {
    #[strum(serialize = "1s")]
    OneSecond,
    #[strum(serialize = "1m")]
    OneMinute,
    #[strum(serialize = "3m")]
    ThreeMinutes,
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "1h")]
    OneHour,
    #[strum(serialize = "2h")]
    TwoHours,
    #[strum(serialize = "4h")]
    FourHours,
    #[strum(serialize = "6h")]
    SixHours,
    #[strum(serialize = "8h")]
    EightHours,
    #[strum(serialize = "12h")]
    TwelveHours,
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "3d")]
    ThreeDays,
    #[strum(serialize = "1w")]
    OneWeek,
    #[strum(serialize = "1M")]
    OneMonth,
}

impl Timeframe {
    pub fn klines_interval(&self) -> KlinesIntervalEnum {
        match self {
            Self::OneSecond => KlinesIntervalEnum::Interval1s,
            Self::OneMinute => KlinesIntervalEnum::Interval1m,
            Self::ThreeMinutes => KlinesIntervalEnum::Interval3m,
            Self::FiveMinutes => KlinesIntervalEnum::Interval5m,
            Self::FifteenMinutes => KlinesIntervalEnum::Interval15m,
            Self::ThirtyMinutes => KlinesIntervalEnum::Interval30m,
            Self::OneHour => KlinesIntervalEnum::Interval1h,
            Self::TwoHours => KlinesIntervalEnum::Interval2h,
            Self::FourHours => KlinesIntervalEnum::Interval4h,
            Self::SixHours => KlinesIntervalEnum::Interval6h,
            Self::EightHours => KlinesIntervalEnum::Interval8h,
            Self::TwelveHours => KlinesIntervalEnum::Interval12h,
            Self::OneDay => KlinesIntervalEnum::Interval1d,
            Self::ThreeDays => KlinesIntervalEnum::Interval3d,
            Self::OneWeek => KlinesIntervalEnum::Interval1w,
            Self::OneMonth => KlinesIntervalEnum::Interval1M,
        }
    }
}
