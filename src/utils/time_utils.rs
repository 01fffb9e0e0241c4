use chrono::{DateTime, NaiveDateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    /// Storage format for timestamps. Lexical order == chronological order.
    pub const STORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub const SECS_IN_DAY: f64 = 86_400.0;
}

/// Exchange open times are epoch milliseconds in UTC.
pub fn epoch_ms_to_naive(epoch_ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.naive_utc())
}

pub fn naive_to_epoch_ms(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Fractional days since the Unix epoch. Used as the time axis for seasonality.
pub fn days_since_epoch(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 / TimeUtils::SECS_IN_DAY
}

pub fn format_store_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TimeUtils::STORE_TIME_FORMAT).to_string()
}

pub fn parse_store_timestamp(text: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TimeUtils::STORE_TIME_FORMAT)
}

pub fn now_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
