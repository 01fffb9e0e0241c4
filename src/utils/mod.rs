pub mod time_utils;

pub use time_utils::{
    TimeUtils, days_since_epoch, epoch_ms_to_naive, format_store_timestamp, naive_to_epoch_ms,
    now_timestamp_ms, parse_store_timestamp,
};
