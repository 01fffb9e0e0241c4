//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every history page pulled from Binance (cursor + size).
    pub log_pagination: bool,

    /// Log design matrix shape, penalties and residual spread when fitting.
    pub log_model_fit: bool,

    /// Log batched insert sizes.
    pub log_store_writes: bool,

    /// Log each horizon query and its outcome.
    pub log_horizon: bool,
}

pub const DF: LogFlags = LogFlags {
    log_pagination: true,
    log_model_fit: true,

    log_store_writes: false,
    log_horizon: false,
};
