use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by store, exchange and forecaster operations.
///
/// Lower layers work in `anyhow::Result` and get tagged with a kind at the
/// point where they cross into a service operation.
#[derive(Debug, Error)]
pub enum HorizonError {
    #[error("insufficient data: {found} stored rows, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("trained model not found at '{}'; train the model first", .0.display())]
    ModelNotFound(PathBuf),

    #[error("upstream fetch failed: {0:#}")]
    UpstreamFetch(anyhow::Error),

    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),

    #[error("model fit failed: {0}")]
    ModelFit(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HorizonError {
    pub fn storage(e: impl Into<anyhow::Error>) -> Self {
        Self::Storage(e.into())
    }

    pub fn upstream(e: impl Into<anyhow::Error>) -> Self {
        Self::UpstreamFetch(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn messages_carry_the_context_chain() {
        let inner: anyhow::Result<()> = Err(anyhow!("disk I/O error"));
        let err = HorizonError::storage(inner.context("insert into price_history").unwrap_err());
        assert_eq!(
            err.to_string(),
            "storage failure: insert into price_history: disk I/O error"
        );
    }

    #[test]
    fn insufficient_data_names_both_counts() {
        let err = HorizonError::InsufficientData {
            found: 3,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 3 stored rows, at least 10 required"
        );
    }
}
