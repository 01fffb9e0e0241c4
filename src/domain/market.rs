use {
    crate::{config::BINANCE_QUOTE_ASSETS, domain::Timeframe, error::HorizonError},
    serde::{Deserialize, Serialize},
    std::str::FromStr,
    strum::IntoEnumIterator,
};

/// What to pull from the exchange: one symbol at one kline width.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct MarketSpec {
    /// Binance form, e.g. `BTCUSDT`
    pub name: String,
    pub timeframe: Timeframe,
}

impl MarketSpec {
    /// Accepts `BTC/USDT`, `btc-usdt` or `BTCUSDT` together with a Binance interval shorthand.
    pub fn parse(symbol: &str, timeframe: &str) -> Result<Self, HorizonError> {
        let name: String = symbol
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if name.is_empty() {
            return Err(HorizonError::InvalidRequest(format!(
                "symbol '{}' has no tradable characters",
                symbol
            )));
        }

        let timeframe = Timeframe::from_str(timeframe).map_err(|_| {
            let valid: Vec<String> = Timeframe::iter().map(|tf| tf.to_string()).collect();
            HorizonError::InvalidRequest(format!(
                "unsupported timeframe '{}' (expected one of {})",
                timeframe,
                valid.join(", ")
            ))
        })?;

        Ok(Self { name, timeframe })
    }

    pub(crate) fn get_quote(text: &str) -> Option<&str> {
        BINANCE_QUOTE_ASSETS
            .iter()
            .find(|&&ext| text.ends_with(ext) && text.len() > ext.len())
            .copied()
    }

    pub(crate) fn get_base(text: &str) -> Option<&str> {
        let quote = Self::get_quote(text)?;
        text.strip_suffix(quote)
    }

    // The name we pass into the Binance API
    pub(crate) fn bn_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for MarketSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (Self::get_base(&self.name), Self::get_quote(&self.name)) {
            (Some(base), Some(quote)) => write!(f, "{}/{} @ {}", base, quote, self.timeframe),
            _ => write!(f, "{} @ {}", self.name, self.timeframe),
        }
    }
}
