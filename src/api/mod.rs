pub mod cryptocompare;

pub use cryptocompare::CryptoCompareClient;

use crate::models::CandleSeries;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("unusable payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key
        MarketDataError::Network(e.without_url())
    }
}

/// Source of recent candles for a pair
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the last `limit` one-minute candles for `pair` against `quote`
    ///
    /// `Ok(None)` means the data is unavailable and the pair should be skipped.
    /// `Err` means the source itself failed; callers report it for the pair.
    async fn fetch_candles(
        &self,
        pair: &str,
        quote: &str,
        limit: u32,
    ) -> Result<Option<CandleSeries>, MarketDataError>;
}
