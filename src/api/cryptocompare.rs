use super::{MarketDataError, MarketDataSource};
use crate::models::{Candle, CandleSeries};
use async_trait::async_trait;
use chrono::DateTime;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;

const CRYPTOCOMPARE_API_BASE: &str = "https://min-api.cryptocompare.com";

type CryptoCompareRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Client for the CryptoCompare minute-candle endpoint
///
/// Cloneable; all clones share the same rate limiter.
#[derive(Clone)]
pub struct CryptoCompareClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: Arc<CryptoCompareRateLimiter>,
}

// ============== Response Types ==============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoResponse {
    response: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<HistoData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoData {
    #[serde(default)]
    data: Vec<RawCandle>,
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volumefrom: f64,
    volumeto: f64,
}

impl TryFrom<RawCandle> for Candle {
    type Error = MarketDataError;

    fn try_from(raw: RawCandle) -> Result<Self, Self::Error> {
        let timestamp = DateTime::from_timestamp(raw.time, 0)
            .ok_or_else(|| MarketDataError::Malformed(format!("bad timestamp {}", raw.time)))?;

        Ok(Candle {
            timestamp,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volumefrom,
            quote_volume: raw.volumeto,
        })
    }
}

// ============== Implementation ==============

impl CryptoCompareClient {
    pub fn new(api_key: String, requests_per_second: NonZeroU32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: CRYPTOCOMPARE_API_BASE.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
        }
    }

    /// Point the client at a different host (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the most recent minute candles for `pair` quoted in `quote`
    /// Endpoint: GET /data/v2/histominute?fsym={pair}&tsym={quote}&limit={limit}
    pub async fn get_minute_candles(
        &self,
        pair: &str,
        quote: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/data/v2/histominute", self.base_url);
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("fsym", pair),
                ("tsym", quote),
                ("limit", limit.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MarketDataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: HistoResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Malformed(e.without_url().to_string()))?;

        if body.response != "Success" {
            return Err(MarketDataError::Api(body.message));
        }

        let raw = body.data.map(|d| d.data).unwrap_or_default();
        let candles = raw
            .into_iter()
            .map(Candle::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} candles for {}/{}", candles.len(), pair, quote);

        Ok(candles)
    }
}

#[async_trait]
impl MarketDataSource for CryptoCompareClient {
    async fn fetch_candles(
        &self,
        pair: &str,
        quote: &str,
        limit: u32,
    ) -> Result<Option<CandleSeries>, MarketDataError> {
        match self.get_minute_candles(pair, quote, limit).await {
            Ok(candles) => Ok(Some(CandleSeries::new(candles))),
            Err(e) => {
                tracing::warn!(pair = %pair, error = %e, "Market data unavailable");
                Ok(None)
            }
        }
    }
}
