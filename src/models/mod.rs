use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-minute OHLCV candle for a pair, quoted in the quote currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Volume in the base asset
    pub volume: f64,
    /// Volume in the quote currency (e.g. USDT)
    pub quote_volume: f64,
}

/// Candles for a single pair, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, sorting candles by timestamp ascending
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }
}

/// Liquidity and momentum derived from one candle series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    /// Summed quote volume over the window (not order-book depth)
    pub liquidity: f64,
    pub price_change_pct: f64,
    pub last_price: f64,
}

/// Recommended action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Buy,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
        }
    }
}

/// Actionable alert produced when the rule's thresholds are exceeded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub action: Action,
    pub liquidity: f64,
    pub price_change_pct: f64,
    pub last_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
}
