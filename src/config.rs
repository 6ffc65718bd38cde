use crate::execution::{EvictionPolicy, FetchParams};
use crate::strategy::RecommendationRule;
use ::config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found in environment")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read configuration: {0}")]
    Source(#[from] ::config::ConfigError),
}

/// Raw environment values before validation
#[derive(Debug, Deserialize)]
struct RawSettings {
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
    cryptocompare_api_key: Option<String>,
    pairs_file: String,
    poll_interval_secs: u64,
    quote_symbol: String,
    candle_limit: u32,
    min_liquidity: f64,
    min_price_change_pct: f64,
    cache_ttl_secs: Option<u64>,
    market_data_rate_per_sec: u32,
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub cryptocompare_api_key: String,
    pub pairs_file: PathBuf,
    pub poll_interval: Duration,
    pub fetch: FetchParams,
    pub rule: RecommendationRule,
    pub eviction: EvictionPolicy,
    pub market_data_rate: NonZeroU32,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let rule = RecommendationRule::default();

        let raw: RawSettings = Config::builder()
            .set_default("pairs_file", "pairs.txt")?
            .set_default("poll_interval_secs", 10)?
            .set_default("quote_symbol", "USDT")?
            .set_default("candle_limit", 10)?
            .set_default("min_liquidity", rule.min_liquidity)?
            .set_default("min_price_change_pct", rule.min_price_change_pct)?
            .set_default("market_data_rate_per_sec", 20)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        let telegram_bot_token = required(raw.telegram_bot_token, "TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = required(raw.telegram_chat_id, "TELEGRAM_CHAT_ID")?;
        let cryptocompare_api_key = required(raw.cryptocompare_api_key, "CRYPTOCOMPARE_API_KEY")?;

        if raw.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                reason: "must be at least 1".to_string(),
            });
        }
        if raw.candle_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "CANDLE_LIMIT",
                reason: "must be at least 1".to_string(),
            });
        }
        let market_data_rate =
            NonZeroU32::new(raw.market_data_rate_per_sec).ok_or(ConfigError::Invalid {
                key: "MARKET_DATA_RATE_PER_SEC",
                reason: "must be at least 1".to_string(),
            })?;

        let eviction = match raw.cache_ttl_secs {
            None | Some(0) => EvictionPolicy::Never,
            Some(secs) => EvictionPolicy::After(Duration::from_secs(secs)),
        };

        Ok(Self {
            telegram_bot_token,
            telegram_chat_id,
            cryptocompare_api_key,
            pairs_file: PathBuf::from(raw.pairs_file),
            poll_interval: Duration::from_secs(raw.poll_interval_secs),
            fetch: FetchParams {
                quote: raw.quote_symbol,
                limit: raw.candle_limit,
            },
            rule: rule.with_thresholds(raw.min_liquidity, raw.min_price_change_pct),
            eviction,
            market_data_rate,
        })
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}
