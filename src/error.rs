use crate::api::MarketDataError;
use crate::config::ConfigError;
use crate::discovery::PairListError;
use crate::indicators::MetricsError;
use crate::notify::NotifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    PairList(#[from] PairListError),
}

pub type Result<T> = std::result::Result<T, Error>;
