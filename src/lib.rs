// Core modules
pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod models;
pub mod notify;
pub mod strategy;

// Re-export commonly used types
pub use api::MarketDataSource;
pub use error::{Error, Result};
pub use models::*;
pub use notify::Notifier;
