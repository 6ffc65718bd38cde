// Window metrics over recent candles

pub mod metrics;

pub use metrics::{compute_metrics, MetricsError};
