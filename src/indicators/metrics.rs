/// Liquidity and price-change metrics over a short candle window
///
/// Raw arithmetic over exactly the provided window: no smoothing, no outlier handling.

use crate::models::{CandleSeries, Metrics};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Compute liquidity, price change and last price for a series
///
/// - liquidity: sum of every candle's quote volume
/// - price change: (last close - first close) / first close * 100
/// - last price: close of the newest candle
pub fn compute_metrics(series: &CandleSeries) -> Result<Metrics, MetricsError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(MetricsError::InvalidInput("empty candle series".to_string())),
    };

    if !first.close.is_finite() || first.close <= 0.0 {
        return Err(MetricsError::InvalidInput(format!(
            "first close price must be positive, got {}",
            first.close
        )));
    }

    let liquidity: f64 = series.iter().map(|c| c.quote_volume).sum();
    let price_change_pct = (last.close - first.close) / first.close * 100.0;

    Ok(Metrics {
        liquidity,
        price_change_pct,
        last_price: last.close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candle;
    use chrono::{Duration, TimeZone, Utc};

    fn series(points: &[(f64, f64)]) -> CandleSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        CandleSeries::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(close, quote_volume))| Candle {
                    timestamp: start + Duration::minutes(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: quote_volume / close,
                    quote_volume,
                })
                .collect(),
        )
    }

    #[test]
    fn test_liquidity_is_sum_of_quote_volumes() {
        let s = series(&[(100.0, 1500.0), (101.0, 2500.0), (102.0, 6000.0)]);
        let metrics = compute_metrics(&s).unwrap();
        assert_eq!(metrics.liquidity, 10000.0);
    }

    #[test]
    fn test_liquidity_order_independent() {
        let forward = series(&[(100.0, 1.25), (101.0, 2.5), (102.0, 40000.0)]);
        let reversed = series(&[(100.0, 40000.0), (101.0, 2.5), (102.0, 1.25)]);

        let a = compute_metrics(&forward).unwrap().liquidity;
        let b = compute_metrics(&reversed).unwrap().liquidity;
        assert_eq!(a, b);
        assert!(a >= 0.0);
    }

    #[test]
    fn test_price_change_rising() {
        let s = series(&[(100.0, 1.0), (101.0, 1.0), (103.0, 1.0)]);
        let metrics = compute_metrics(&s).unwrap();

        assert!((metrics.price_change_pct - 3.0).abs() < 1e-9);
        assert_eq!(metrics.last_price, 103.0);
    }

    #[test]
    fn test_price_change_falling_is_negative() {
        let s = series(&[(200.0, 1.0), (190.0, 1.0)]);
        let metrics = compute_metrics(&s).unwrap();
        assert!((metrics.price_change_pct + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_candle_has_zero_change() {
        let s = series(&[(42.5, 900.0)]);
        let metrics = compute_metrics(&s).unwrap();

        assert_eq!(metrics.price_change_pct, 0.0);
        assert_eq!(metrics.liquidity, 900.0);
        assert_eq!(metrics.last_price, 42.5);
    }

    #[test]
    fn test_empty_series_is_invalid() {
        let result = compute_metrics(&CandleSeries::default());
        assert!(matches!(result, Err(MetricsError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_first_close_is_invalid() {
        let s = series(&[(0.0, 10.0), (1.0, 10.0)]);
        let err = compute_metrics(&s).unwrap_err();
        assert!(err.to_string().contains("first close"));
    }
}
