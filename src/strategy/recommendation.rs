use crate::models::{Action, Metrics, Recommendation};
use serde::{Deserialize, Serialize};

/// Thresholds and exit levels for the buy alert
///
/// A buy is emitted only when BOTH thresholds are strictly exceeded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRule {
    /// Minimum summed quote volume over the window
    pub min_liquidity: f64,
    /// Minimum price change over the window, in percent
    pub min_price_change_pct: f64,
    pub target_multiplier: f64,
    pub stop_loss_multiplier: f64,
}

impl Default for RecommendationRule {
    fn default() -> Self {
        Self {
            min_liquidity: 50_000.0,
            min_price_change_pct: 2.5,
            target_multiplier: 1.05,    // +5% target
            stop_loss_multiplier: 0.95, // -5% stop loss
        }
    }
}

impl RecommendationRule {
    pub fn with_thresholds(mut self, min_liquidity: f64, min_price_change_pct: f64) -> Self {
        self.min_liquidity = min_liquidity;
        self.min_price_change_pct = min_price_change_pct;
        self
    }

    /// Apply the rule to a set of metrics
    ///
    /// Pairs that do not qualify yield `None`; there is no sell or neutral outcome.
    pub fn evaluate(&self, metrics: &Metrics) -> Option<Recommendation> {
        if !(metrics.liquidity > self.min_liquidity
            && metrics.price_change_pct > self.min_price_change_pct)
        {
            return None;
        }

        Some(Recommendation {
            action: Action::Buy,
            liquidity: metrics.liquidity,
            price_change_pct: metrics.price_change_pct,
            last_price: metrics.last_price,
            target_price: round_to_cents(metrics.last_price * self.target_multiplier),
            stop_loss: round_to_cents(metrics.last_price * self.stop_loss_multiplier),
        })
    }
}

/// Evaluate metrics against the default rule
pub fn recommend(metrics: &Metrics) -> Option<Recommendation> {
    RecommendationRule::default().evaluate(metrics)
}

/// Round to 2 decimal places
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(liquidity: f64, price_change_pct: f64, last_price: f64) -> Metrics {
        Metrics {
            liquidity,
            price_change_pct,
            last_price,
        }
    }

    #[test]
    fn test_buy_when_both_thresholds_exceeded() {
        let rec = recommend(&metrics(60_000.0, 3.0, 103.0)).unwrap();

        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.target_price, 108.15);
        assert_eq!(rec.stop_loss, 97.85);
        assert_eq!(rec.liquidity, 60_000.0);
        assert_eq!(rec.last_price, 103.0);
    }

    #[test]
    fn test_no_recommendation_at_thresholds() {
        // Both comparisons are strict
        assert!(recommend(&metrics(50_000.0, 10.0, 1.0)).is_none());
        assert!(recommend(&metrics(1_000_000.0, 2.5, 1.0)).is_none());
    }

    #[test]
    fn test_no_recommendation_below_either_threshold() {
        let cases = [
            (10_000.0, 1.0),
            (10_000.0, 9.0),
            (900_000.0, -4.0),
            (900_000.0, 0.0),
            (0.0, 50.0),
        ];

        for (liquidity, change) in cases {
            assert!(
                recommend(&metrics(liquidity, change, 100.0)).is_none(),
                "expected no recommendation for liquidity={} change={}",
                liquidity,
                change
            );
        }
    }

    #[test]
    fn test_nan_metrics_never_recommend() {
        assert!(recommend(&metrics(f64::NAN, 5.0, 10.0)).is_none());
        assert!(recommend(&metrics(75_000.0, f64::NAN, 10.0)).is_none());
    }

    #[test]
    fn test_levels_rounded_to_cents() {
        let last_price = 0.123456;
        let rec = recommend(&metrics(80_000.0, 4.0, last_price)).unwrap();

        assert_eq!(rec.target_price, round_to_cents(last_price * 1.05));
        assert_eq!(rec.stop_loss, round_to_cents(last_price * 0.95));
        assert_eq!(rec.target_price, 0.13);
        assert_eq!(rec.stop_loss, 0.12);
    }

    #[test]
    fn test_custom_thresholds() {
        let rule = RecommendationRule::default().with_thresholds(1_000.0, 0.5);

        assert!(rule.evaluate(&metrics(2_000.0, 1.0, 10.0)).is_some());
        assert!(rule.evaluate(&metrics(500.0, 1.0, 10.0)).is_none());
    }
}
