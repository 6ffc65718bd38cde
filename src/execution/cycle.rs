use super::pair_cache::{CacheEntry, EvictionPolicy, PairCache};
use crate::api::MarketDataSource;
use crate::discovery::PairSource;
use crate::indicators::compute_metrics;
use crate::models::{Metrics, Recommendation};
use crate::notify::{messages, Notifier, ParseMode};
use crate::strategy::RecommendationRule;
use crate::Result;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;

/// What happened to one pair during a cycle
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// Thresholds met and an alert was sent
    Recommended(Recommendation),
    /// Analyzed, nothing to report
    NoSignal(Metrics),
    /// No candles available; skipped silently
    NoData,
    /// Analysis failed; an error notification was sent
    Failed(String),
}

/// Outcome counts for one full cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub pairs: usize,
    pub recommended: usize,
    pub no_signal: usize,
    pub no_data: usize,
    pub failed: usize,
}

impl CycleReport {
    fn from_outcomes(outcomes: &[PairOutcome]) -> Self {
        let mut report = CycleReport {
            pairs: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                PairOutcome::Recommended(_) => report.recommended += 1,
                PairOutcome::NoSignal(_) => report.no_signal += 1,
                PairOutcome::NoData => report.no_data += 1,
                PairOutcome::Failed(_) => report.failed += 1,
            }
        }

        report
    }
}

/// Parameters for the candle request made per pair
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub quote: String,
    pub limit: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            quote: "USDT".to_string(),
            limit: 10,
        }
    }
}

/// Runs one analysis pass over every configured pair
///
/// Pairs are analyzed concurrently on the caller's task and each pair's failure
/// is contained: it is logged and reported, and never aborts the other pairs.
pub struct CycleRunner {
    pairs: Arc<dyn PairSource>,
    source: Arc<dyn MarketDataSource>,
    notifier: Arc<dyn Notifier>,
    cache: PairCache,
    rule: RecommendationRule,
    params: FetchParams,
}

impl CycleRunner {
    pub fn new(
        pairs: Arc<dyn PairSource>,
        source: Arc<dyn MarketDataSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pairs,
            source,
            notifier,
            cache: PairCache::default(),
            rule: RecommendationRule::default(),
            params: FetchParams::default(),
        }
    }

    pub fn with_rule(mut self, rule: RecommendationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_fetch_params(mut self, params: FetchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.cache = PairCache::new(policy);
        self
    }

    pub fn cache(&self) -> &PairCache {
        &self.cache
    }

    /// Analyze every pair once and wait for all of them to settle
    pub async fn run_cycle(&self) -> CycleReport {
        let pairs = match self.pairs.load_pairs().await {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::warn!("{}; continuing with no pairs", e);
                Vec::new()
            }
        };

        tracing::info!("🔄 [CYCLE] Analyzing {} pairs", pairs.len());
        self.notify(&messages::cycle_start(Utc::now(), pairs.len()), ParseMode::Markdown)
            .await;

        let outcomes = join_all(pairs.iter().map(|pair| self.analyze_isolated(pair))).await;
        let report = CycleReport::from_outcomes(&outcomes);

        tracing::info!(
            "✅ [CYCLE] Done: {} recommended, {} no signal, {} no data, {} failed",
            report.recommended,
            report.no_signal,
            report.no_data,
            report.failed
        );

        report
    }

    /// Per-pair boundary: converts any failure into a notification
    async fn analyze_isolated(&self, pair: &str) -> PairOutcome {
        match self.analyze_pair(pair).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(pair = %pair, error = %e, "Pair analysis failed");
                self.notify(&messages::pair_error(pair, &e), ParseMode::Plain)
                    .await;
                PairOutcome::Failed(e.to_string())
            }
        }
    }

    async fn analyze_pair(&self, pair: &str) -> Result<PairOutcome> {
        let source = &self.source;
        let params = &self.params;

        let entry = self
            .cache
            .get_or_fetch(pair, move || async move {
                source
                    .fetch_candles(pair, &params.quote, params.limit)
                    .await
                    .map(CacheEntry::from)
            })
            .await?;

        let Some(series) = entry.series() else {
            tracing::debug!(pair = %pair, "No market data, skipping");
            return Ok(PairOutcome::NoData);
        };

        let metrics = compute_metrics(series)?;
        tracing::debug!(
            pair = %pair,
            liquidity = metrics.liquidity,
            price_change_pct = metrics.price_change_pct,
            "Computed metrics"
        );

        match self.rule.evaluate(&metrics) {
            Some(rec) => {
                tracing::info!(
                    "  💡 {} BUY @ {:.4} (target {:.2}, stop {:.2})",
                    pair,
                    rec.last_price,
                    rec.target_price,
                    rec.stop_loss
                );
                let text = messages::recommendation(pair, &self.params.quote, &rec);
                self.notify(&text, ParseMode::Markdown).await;
                Ok(PairOutcome::Recommended(rec))
            }
            None => Ok(PairOutcome::NoSignal(metrics)),
        }
    }

    /// Send without retrying; a failed send is only logged
    async fn notify(&self, text: &str, mode: ParseMode) {
        if let Err(e) = self.notifier.send(text, mode).await {
            tracing::warn!("Failed to send notification: {}", e);
        }
    }
}
