use anyhow::Context;
use pairbot::api::CryptoCompareClient;
use pairbot::config::Settings;
use pairbot::discovery::FilePairSource;
use pairbot::execution::{CycleRunner, Scheduler, TokioDelay};
use pairbot::notify::TelegramNotifier;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    tracing::info!("🚀 pairbot starting");

    let settings = Settings::load().context("Cannot start without configuration")?;

    let notifier = TelegramNotifier::new(
        settings.telegram_bot_token.clone(),
        settings.telegram_chat_id.clone(),
    );
    let market_data = CryptoCompareClient::new(
        settings.cryptocompare_api_key.clone(),
        settings.market_data_rate,
    );
    let pairs = FilePairSource::new(&settings.pairs_file);

    tracing::info!("\n📊 Configuration:");
    tracing::info!("  Pairs file: {}", pairs.path().display());
    tracing::info!("  Chat: {}", notifier.chat_id());
    tracing::info!("  Quote: {} ({} candles)", settings.fetch.quote, settings.fetch.limit);
    tracing::info!(
        "  Rule: liquidity > {} and change > {}%",
        settings.rule.min_liquidity,
        settings.rule.min_price_change_pct
    );
    tracing::info!("  Cache eviction: {:?}", settings.eviction);
    tracing::info!("  Interval: {:?}", settings.poll_interval);

    let runner = CycleRunner::new(Arc::new(pairs), Arc::new(market_data), Arc::new(notifier))
        .with_rule(settings.rule)
        .with_fetch_params(settings.fetch.clone())
        .with_eviction_policy(settings.eviction);
    let scheduler = Scheduler::new(settings.poll_interval, TokioDelay);

    tracing::info!("\nPress Ctrl+C to stop...\n");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("\n⚠️  Received Ctrl+C, shutting down...");
        }
        cycles = scheduler.run(|| runner.run_cycle(), None) => {
            tracing::error!("Analysis loop exited after {} cycles", cycles);
        }
    }

    tracing::info!("👋 pairbot stopped");
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pairbot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
