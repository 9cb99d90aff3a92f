use std::sync::Arc;

use anyhow::Result;
use briefing_orchestrator::{BriefingEngine, BriefingPipeline, FetchPlan};
use headline_trends::{KeywordWatcher, ScriptTokenizer, TrendAggregator};
use market_feed::{RssHeadlineFeed, YahooChartClient};
use notification_service::NotificationService;
use risk_classifier::RiskClassifier;

mod config;

use config::BriefingConfig;

/// Observations per indicator: today and the previous session
const LOOKBACK: usize = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    tracing::info!("Starting Morning Briefing");

    // 2. Configuration errors abort before any fetch
    let config = match BriefingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  RSS sources: {}", config.rss_sources.len());
    tracing::info!("  Watch keywords: {}", config.watch_list.keywords().len());
    tracing::info!("  Trend top-k: {}", config.trend.top_k);
    tracing::info!("  Fetch timeout: {}s", config.fetch_timeout.as_secs());

    // 3. Wire the pipeline
    let engine = BriefingEngine::new(
        RiskClassifier::new(config.thresholds, config.roles.clone()),
        KeywordWatcher::new(config.watch_list.clone()),
        TrendAggregator::new(config.trend.clone()),
        Arc::new(ScriptTokenizer),
    );
    let pipeline = BriefingPipeline::new(
        engine,
        Arc::new(YahooChartClient::new(
            config.yahoo_base_url.clone(),
            config.fetch_timeout,
        )),
        Arc::new(RssHeadlineFeed::new(config.fetch_timeout)),
        NotificationService::new(&config.delivery, config.fetch_timeout),
        FetchPlan {
            indicators: config.indicators(),
            lookback: LOOKBACK,
            headline_sources: config.rss_sources.clone(),
            timeout: config.fetch_timeout,
        },
    );

    // 4. Run once; soft failures only warn
    let outcome = pipeline.run().await;

    for warning in &outcome.warnings {
        tracing::warn!("Run warning: {}", warning);
    }
    tracing::info!(
        "Briefing '{}' composed at {} (delivery ok: {}, {})",
        outcome.report.title,
        outcome.report.generated_at.to_rfc3339(),
        outcome.delivery.ok,
        outcome.delivery.detail
    );

    Ok(())
}
