use std::sync::Arc;
use std::time::Duration;

use briefing_core::{
    BriefingReport, DeliveryResult, Headline, HeadlineFeed, IndicatorSpec, MetricFeed,
    MetricSnapshot, Tokenizer,
};
use chrono::{DateTime, Utc};
use headline_trends::{KeywordWatcher, TrendAggregator};
use notification_service::NotificationService;
use risk_classifier::RiskClassifier;

pub mod composer;
pub use composer::BriefingComposer;

/// Whole metric fetch budget, as a multiple of the per-call timeout
const METRIC_BUDGET_FACTOR: u32 = 2;

/// The decision logic of one run, free of any I/O
pub struct BriefingEngine {
    classifier: RiskClassifier,
    watcher: KeywordWatcher,
    aggregator: TrendAggregator,
    tokenizer: Arc<dyn Tokenizer>,
}

impl BriefingEngine {
    pub fn new(
        classifier: RiskClassifier,
        watcher: KeywordWatcher,
        aggregator: TrendAggregator,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            classifier,
            watcher,
            aggregator,
            tokenizer,
        }
    }

    /// Build the briefing for one snapshot and headline batch
    pub fn generate(&self, snapshot: &MetricSnapshot, headlines: &[Headline]) -> BriefingReport {
        self.generate_at(snapshot, headlines, Utc::now())
    }

    pub fn generate_at(
        &self,
        snapshot: &MetricSnapshot,
        headlines: &[Headline],
        generated_at: DateTime<Utc>,
    ) -> BriefingReport {
        let classification = self.classifier.classify(snapshot);
        let watch_hits = self.watcher.scan(headlines);
        let trends = self.aggregator.aggregate(headlines, self.tokenizer.as_ref());

        tracing::info!(
            "Classified {:?} with {} reasons, {} watch hits, {} trends",
            classification.level,
            classification.reasons.len(),
            watch_hits.len(),
            trends.len()
        );

        BriefingComposer::compose_at(classification, watch_hits, trends, generated_at)
    }
}

/// What to fetch and how long to wait for each network call
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub indicators: Vec<IndicatorSpec>,
    pub lookback: usize,
    pub headline_sources: Vec<String>,
    pub timeout: Duration,
}

/// Result of one scheduled run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: BriefingReport,
    pub delivery: DeliveryResult,
    /// Recovered failures, in occurrence order
    pub warnings: Vec<String>,
}

/// Fetch, analyze, compose, deliver
pub struct BriefingPipeline {
    engine: BriefingEngine,
    metric_feed: Arc<dyn MetricFeed>,
    headline_feed: Arc<dyn HeadlineFeed>,
    notifier: NotificationService,
    plan: FetchPlan,
}

impl BriefingPipeline {
    pub fn new(
        engine: BriefingEngine,
        metric_feed: Arc<dyn MetricFeed>,
        headline_feed: Arc<dyn HeadlineFeed>,
        notifier: NotificationService,
        plan: FetchPlan,
    ) -> Self {
        Self {
            engine,
            metric_feed,
            headline_feed,
            notifier,
            plan,
        }
    }

    /// Run once. Never fails: fetch and delivery failures become warnings.
    pub async fn run(&self) -> RunOutcome {
        tracing::info!("Fetching market data and news feeds...");
        let (metrics, batch) = tokio::join!(
            self.fetch_metrics(),
            self.headline_feed
                .fetch_all(&self.plan.headline_sources, self.plan.timeout)
        );
        let (snapshot, mut warnings) = metrics;

        warnings.extend(
            batch
                .failures
                .iter()
                .map(|f| format!("headline source {} failed: {}", f.source, f.error)),
        );
        tracing::info!(
            "Collected {} indicators and {} headlines",
            snapshot.len(),
            batch.headlines.len()
        );

        let report = self.engine.generate(&snapshot, &batch.headlines);

        let delivery = self.notifier.publish(&report).await;
        if !delivery.ok {
            warnings.push(format!("delivery failed: {}", delivery.detail));
        }

        RunOutcome {
            report,
            delivery,
            warnings,
        }
    }

    /// Feeds bound each of their calls by `plan.timeout`, so the whole fetch
    /// gets a larger budget and a slow symbol cannot void the snapshot.
    fn metric_budget(&self) -> Duration {
        self.plan.timeout * METRIC_BUDGET_FACTOR
    }

    async fn fetch_metrics(&self) -> (MetricSnapshot, Vec<String>) {
        let fetch = self
            .metric_feed
            .fetch(&self.plan.indicators, self.plan.lookback);
        let budget = self.metric_budget();

        match tokio::time::timeout(budget, fetch).await {
            Ok(Ok(snapshot)) => (snapshot, Vec::new()),
            Ok(Err(e)) => {
                tracing::warn!("Market data unavailable: {}", e);
                (MetricSnapshot::new(), vec![format!("market data failed: {}", e)])
            }
            Err(_) => {
                tracing::warn!("Market data timed out after {:?}", budget);
                (
                    MetricSnapshot::new(),
                    vec![format!(
                        "market data failed: timed out after {}s",
                        budget.as_secs()
                    )],
                )
            }
        }
    }
}
