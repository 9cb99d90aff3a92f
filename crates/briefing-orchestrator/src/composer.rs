use briefing_core::{BriefingReport, ClassificationResult, ReportSection, TrendEntry};
use chrono::{DateTime, Utc};

pub const NO_RISK_LINE: &str = "No notable risk factors.";
pub const NO_WATCH_KEYWORDS_LINE: &str = "No watch keywords (tariffs etc.) detected.";
pub const NO_TRENDS_LINE: &str = "No trending words.";

/// Assembles classifier and headline outputs into the final report
pub struct BriefingComposer;

impl BriefingComposer {
    pub fn compose(
        classification: ClassificationResult,
        watch_hits: Vec<String>,
        trends: Vec<TrendEntry>,
    ) -> BriefingReport {
        Self::compose_at(classification, watch_hits, trends, Utc::now())
    }

    /// Sections are rendered alert, metrics, watch keywords, trends.
    pub fn compose_at(
        classification: ClassificationResult,
        watch_hits: Vec<String>,
        trends: Vec<TrendEntry>,
        generated_at: DateTime<Utc>,
    ) -> BriefingReport {
        let alert_body = if classification.reasons.is_empty() {
            NO_RISK_LINE.to_string()
        } else {
            classification
                .reasons
                .iter()
                .map(|r| format!("- {}", r.message))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let watch_body = if watch_hits.is_empty() {
            NO_WATCH_KEYWORDS_LINE.to_string()
        } else {
            format!("`{}`", watch_hits.join("`, `"))
        };

        let trend_body = if trends.is_empty() {
            NO_TRENDS_LINE.to_string()
        } else {
            trends
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{}. {} ({})", i + 1, t.word, t.count))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let sections = vec![
            section("Warning Signals", alert_body),
            section("Canary Metrics", classification.metrics_text.join("\n")),
            section("Watch Keywords", watch_body),
            section("Trending Today", trend_body),
        ];

        BriefingReport {
            title: classification.title.clone(),
            color: classification.color,
            generated_at,
            classification,
            watch_hits,
            trends,
            sections,
        }
    }
}

fn section(heading: &str, body: String) -> ReportSection {
    ReportSection {
        heading: heading.to_string(),
        body,
    }
}
