use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an indicator value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorUnit {
    /// Index points (VIX, NASDAQ composite)
    Points,
    /// Price quoted in US dollars
    Usd,
    /// Rate quoted in percent (bond yields)
    Percent,
}

/// A market indicator registered for fetching and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub symbol: String,
    pub label: String,
    pub unit: IndicatorUnit,
}

impl IndicatorSpec {
    pub fn new(symbol: impl Into<String>, label: impl Into<String>, unit: IndicatorUnit) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
            unit,
        }
    }
}

/// Latest two observations of one indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub current: Option<f64>,
    pub previous: Option<f64>,
}

impl MetricReading {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current: Some(current),
            previous: Some(previous),
        }
    }

    /// Current value, `None` when missing or non-finite
    pub fn current(&self) -> Option<f64> {
        self.current.filter(|v| v.is_finite())
    }

    /// Previous value, `None` when missing or non-finite
    pub fn previous(&self) -> Option<f64> {
        self.previous.filter(|v| v.is_finite())
    }

    /// Percent change from previous to current
    pub fn change_percent(&self) -> Option<f64> {
        let current = self.current()?;
        let previous = self.previous()?;
        if previous == 0.0 {
            return None;
        }
        Some((current - previous) / previous * 100.0)
    }
}

/// Indicator readings for one run, in registration order.
///
/// Built once at the feed boundary; there is no way to mutate a snapshot
/// in place after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    entries: Vec<(IndicatorSpec, MetricReading)>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reading, replacing any earlier reading for the same symbol
    pub fn with_reading(mut self, spec: IndicatorSpec, reading: MetricReading) -> Self {
        match self.entries.iter().position(|(s, _)| s.symbol == spec.symbol) {
            Some(i) => self.entries[i] = (spec, reading),
            None => self.entries.push((spec, reading)),
        }
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&MetricReading> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.symbol == symbol)
            .map(|(_, reading)| reading)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(IndicatorSpec, MetricReading)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Market risk level. Only ever raised while rules are folded.
///
/// `RiskOff` shares the `Caution` tier; it only labels a caution that the
/// crypto crash rule raised on its own. Compare levels with [`severity`].
///
/// [`severity`]: RiskLevel::severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Stable,
    Caution,
    RiskOff,
    Panic,
}

impl RiskLevel {
    pub fn severity(&self) -> u8 {
        match self {
            RiskLevel::Stable => 0,
            RiskLevel::Caution | RiskLevel::RiskOff => 1,
            RiskLevel::Panic => 2,
        }
    }

    /// The more severe of the two. On a tie the current label is kept.
    pub fn raised_to(self, proposed: RiskLevel) -> RiskLevel {
        if proposed.severity() > self.severity() {
            proposed
        } else {
            self
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiskLevel::Stable => "Market is Stable",
            RiskLevel::Caution => "Market Caution",
            RiskLevel::RiskOff => "Risk-Off Signal",
            RiskLevel::Panic => "MARKET PANIC ALERT",
        }
    }

    pub fn color(&self) -> AlertColor {
        match self {
            RiskLevel::Stable => AlertColor::Green,
            RiskLevel::Caution | RiskLevel::RiskOff => AlertColor::Yellow,
            RiskLevel::Panic => AlertColor::Red,
        }
    }
}

/// Display color token of a briefing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertColor {
    Green,
    Yellow,
    Red,
}

impl AlertColor {
    /// Discord embed color value
    pub fn to_embed_color(&self) -> u32 {
        match self {
            AlertColor::Green => 0x00ff00,
            AlertColor::Yellow => 0xffff00,
            AlertColor::Red => 0xff0000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    VolatilityPanic,
    VolatilityElevated,
    CryptoCrash,
    YieldHigh,
}

/// One triggered rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertReason {
    pub code: ReasonCode,
    pub message: String,
}

/// Output of the risk classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub level: RiskLevel,
    pub color: AlertColor,
    pub title: String,
    /// In rule-evaluation order, not severity order
    pub reasons: Vec<AlertReason>,
    pub metrics_text: Vec<String>,
}

/// A news headline tagged with the feed it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
}

impl Headline {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
        }
    }
}

/// One segment produced by a tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    /// Comma-separated tag; only the leading category is inspected
    pub part_of_speech: String,
}

impl Token {
    pub fn new(surface: impl Into<String>, part_of_speech: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    pub fn is_noun(&self) -> bool {
        matches!(
            self.part_of_speech.split(',').next().map(str::trim),
            Some("noun") | Some("名詞")
        )
    }
}

/// A trending word and how often it appeared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub word: String,
    pub count: usize,
}

/// A rendered block of the briefing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

/// The single artifact handed to the notifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingReport {
    pub title: String,
    pub color: AlertColor,
    pub generated_at: DateTime<Utc>,
    pub classification: ClassificationResult,
    pub watch_hits: Vec<String>,
    pub trends: Vec<TrendEntry>,
    pub sections: Vec<ReportSection>,
}

impl BriefingReport {
    /// Sections rendered as one markdown description
    pub fn description(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("**{}**\n{}\n", s.heading, s.body))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of handing a report to the notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub ok: bool,
    pub detail: String,
}

impl DeliveryResult {
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}
