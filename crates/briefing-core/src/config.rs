use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, IndicatorSpec, IndicatorUnit};

pub const DEFAULT_RSS_SOURCES: &[&str] = &[
    "https://feeds.reuters.com/reuters/JPBusinessNews",
    "https://feeds.reuters.com/reuters/JPTechnologyNews",
    "https://www3.nhk.or.jp/rss/news/cat5.xml",
];

pub const DEFAULT_WATCH_KEYWORDS: &[&str] = &[
    "関税", "レアアース", "半導体", "規制", "増税", "利上げ",
    "TSMC", "NVIDIA", "台湾有事", "サプライチェーン",
];

pub const DEFAULT_IGNORE_WORDS: &[&str] = &[
    "の", "に", "は", "て", "を", "こと", "発表", "市場", "今日",
    "ため", "これ", "それ", "関連", "など", "ニュース", "世界",
    "日本", "米国", "現在", "結果", "見通し", "上昇", "下落",
];

pub const DEFAULT_TOP_K: usize = 5;

/// Thresholds of the risk rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Volatility index above this is panic
    pub volatility_panic: f64,
    /// Volatility index above this is caution
    pub volatility_caution: f64,
    /// Crypto daily change at or below this percent is a crash
    pub crypto_crash_percent: f64,
    /// Bond yield above this earns a headwind note
    pub yield_warning: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            volatility_panic: 30.0,
            volatility_caution: 20.0,
            crypto_crash_percent: -5.0,
            yield_warning: 4.5,
        }
    }
}

/// Which symbols play which role in the risk rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRoles {
    pub volatility: String,
    pub crypto: String,
    pub bond_yield: String,
}

impl Default for IndicatorRoles {
    fn default() -> Self {
        Self {
            volatility: "^VIX".to_string(),
            crypto: "BTC-USD".to_string(),
            bond_yield: "^TNX".to_string(),
        }
    }
}

impl IndicatorRoles {
    /// Indicator registry: the three role symbols, then display-only extras
    pub fn indicators(&self, extra_symbols: &[String]) -> Vec<IndicatorSpec> {
        let mut specs = vec![
            IndicatorSpec::new(&self.volatility, label_for(&self.volatility), IndicatorUnit::Points),
            IndicatorSpec::new(&self.crypto, label_for(&self.crypto), IndicatorUnit::Usd),
            IndicatorSpec::new(&self.bond_yield, label_for(&self.bond_yield), IndicatorUnit::Percent),
        ];
        for symbol in extra_symbols {
            if specs.iter().any(|s| &s.symbol == symbol) {
                continue;
            }
            specs.push(IndicatorSpec::new(symbol, label_for(symbol), IndicatorUnit::Points));
        }
        specs
    }
}

fn label_for(symbol: &str) -> String {
    match symbol {
        "^VIX" => "VIX".to_string(),
        "BTC-USD" => "BTC".to_string(),
        "^TNX" => "US10Y".to_string(),
        "^IXIC" => "NASDAQ".to_string(),
        other => other.trim_start_matches('^').to_string(),
    }
}

/// Fixed list of operationally significant keywords.
///
/// Entries are non-empty and distinct; order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList(Vec<String>);

impl WatchList {
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if keyword.trim().is_empty() {
                return Err(ConfigurationError::MalformedWatchList(
                    "empty keyword".to_string(),
                ));
            }
            if !seen.insert(keyword.clone()) {
                return Err(ConfigurationError::MalformedWatchList(format!(
                    "duplicate keyword '{}'",
                    keyword
                )));
            }
            list.push(keyword);
        }
        Ok(Self(list))
    }

    pub fn keywords(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WatchList {
    fn default() -> Self {
        Self(DEFAULT_WATCH_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }
}

/// Trend extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSettings {
    pub stopwords: HashSet<String>,
    pub top_k: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_IGNORE_WORDS.iter().map(|s| s.to_string()).collect(),
            top_k: DEFAULT_TOP_K,
        }
    }
}
