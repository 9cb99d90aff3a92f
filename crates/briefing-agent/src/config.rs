use std::env;
use std::str::FromStr;
use std::time::Duration;

use briefing_core::{
    ConfigurationError, IndicatorRoles, IndicatorSpec, RiskThresholds, TrendSettings, WatchList,
    DEFAULT_IGNORE_WORDS, DEFAULT_RSS_SOURCES, DEFAULT_TOP_K, DEFAULT_WATCH_KEYWORDS,
};
use market_feed::DEFAULT_YAHOO_BASE_URL;
use notification_service::DeliveryTarget;

#[derive(Debug, Clone)]
pub struct BriefingConfig {
    // Risk rules
    pub thresholds: RiskThresholds,
    pub roles: IndicatorRoles,
    pub extra_symbols: Vec<String>,

    // Headline analysis
    pub rss_sources: Vec<String>,
    pub watch_list: WatchList,
    pub trend: TrendSettings,

    // Network
    pub yahoo_base_url: String,
    pub fetch_timeout: Duration,

    // Delivery
    pub delivery: DeliveryTarget,
}

impl BriefingConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset and empty values take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Delivery target first: nothing else matters without one
        let dry_run: bool = parse_or(&get, "BRIEFING_DRY_RUN", false)?;
        let delivery = if dry_run {
            DeliveryTarget::DryRun
        } else {
            let url = get("DISCORD_WEBHOOK_URL").ok_or(ConfigurationError::MissingDeliveryTarget)?;
            if !url.starts_with("http") {
                return Err(ConfigurationError::InvalidDeliveryTarget(
                    "DISCORD_WEBHOOK_URL must start with http".to_string(),
                ));
            }
            DeliveryTarget::DiscordWebhook(url)
        };

        let thresholds = RiskThresholds {
            volatility_panic: parse_or(&get, "VIX_PANIC_THRESHOLD", 30.0)?,
            volatility_caution: parse_or(&get, "VIX_CAUTION_THRESHOLD", 20.0)?,
            crypto_crash_percent: parse_or(&get, "CRYPTO_CRASH_PERCENT", -5.0)?,
            yield_warning: parse_or(&get, "YIELD_WARNING_LEVEL", 4.5)?,
        };
        if thresholds.volatility_caution > thresholds.volatility_panic {
            return Err(ConfigurationError::InvalidValue {
                key: "VIX_CAUTION_THRESHOLD".to_string(),
                detail: "must not exceed VIX_PANIC_THRESHOLD".to_string(),
            });
        }

        let defaults = IndicatorRoles::default();
        let roles = IndicatorRoles {
            volatility: get("BRIEFING_VOLATILITY_SYMBOL").unwrap_or(defaults.volatility),
            crypto: get("BRIEFING_CRYPTO_SYMBOL").unwrap_or(defaults.crypto),
            bond_yield: get("BRIEFING_YIELD_SYMBOL").unwrap_or(defaults.bond_yield),
        };
        // Explicitly empty means no display-only extras
        let extra_symbols = match lookup("BRIEFING_EXTRA_SYMBOLS") {
            Some(raw) => split_list(&raw),
            None => vec!["^IXIC".to_string()],
        };

        let rss_sources = list_or(&get, "BRIEFING_RSS_SOURCES", DEFAULT_RSS_SOURCES);

        // Watch-list entries are not filtered: an empty entry is malformed
        let watch_list = match get("BRIEFING_WATCH_KEYWORDS") {
            Some(raw) => WatchList::new(raw.split(',').map(|s| s.trim().to_string()))?,
            None => WatchList::new(DEFAULT_WATCH_KEYWORDS.iter().copied())?,
        };

        let top_k: usize = parse_or(&get, "BRIEFING_TREND_TOP_K", DEFAULT_TOP_K)?;
        if top_k == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "BRIEFING_TREND_TOP_K".to_string(),
                detail: "must be at least 1".to_string(),
            });
        }
        let trend = TrendSettings {
            stopwords: list_or(&get, "BRIEFING_IGNORE_WORDS", DEFAULT_IGNORE_WORDS)
                .into_iter()
                .collect(),
            top_k,
        };

        let timeout_secs: u64 = parse_or(&get, "BRIEFING_FETCH_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "BRIEFING_FETCH_TIMEOUT_SECS".to_string(),
                detail: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            thresholds,
            roles,
            extra_symbols,
            rss_sources,
            watch_list,
            trend,
            yahoo_base_url: get("YAHOO_CHART_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(timeout_secs),
            delivery,
        })
    }

    pub fn indicators(&self) -> Vec<IndicatorSpec> {
        self.roles.indicators(&self.extra_symbols)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigurationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigurationError::InvalidValue {
            key: key.to_string(),
            detail: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn list_or<G>(get: &G, key: &str, default: &[&str]) -> Vec<String>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => split_list(&raw),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
