use thiserror::Error;

/// Failure of a single data source. Recovered by the caller: the source
/// contributes no data and the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Timed out after {secs}s: {source_name}")]
    Timeout { source_name: String, secs: u64 },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data: {0}")]
    NoData(String),
}

/// Tokenizer failure on one headline. That headline contributes no trend tokens.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Tokenization failed: {0}")]
pub struct TokenizationError(pub String);

/// Notifier failure. Reported as a run warning, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("Discord webhook error: {0}")]
    Http(String),

    #[error("Discord webhook returned HTTP {0}")]
    Status(u16),

    #[error("Delivery timed out after {0}s")]
    Timeout(u64),
}

/// Invalid process configuration. Fatal: the run aborts before any fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("No delivery target configured (set DISCORD_WEBHOOK_URL or BRIEFING_DRY_RUN=true)")]
    MissingDeliveryTarget,

    #[error("Invalid delivery target: {0}")]
    InvalidDeliveryTarget(String),

    #[error("Malformed watch-list: {0}")]
    MalformedWatchList(String),

    #[error("Invalid value for {key}: {detail}")]
    InvalidValue { key: String, detail: String },
}
