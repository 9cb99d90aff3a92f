//! Network-backed feeds: Yahoo Finance chart data and RSS headlines.

mod news;
mod yahoo;

pub use news::RssHeadlineFeed;
pub use yahoo::{YahooChartClient, DEFAULT_YAHOO_BASE_URL};

use briefing_core::FetchError;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; morning-briefing/0.1)";

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) fn map_request_error(source_name: &str, timeout: Duration, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            source_name: source_name.to_string(),
            secs: timeout.as_secs(),
        }
    } else {
        FetchError::Http(e.to_string())
    }
}
