use std::time::Duration;

use async_trait::async_trait;
use briefing_core::{FetchError, Headline, HeadlineFeed};
use reqwest::Client;
use rss::Channel;

/// Headlines from RSS 2.0 feeds
#[derive(Clone)]
pub struct RssHeadlineFeed {
    client: Client,
    timeout: Duration,
}

impl RssHeadlineFeed {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: crate::http_client(timeout),
            timeout,
        }
    }
}

#[async_trait]
impl HeadlineFeed for RssHeadlineFeed {
    async fn fetch_source(&self, url: &str) -> Result<Vec<Headline>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| crate::map_request_error(url, self.timeout, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| crate::map_request_error(url, self.timeout, e))?;

        parse_channel(url, &bytes)
    }
}

/// Item titles in feed order; items without a title are skipped
fn parse_channel(url: &str, bytes: &[u8]) -> Result<Vec<Headline>, FetchError> {
    let channel = Channel::read_from(bytes).map_err(|e| FetchError::Parse(format!("{}: {}", url, e)))?;

    Ok(channel
        .items()
        .iter()
        .filter_map(|item| item.title())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(|title| Headline::new(title, url))
        .collect())
}
