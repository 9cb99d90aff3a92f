use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::{FetchError, Headline, IndicatorSpec, MetricSnapshot, Token, TokenizationError};

/// Source of indicator readings
#[async_trait]
pub trait MetricFeed: Send + Sync {
    /// Fetch the last `lookback` observations of each symbol
    async fn fetch(
        &self,
        symbols: &[IndicatorSpec],
        lookback: usize,
    ) -> Result<MetricSnapshot, FetchError>;
}

/// A source that failed and contributed no headlines
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: String,
    pub error: FetchError,
}

/// Headlines gathered from every source, in source-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlineBatch {
    pub headlines: Vec<Headline>,
    pub failures: Vec<SourceFailure>,
}

/// Source of news headlines
#[async_trait]
pub trait HeadlineFeed: Send + Sync {
    /// Fetch every headline of one source, in arrival order
    async fn fetch_source(&self, url: &str) -> Result<Vec<Headline>, FetchError>;

    /// Fetch all sources concurrently.
    ///
    /// The result keeps source-list order, then per-source arrival order, no
    /// matter which fetch completes first. A failed or timed-out source adds
    /// zero headlines and is reported in `failures`.
    async fn fetch_all(&self, source_urls: &[String], timeout: Duration) -> HeadlineBatch {
        let fetches = source_urls.iter().map(|url| async move {
            match tokio::time::timeout(timeout, self.fetch_source(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    source_name: url.clone(),
                    secs: timeout.as_secs(),
                }),
            }
        });

        let mut batch = HeadlineBatch::default();
        for (url, result) in source_urls.iter().zip(join_all(fetches).await) {
            match result {
                Ok(headlines) => {
                    tracing::debug!("Fetched {} headlines from {}", headlines.len(), url);
                    batch.headlines.extend(headlines);
                }
                Err(error) => {
                    tracing::warn!("Error fetching {}: {}", url, error);
                    batch.failures.push(SourceFailure {
                        source: url.clone(),
                        error,
                    });
                }
            }
        }
        batch
    }
}

/// Morphological segmentation of headline text
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizationError>;
}
