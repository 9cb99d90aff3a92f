use std::time::Duration;

use async_trait::async_trait;
use briefing_core::{FetchError, IndicatorSpec, MetricFeed, MetricReading, MetricSnapshot};
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily closes from the Yahoo Finance chart endpoint
#[derive(Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: crate::http_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn fetch_symbol(&self, symbol: &str, lookback: usize) -> Result<MetricReading, FetchError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            symbol.replace('^', "%5E")
        );

        let response = self
            .client
            .get(&url)
            .query(&[("range", "5d"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| crate::map_request_error(symbol, self.timeout, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| crate::map_request_error(symbol, self.timeout, e))?;

        parse_chart(symbol, &body, lookback)
    }
}

#[async_trait]
impl MetricFeed for YahooChartClient {
    /// Symbols are fetched concurrently, each under its own timeout; a failed
    /// or stalled symbol is left out of the snapshot. Fails only when no
    /// symbol could be read.
    async fn fetch(&self, symbols: &[IndicatorSpec], lookback: usize) -> Result<MetricSnapshot, FetchError> {
        let results = join_all(symbols.iter().map(|spec| async move {
            tokio::time::timeout(self.timeout, self.fetch_symbol(&spec.symbol, lookback))
                .await
                .unwrap_or_else(|_| {
                    Err(FetchError::Timeout {
                        source_name: spec.symbol.clone(),
                        secs: self.timeout.as_secs(),
                    })
                })
        }))
        .await;

        let mut snapshot = MetricSnapshot::new();
        for (spec, result) in symbols.iter().zip(results) {
            match result {
                Ok(reading) => snapshot = snapshot.with_reading(spec.clone(), reading),
                Err(e) => tracing::warn!("Failed to fetch {}: {}", spec.symbol, e),
            }
        }

        if snapshot.is_empty() && !symbols.is_empty() {
            return Err(FetchError::NoData(format!(
                "all {} market symbols failed",
                symbols.len()
            )));
        }
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Reduce a chart payload to `{current, previous}`.
///
/// `current` is the latest non-null close; `previous` is the close
/// `lookback - 1` observations earlier, absent if the series is too short.
fn parse_chart(symbol: &str, body: &str, lookback: usize) -> Result<MetricReading, FetchError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(format!("{}: {}", symbol, e)))?;

    if let Some(err) = response.chart.error {
        return Err(FetchError::NoData(format!(
            "{}: {} ({})",
            symbol, err.description, err.code
        )));
    }

    let closes: Vec<f64> = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|r| r.indicators.quote.into_iter().next())
        .map(|q| q.close.into_iter().flatten().filter(|v| v.is_finite()).collect())
        .unwrap_or_default();

    let current = *closes
        .last()
        .ok_or_else(|| FetchError::NoData(format!("{}: no closes", symbol)))?;
    let previous = match lookback {
        0 | 1 => None,
        n => closes.len().checked_sub(n).map(|i| closes[i]),
    };

    Ok(MetricReading {
        current: Some(current),
        previous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIX_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^VIX", "currency": "USD"},
                "timestamp": [1, 2, 3, 4],
                "indicators": {"quote": [{"close": [18.5, 19.25, null, 22.75]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_takes_last_two_closes() {
        let reading = parse_chart("^VIX", VIX_CHART, 2).unwrap();
        assert_eq!(reading.current, Some(22.75));
        assert_eq!(reading.previous, Some(19.25));
    }

    #[test]
    fn test_parse_chart_short_series_has_no_previous() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[null, 4.41]}]}}],"error":null}}"#;
        let reading = parse_chart("^TNX", body, 2).unwrap();
        assert_eq!(reading.current, Some(4.41));
        assert_eq!(reading.previous, None);
    }

    #[test]
    fn test_parse_chart_reports_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse_chart("^BAD", body, 2), Err(FetchError::NoData(_))));
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        assert!(matches!(parse_chart("^VIX", "<html>", 2), Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_no_data() {
        let client = YahooChartClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        let specs = briefing_core::IndicatorRoles::default().indicators(&[]);

        let err = tokio_test::assert_err!(client.fetch(&specs, 2).await);

        assert!(matches!(err, FetchError::NoData(_)));
    }

    /// Serve a fixed chart for every symbol except `stalled`, which never answers
    async fn chart_server(stalled: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    if request.contains(stalled) {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }
                    let body = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[30.0,35.0]}]}}],"error":null}}"#;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_stalled_symbol_is_left_out() {
        let base_url = chart_server("%5EIXIC").await;
        let client = YahooChartClient::new(base_url, Duration::from_millis(500));
        let specs = briefing_core::IndicatorRoles::default().indicators(&["^IXIC".to_string()]);

        let snapshot = client.fetch(&specs, 2).await.unwrap();

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.get("^IXIC").is_none());
        assert_eq!(snapshot.get("^VIX").and_then(|r| r.current()), Some(35.0));
        assert_eq!(snapshot.get("^TNX").and_then(|r| r.previous()), Some(30.0));
    }
}
