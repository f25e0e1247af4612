use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::source::{MarketDataSource, QuoteSnapshot, SourceError};
use crate::{Bar, MarketTimestamp, QueryKey, Ticker};

/// Public Yahoo Finance query host.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// `chart.error.code` Yahoo uses for unknown or delisted tickers.
const NOT_FOUND_CODE: &str = "Not Found";

/// Yahoo Finance chart endpoint adapter.
///
/// The chart endpoint serves both historical bars and the latest regular
/// market price, so no crumb/cookie handshake is required.
#[derive(Clone)]
pub struct YahooSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(YAHOO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, ticker: &Ticker, range: &str, interval: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false&events=div%2Csplits",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
            range,
            interval
        )
    }

    /// Run one chart request. `Ok(None)` means Yahoo knows no data for the ticker.
    async fn fetch_chart(&self, url: String) -> Result<Option<YahooChartResult>, SourceError> {
        debug!(%url, "requesting yahoo chart");
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.timed_out() {
                SourceError::unavailable(format!("yahoo request timed out: {}", e.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        // Yahoo answers unknown tickers with a 404 carrying a structured body,
        // so inspect the payload before the status code.
        let parsed = serde_json::from_str::<YahooChartResponse>(&response.body);

        if let Ok(chart) = &parsed {
            if let Some(error) = &chart.chart.error {
                if error.code == NOT_FOUND_CODE {
                    return Ok(None);
                }
                return Err(SourceError::unavailable(format!(
                    "yahoo chart API error: {} ({})",
                    error.description.as_deref().unwrap_or("no description"),
                    error.code
                )));
            }
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let chart = parsed
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

        Ok(chart.chart.result.and_then(|results| results.into_iter().next()))
    }
}

impl MarketDataSource for YahooSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn historical_bars<'a>(
        &'a self,
        key: &'a QueryKey,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Bar>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.chart_url(key.ticker(), key.period().as_str(), key.interval().as_str());
            match self.fetch_chart(url).await? {
                Some(result) => normalize_bars(result),
                None => Ok(Vec::new()),
            }
        })
    }

    fn last_quote<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.chart_url(ticker, "1d", "1d");
            let snapshot = self
                .fetch_chart(url)
                .await?
                .map(|result| QuoteSnapshot {
                    price: result.meta.regular_market_price,
                    currency: result.meta.currency,
                })
                .unwrap_or_default();
            Ok(snapshot)
        })
    }
}

/// Turn a chart result into bars in the exchange-local offset.
///
/// Rows missing any OHLC value are dropped; a missing volume counts as zero.
fn normalize_bars(result: YahooChartResult) -> Result<Vec<Bar>, SourceError> {
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let offset = result.meta.gmtoffset.unwrap_or(0);
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &seconds) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            continue;
        };
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .map_or(0, |v| v.max(0) as u64);

        let ts = MarketTimestamp::from_unix(seconds, offset)
            .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp: {e}")))?;
        let bar = Bar::new(ts, open, high, low, close, volume)
            .map_err(|e| SourceError::internal(format!("invalid yahoo bar at {ts}: {e}")))?;
        bars.push(bar);
    }

    Ok(bars)
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
