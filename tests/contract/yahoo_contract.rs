//! Contract tests for the Yahoo chart adapter
//!
//! These tests drive the public `DataAccess::yahoo` pipeline through a fake
//! transport and pin down how Yahoo payloads map onto series and quotes.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stockdash_core::{
    describe, partition_by_day, DataAccess, DataAccessConfig, DataError, HttpClient, HttpError,
    HttpRequest, HttpResponse, Interval, Period, SeriesField, SourceErrorKind, Ticker,
};

/// Transport answering every request with the same canned response.
struct CannedTransport {
    response: Result<HttpResponse, HttpError>,
    urls: Mutex<Vec<String>>,
}

impl CannedTransport {
    fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse::new(status, body)),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: HttpError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("url log").clone()
    }
}

impl HttpClient for CannedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.urls.lock().expect("url log").push(request.url.clone());
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

// Two sessions of 5-minute bars: 2024-03-07 (3 rows) and 2024-03-08 (2 rows),
// one row with a missing close that must be dropped.
const FIVE_MINUTE_CHART: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"currency": "USD", "symbol": "MSFT", "regularMarketPrice": 409.14, "gmtoffset": -18000},
            "timestamp": [1709821800, 1709822100, 1709822400, 1709822700, 1709908200, 1709908500],
            "indicators": {"quote": [{
                "open":   [401.0, 401.5, 402.0, 402.2, 405.0, 405.5],
                "high":   [401.8, 402.1, 402.6, 402.9, 405.9, 406.0],
                "low":    [400.7, 401.2, 401.8, 402.0, 404.6, 405.1],
                "close":  [401.5, 402.0, 402.4, null,  405.5, 405.8],
                "volume": [120000, 90000, null, 50000, 150000, 110000]
            }]}
        }],
        "error": null
    }
}"#;

const DELISTED: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

fn access(transport: Arc<CannedTransport>) -> DataAccess {
    let config = DataAccessConfig::default().with_base_url("https://yahoo.test");
    DataAccess::yahoo(transport, config)
}

#[tokio::test]
async fn chart_payload_becomes_chronological_series_in_exchange_time() {
    let transport = CannedTransport::replying(200, FIVE_MINUTE_CHART);
    let access = access(transport.clone());

    let series = access
        .fetch("msft", Period::FiveDays, Interval::FiveMinutes)
        .await
        .expect("fetch");

    assert_eq!(series.len(), 5);
    assert_eq!(series.bars()[2].volume, 0);
    assert_eq!(
        series.bars()[0].ts.to_string(),
        "2024-03-07T09:30:00-05:00"
    );

    let urls = transport.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://yahoo.test/v8/finance/chart/MSFT?"));
    assert!(urls[0].contains("range=5d"));
    assert!(urls[0].contains("interval=5m"));
}

#[tokio::test]
async fn chart_payload_partitions_into_two_sessions() {
    let access = access(CannedTransport::replying(200, FIVE_MINUTE_CHART));

    let series = access
        .fetch("MSFT", Period::FiveDays, Interval::FiveMinutes)
        .await
        .expect("fetch");
    let partition = partition_by_day(&series);

    let sizes = partition.iter().map(|(_, bars)| bars.len()).collect::<Vec<_>>();
    assert_eq!(sizes, vec![3, 2]);
}

#[tokio::test]
async fn chart_payload_describes_volume_with_missing_as_zero() {
    let access = access(CannedTransport::replying(200, FIVE_MINUTE_CHART));

    let series = access
        .fetch("MSFT", Period::FiveDays, Interval::FiveMinutes)
        .await
        .expect("fetch");
    let description = describe(&series).expect("rows");

    let volume = description.get(SeriesField::Volume).expect("volume");
    assert_eq!(volume.min, 0.0);
    assert_eq!(volume.max, 150_000.0);
}

#[tokio::test]
async fn delisted_ticker_is_empty_series_and_is_cached() {
    let transport = CannedTransport::replying(404, DELISTED);
    let access = access(transport.clone());

    let first = access
        .fetch("ZZZZ", Period::OneMonth, Interval::OneDay)
        .await
        .expect("empty is not an error");
    let second = access
        .fetch("ZZZZ", Period::OneMonth, Interval::OneDay)
        .await
        .expect("cached");

    assert!(first.is_empty());
    assert!(second.is_empty());
    assert_eq!(transport.urls().len(), 1);
}

#[tokio::test]
async fn server_error_is_data_unavailable() {
    let access = access(CannedTransport::replying(502, "<html>bad gateway</html>"));

    let error = access
        .fetch("MSFT", Period::OneMonth, Interval::OneDay)
        .await
        .expect_err("outage");

    assert!(matches!(
        error,
        DataError::DataUnavailable(ref cause) if cause.kind() == SourceErrorKind::Unavailable
    ));
}

#[tokio::test]
async fn transport_timeout_is_data_unavailable() {
    let access = access(CannedTransport::failing(HttpError::timeout("deadline elapsed")));

    let error = access
        .fetch("MSFT", Period::OneMonth, Interval::OneDay)
        .await
        .expect_err("timeout");

    assert_eq!(error.code(), "data.unavailable");
}

#[tokio::test]
async fn quote_reads_regular_market_price() {
    let transport = CannedTransport::replying(200, FIVE_MINUTE_CHART);
    let access = access(transport.clone());
    let ticker = Ticker::parse("MSFT").expect("ticker");

    let quote = access.get_quote(&ticker).await;

    assert_eq!(quote.price, Some(409.14));
    assert_eq!(quote.currency, "USD");
    let urls = transport.urls();
    assert!(urls[0].contains("range=1d"));
    assert!(urls[0].contains("interval=1d"));
}

#[tokio::test]
async fn quote_for_delisted_ticker_is_unknown() {
    let access = access(CannedTransport::replying(404, DELISTED));
    let ticker = Ticker::parse("ZZZZ").expect("ticker");

    let quote = access.get_quote(&ticker).await;

    assert_eq!(quote.price, None);
    assert_eq!(quote.currency, "USD");
}
