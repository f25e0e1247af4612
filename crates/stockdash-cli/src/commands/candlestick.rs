use serde::Serialize;

use stockdash_core::{candlestick_with_volume, ChartPayload, DataAccess, QueryKey, Quote};

use crate::cli::CandlestickArgs;
use crate::error::CliError;

use super::{
    ensure_interval, ensure_period, no_data_notice, CommandResult, DAILY_PAGE_INTERVALS,
    DAILY_PAGE_PERIODS,
};

#[derive(Debug, Serialize)]
struct CandlestickData {
    query: QueryKey,
    bars: usize,
    quote: Option<Quote>,
    chart: Option<ChartPayload>,
}

pub async fn run(args: &CandlestickArgs, access: &DataAccess) -> Result<CommandResult, CliError> {
    ensure_period("candlestick", args.period, &DAILY_PAGE_PERIODS)?;
    ensure_interval("candlestick", args.interval, &DAILY_PAGE_INTERVALS)?;

    let key = QueryKey::parse(&args.ticker, args.period, args.interval)?;
    let fetched = access.fetch_with_status(&key).await?;
    let series = fetched.series;

    if series.is_empty() {
        let data = serde_json::to_value(CandlestickData {
            query: key.clone(),
            bars: 0,
            quote: None,
            chart: None,
        })?;
        return Ok(CommandResult::ok(data)
            .with_notice(no_data_notice(&key))
            .with_cache_hit(fetched.cache_hit));
    }

    let quote = access.get_quote(key.ticker()).await;
    let chart = candlestick_with_volume(&series, &quote.currency);
    let data = serde_json::to_value(CandlestickData {
        query: key,
        bars: series.len(),
        quote: Some(quote),
        chart: Some(chart),
    })?;

    Ok(CommandResult::ok(data).with_cache_hit(fetched.cache_hit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{access, bars, ScriptedSource};
    use stockdash_core::{Interval, Period};

    fn args(period: Period, interval: Interval) -> CandlestickArgs {
        CandlestickArgs {
            ticker: String::from("MSFT"),
            period,
            interval,
        }
    }

    #[tokio::test]
    async fn candlestick_page_renders_price_and_volume_panels() {
        let access = access(ScriptedSource::with_bars(bars(1_706_000_000, 86_400, 20)));

        let result = run(&args(Period::OneMonth, Interval::OneDay), &access)
            .await
            .expect("page renders");

        assert_eq!(result.data["bars"], 20);
        assert_eq!(result.data["quote"]["currency"], "USD");
        assert_eq!(result.data["chart"]["options"]["y_axis_title"], "Price (USD)");
        assert_eq!(result.data["chart"]["traces"][1]["kind"], "volume");
        assert!(result.notices.is_empty());
    }

    #[tokio::test]
    async fn second_render_is_a_cache_hit() {
        let access = access(ScriptedSource::with_bars(bars(1_706_000_000, 86_400, 5)));
        let first = run(&args(Period::OneMonth, Interval::OneDay), &access)
            .await
            .expect("first render");
        let second = run(&args(Period::OneMonth, Interval::OneDay), &access)
            .await
            .expect("second render");

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
    }

    #[tokio::test]
    async fn empty_series_yields_notice_not_error() {
        let access = access(ScriptedSource::with_bars(Vec::new()));

        let result = run(&args(Period::FiveDays, Interval::OneDay), &access)
            .await
            .expect("empty is not an error");

        assert!(result.data["chart"].is_null());
        assert_eq!(result.notices, vec![String::from("no data for MSFT/5d/1d")]);
    }

    #[tokio::test]
    async fn intraday_interval_is_not_offered() {
        let access = access(ScriptedSource::with_bars(Vec::new()));

        let error = run(&args(Period::FiveDays, Interval::OneHour), &access)
            .await
            .expect_err("page only offers daily and coarser");
        assert!(matches!(error, CliError::Command(_)));
    }

    #[tokio::test]
    async fn provider_outage_maps_to_exit_code_three() {
        let access = access(ScriptedSource::failing("connection refused"));

        let error = run(&args(Period::OneMonth, Interval::OneDay), &access)
            .await
            .expect_err("outage propagates");
        assert_eq!(error.exit_code(), 3);
    }
}
