use serde::Serialize;

use stockdash_core::{describe, DataAccess, QueryKey, SeriesDescription};

use crate::cli::StatsArgs;
use crate::error::CliError;

use super::{
    ensure_interval, ensure_period, no_data_notice, CommandResult, DAILY_PAGE_INTERVALS,
    DAILY_PAGE_PERIODS,
};

#[derive(Debug, Serialize)]
struct StatsData {
    query: QueryKey,
    stats: Option<SeriesDescription>,
}

pub async fn run(args: &StatsArgs, access: &DataAccess) -> Result<CommandResult, CliError> {
    ensure_period("stats", args.period, &DAILY_PAGE_PERIODS)?;
    ensure_interval("stats", args.interval, &DAILY_PAGE_INTERVALS)?;

    let key = QueryKey::parse(&args.ticker, args.period, args.interval)?;
    let fetched = access.fetch_with_status(&key).await?;

    if fetched.series.is_empty() {
        let data = serde_json::to_value(StatsData {
            query: key.clone(),
            stats: None,
        })?;
        return Ok(CommandResult::ok(data)
            .with_notice(no_data_notice(&key))
            .with_cache_hit(fetched.cache_hit));
    }

    let stats = describe(&fetched.series)?;
    let data = serde_json::to_value(StatsData {
        query: key,
        stats: Some(stats),
    })?;
    Ok(CommandResult::ok(data).with_cache_hit(fetched.cache_hit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{access, bars, ScriptedSource};
    use stockdash_core::{Interval, Period};

    fn args(ticker: &str) -> StatsArgs {
        StatsArgs {
            ticker: String::from(ticker),
            period: Period::OneMonth,
            interval: Interval::OneDay,
        }
    }

    #[tokio::test]
    async fn stats_page_summarizes_each_column() {
        let access = access(ScriptedSource::with_bars(bars(1_700_000_000, 86_400, 5)));

        let result = run(&args("MSFT"), &access).await.expect("page renders");

        let close = &result.data["stats"]["close"];
        assert_eq!(close["count"], 5);
        assert_eq!(close["mean"], 102.0);
        assert_eq!(close["50%"], 102.0);
        assert_eq!(close["min"], 100.0);
        assert_eq!(close["max"], 104.0);
    }

    #[tokio::test]
    async fn delisted_ticker_reports_no_data() {
        let access = access(ScriptedSource::with_bars(Vec::new()));

        let result = run(&args("ZZZZ"), &access).await.expect("empty is not an error");

        assert!(result.data["stats"].is_null());
        assert_eq!(result.notices.len(), 1);
    }

    #[tokio::test]
    async fn intraday_interval_is_not_offered() {
        let access = access(ScriptedSource::with_bars(bars(1_700_000_000, 3_600, 5)));
        let mut args = args("MSFT");
        args.interval = Interval::OneHour;

        let error = run(&args, &access).await.expect_err("page offers 1d, 1wk, 1mo");
        assert!(matches!(error, CliError::Command(_)));
    }

    #[tokio::test]
    async fn long_periods_are_not_offered() {
        let access = access(ScriptedSource::with_bars(Vec::new()));
        let mut args = args("MSFT");
        args.period = Period::FiveYears;

        assert!(matches!(run(&args, &access).await, Err(CliError::Command(_))));
    }

    #[tokio::test]
    async fn invalid_ticker_is_a_usage_error() {
        let access = access(ScriptedSource::with_bars(Vec::new()));

        let error = run(&args("1BAD"), &access).await.expect_err("invalid ticker");
        assert_eq!(error.exit_code(), 2);
    }
}
