use serde::Serialize;
use time::{Date, Month};

use stockdash_core::{
    intraday_candlestick, partition_by_day, ChartPayload, DataAccess, Interval, Period, QueryKey,
};

use crate::cli::IntradayArgs;
use crate::error::CliError;

use super::{ensure_period, no_data_notice, CommandResult};

const PERIODS: [Period; 4] = [
    Period::FiveDays,
    Period::SevenDays,
    Period::FifteenDays,
    Period::ThirtyDays,
];

const INTERVAL: Interval = Interval::FiveMinutes;

#[derive(Debug, Serialize)]
struct IntradayData {
    query: QueryKey,
    dates: Vec<String>,
    selected_date: Option<String>,
    bars: usize,
    chart: Option<ChartPayload>,
}

pub async fn run(args: &IntradayArgs, access: &DataAccess) -> Result<CommandResult, CliError> {
    ensure_period("intraday", args.period, &PERIODS)?;
    let requested = args.date.as_deref().map(parse_date).transpose()?;

    let key = QueryKey::parse(&args.ticker, args.period, INTERVAL)?;
    let fetched = access.fetch_with_status(&key).await?;
    let partition = partition_by_day(&fetched.series);

    let mut notices = Vec::new();
    let selected = requested.or_else(|| partition.first_date());
    let chart = match selected {
        None => {
            notices.push(no_data_notice(&key));
            None
        }
        Some(date) => {
            let chart = intraday_candlestick(&partition, date);
            if chart.is_none() {
                notices.push(format!("no intraday data for selected date {date}"));
            }
            chart
        }
    };

    let data = serde_json::to_value(IntradayData {
        query: key,
        dates: partition.dates().map(|date| date.to_string()).collect(),
        selected_date: selected.map(|date| date.to_string()),
        bars: selected
            .and_then(|date| partition.day(date))
            .map_or(0, <[_]>::len),
        chart,
    })?;

    let mut result = CommandResult::ok(data).with_cache_hit(fetched.cache_hit);
    for notice in notices {
        result = result.with_notice(notice);
    }
    Ok(result)
}

/// `YYYY-MM-DD` calendar date.
fn parse_date(input: &str) -> Result<Date, CliError> {
    let invalid = || CliError::Command(format!("date must be YYYY-MM-DD: '{input}'"));

    let mut parts = input.trim().splitn(3, '-');
    let year = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(invalid)?;
    let month = parts
        .next()
        .and_then(|p| p.parse::<u8>().ok())
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(invalid)?;
    let day = parts.next().and_then(|p| p.parse::<u8>().ok()).ok_or_else(invalid)?;

    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}
