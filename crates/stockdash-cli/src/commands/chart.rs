use serde::Serialize;

use stockdash_core::{moving_average_chart, ChartPayload, DataAccess, DataError, QueryKey};

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::{no_data_notice, CommandResult};

#[derive(Debug, Serialize)]
struct ChartData {
    query: QueryKey,
    windows: Vec<usize>,
    bars: usize,
    chart: Option<ChartPayload>,
}

pub async fn run(args: &ChartArgs, access: &DataAccess) -> Result<CommandResult, CliError> {
    if let Some(&window) = args.windows.iter().find(|window| **window < 2) {
        return Err(DataError::InvalidWindow { window }.into());
    }

    let key = QueryKey::parse(&args.ticker, args.period, args.interval)?;
    let fetched = access.fetch_with_status(&key).await?;
    let series = fetched.series;

    let (chart, notice) = if series.is_empty() {
        (None, Some(no_data_notice(&key)))
    } else {
        (Some(moving_average_chart(&series, &args.windows)?), None)
    };

    let data = serde_json::to_value(ChartData {
        query: key,
        windows: args.windows.clone(),
        bars: series.len(),
        chart,
    })?;

    let result = CommandResult::ok(data).with_cache_hit(fetched.cache_hit);
    Ok(match notice {
        Some(notice) => result.with_notice(notice),
        None => result,
    })
}
