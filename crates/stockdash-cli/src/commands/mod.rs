mod candlestick;
mod chart;
mod intraday;
mod overview;
mod quote;
mod stats;

use std::time::{Duration, Instant};

use serde_json::Value;
use stockdash_core::{DataAccess, DataAccessConfig, Interval, Period, QueryKey};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::Envelope;

/// Periods offered by the daily-bar pages (candlestick, stats).
const DAILY_PAGE_PERIODS: [Period; 7] = [
    Period::OneDay,
    Period::FiveDays,
    Period::SevenDays,
    Period::OneMonth,
    Period::ThreeMonths,
    Period::SixMonths,
    Period::OneYear,
];

/// Intervals offered by the daily-bar pages (candlestick, stats).
const DAILY_PAGE_INTERVALS: [Interval; 3] = [Interval::OneDay, Interval::OneWeek, Interval::OneMonth];

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub notices: Vec<String>,
    pub cache_hit: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            notices: Vec::new(),
            cache_hit: false,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notices.push(notice.into());
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let access = DataAccess::from_config(data_access_config(cli));

    let started = Instant::now();
    let CommandResult {
        data,
        notices,
        cache_hit,
    } = execute(&cli.command, &access).await?;
    let latency_ms = started.elapsed().as_millis() as u64;
    info!(
        page = command_name(&cli.command),
        latency_ms,
        cache_hit,
        notices = notices.len(),
        "page rendered"
    );

    let mut meta = Metadata::new(access.source_name(), latency_ms, cache_hit);
    for notice in notices {
        meta.push_notice(notice);
    }

    Ok(Envelope { meta, data })
}

pub async fn execute(command: &Command, access: &DataAccess) -> Result<CommandResult, CliError> {
    match command {
        Command::Overview => overview::run(),
        Command::Candlestick(args) => candlestick::run(args, access).await,
        Command::Chart(args) => chart::run(args, access).await,
        Command::Intraday(args) => intraday::run(args, access).await,
        Command::Stats(args) => stats::run(args, access).await,
        Command::Quote(args) => quote::run(args, access).await,
    }
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Overview => "overview",
        Command::Candlestick(_) => "candlestick",
        Command::Chart(_) => "chart",
        Command::Intraday(_) => "intraday",
        Command::Stats(_) => "stats",
        Command::Quote(_) => "quote",
    }
}

fn data_access_config(cli: &Cli) -> DataAccessConfig {
    let config = DataAccessConfig::default()
        .with_cache_ttl(Duration::from_secs(cli.cache_ttl_secs))
        .with_request_timeout_ms(cli.timeout_ms);
    match &cli.base_url {
        Some(base_url) => config.with_base_url(base_url.as_str()),
        None => config,
    }
}

/// Reject periods a page does not offer.
fn ensure_period(page: &str, period: Period, allowed: &[Period]) -> Result<(), CliError> {
    if allowed.contains(&period) {
        return Ok(());
    }
    Err(CliError::Command(format!(
        "period '{period}' is not offered on the {page} page; choose one of {}",
        join(allowed.iter().map(|p| p.as_str()))
    )))
}

/// Reject intervals a page does not offer.
fn ensure_interval(page: &str, interval: Interval, allowed: &[Interval]) -> Result<(), CliError> {
    if allowed.contains(&interval) {
        return Ok(());
    }
    Err(CliError::Command(format!(
        "interval '{interval}' is not offered on the {page} page; choose one of {}",
        join(allowed.iter().map(|i| i.as_str()))
    )))
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

fn no_data_notice(key: &QueryKey) -> String {
    format!("no data for {key}")
}
