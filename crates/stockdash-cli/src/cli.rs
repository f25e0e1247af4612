//! CLI argument definitions for stockdash.
//!
//! Each subcommand is one dashboard page. Pages print a JSON envelope on
//! stdout; logs go to stderr.
//!
//! Every invocation builds a fresh `DataAccess`, so the series cache lives
//! only for one page render. `--cache-ttl-secs` and `meta.cache_hit` matter
//! when the same process fetches a key twice; a single CLI run always
//! reports `cache_hit: false` for data pages.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `overview` | Describe the available pages |
//! | `candlestick` | Daily candlesticks with a volume panel |
//! | `chart` | Close prices with moving-average overlays |
//! | `intraday` | 5-minute candlesticks for one trading day |
//! | `stats` | Descriptive statistics of every OHLCV field |
//! | `quote` | Best-effort latest price |
//!
//! # Global Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--pretty` | | `false` | Pretty-print JSON output |
//! | `--cache-ttl-secs` | `STOCKDASH_CACHE_TTL_SECS` | `300` | Series cache lifetime, `0` disables |
//! | `--timeout-ms` | `STOCKDASH_TIMEOUT_MS` | `10000` | Per-request HTTP timeout |
//! | `--base-url` | `STOCKDASH_BASE_URL` | Yahoo | Provider endpoint root |
//! | `--log-level` | `STOCKDASH_LOG` | `warn` | Log filter when `RUST_LOG` is unset |
//! | `--json-logs` | | `false` | Emit logs as JSON lines |
//!
//! # Examples
//!
//! ```bash
//! stockdash candlestick MSFT --period 3mo --interval 1wk --pretty
//! stockdash chart AAPL --period 1y --ma 20 --ma 50
//! stockdash intraday MSFT --period 5d --date 2024-03-08
//! ```

use clap::{Args, Parser, Subcommand};
use stockdash_core::{Interval, Period};

/// Stock dashboard pages over Yahoo market data.
#[derive(Debug, Parser)]
#[command(name = "stockdash", author, version, about = "Stock dashboard pages as JSON")]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Lifetime of cached series in seconds; 0 disables caching.
    #[arg(long, global = true, env = "STOCKDASH_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Per-request HTTP timeout in milliseconds.
    #[arg(long, global = true, env = "STOCKDASH_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Provider endpoint root.
    #[arg(long, global = true, env = "STOCKDASH_BASE_URL")]
    pub base_url: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, env = "STOCKDASH_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Dashboard pages.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe the available pages.
    Overview,

    /// Candlestick chart with a volume panel.
    ///
    ///   stockdash candlestick MSFT --period 6mo --interval 1wk
    Candlestick(CandlestickArgs),

    /// Close-price line chart with moving-average overlays.
    ///
    ///   stockdash chart MSFT --ma 20 --ma 50
    Chart(ChartArgs),

    /// Intraday 5-minute candlesticks for one trading day.
    ///
    ///   stockdash intraday MSFT --period 7d --date 2024-03-08
    Intraday(IntradayArgs),

    /// Descriptive statistics (count, mean, std, min, quartiles, max).
    Stats(StatsArgs),

    /// Latest price and currency.
    Quote(QuoteArgs),
}

#[derive(Debug, Args)]
pub struct CandlestickArgs {
    pub ticker: String,

    /// One of 1d, 5d, 7d, 1mo, 3mo, 6mo, 1y.
    #[arg(long, default_value = "1mo")]
    pub period: Period,

    /// One of 1d, 1wk, 1mo.
    #[arg(long, default_value = "1d")]
    pub interval: Interval,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    pub ticker: String,

    #[arg(long, default_value = "1y")]
    pub period: Period,

    #[arg(long, default_value = "1d")]
    pub interval: Interval,

    /// Moving-average window in bars; repeat for several overlays.
    #[arg(long = "ma", value_name = "WINDOW")]
    pub windows: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct IntradayArgs {
    pub ticker: String,

    /// One of 5d, 7d, 15d, 30d.
    #[arg(long, default_value = "5d")]
    pub period: Period,

    /// Trading date to chart (YYYY-MM-DD); defaults to the first available.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    pub ticker: String,

    /// One of 1d, 5d, 7d, 1mo, 3mo, 6mo, 1y.
    #[arg(long, default_value = "1mo")]
    pub period: Period,

    /// One of 1d, 1wk, 1mo.
    #[arg(long, default_value = "1d")]
    pub interval: Interval,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    pub ticker: String,
}
