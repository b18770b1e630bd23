//! CLI argument definitions for ferrofetch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Run one fetcher and print canonical records |
//! | `providers` | List registered provider/kind pairs |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Daily AAPL bars from Polygon
//! ferrofetch fetch polygon stock-price --symbol AAPL --start-date 2023-01-03
//!
//! # Five-minute S&P 500 bars from FMP
//! ferrofetch fetch fmp major-indices-historical --symbol GSPC --param interval=5min
//!
//! # Transcripts for one fiscal year
//! ferrofetch fetch fmp earnings-call-transcript --symbol MSFT --param year=2022 --pretty
//! ```

use clap::{Args, Parser, Subcommand};
use ferrofetch_core::{DataKind, ProviderId, DEFAULT_TIMEOUT_MS};

/// Normalized market data from vendor REST APIs.
///
/// API keys are read from FERROFETCH_POLYGON_API_KEY / POLYGON_API_KEY and
/// FERROFETCH_FMP_API_KEY / FMP_API_KEY. Set RUST_LOG=debug to trace requests.
#[derive(Debug, Parser)]
#[command(name = "ferrofetch", author, version, about)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch canonical records from one provider.
    ///
    /// # Examples
    ///
    ///   ferrofetch fetch polygon crypto-price --symbol BTCUSD --start-date 2023-01-01
    ///   ferrofetch fetch fmp analyst-estimates --symbol AAPL --param period=quarterly
    ///   ferrofetch fetch fmp income-statement --param cik=0000320193 --param limit=4
    Fetch(FetchArgs),

    /// List every provider and data kind this build can fetch.
    Providers,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Vendor to query (polygon, fmp).
    pub provider: ProviderId,

    /// Data kind, e.g. stock-price or major-indices-historical.
    pub kind: DataKind,

    /// Instrument symbol without vendor prefixes (AAPL, BTCUSD, GSPC).
    /// Required by every kind except income-statement lookups by `cik`.
    #[arg(long)]
    pub symbol: Option<String>,

    /// First day of the range (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day of the range (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: Option<String>,

    /// Extra query parameter as key=value; repeatable. Values are read as JSON
    /// when they parse, otherwise as strings.
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}
