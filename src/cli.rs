//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvSignalWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::batch::{compute_crossing_matrix, compute_up_down, CrossingMatrix};
use crate::domain::config_validation::{
    parse_windows, read_double, read_int, require_distinct, validate_backtest_config,
    validate_signal_config, DEFAULT_WINDOWS,
};
use crate::domain::crossing::cross_signal;
use crate::domain::error::MacrossError;
use crate::domain::intersection::{difference, IntersectionDifference};
use crate::domain::signal_table::SignalTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::SignalReportPort;

#[derive(Parser, Debug)]
#[command(name = "macross", about = "Moving-average crossing signals and backtests")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Predict the close at which two moving averages next meet
    Intersect {
        #[arg(short, long, default_value = "data")]
        data: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long, default_value_t = 3)]
        window1: usize,
        #[arg(long, default_value_t = 10)]
        window2: usize,
        /// Only use records dated on or before this day (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Compute crossing signals for every pair of windows
    Crossings {
        /// INI config supplying [data] path and [signals] windows
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        code: String,
        /// Comma-separated windows, overrides the config (default 3,5,10)
        #[arg(long)]
        windows: Option<String>,
        /// Write the full per-day signal table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a crossing-driven backtest from an INI config
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

/// Install the stderr log subscriber. Library code never does this itself.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Intersect {
            data,
            code,
            window1,
            window2,
            as_of,
        } => run_intersect(&data, &code, window1, window2, as_of),
        Command::Crossings {
            config,
            data,
            code,
            windows,
            output,
        } => run_crossings(
            config.as_deref(),
            data.as_deref(),
            &code,
            windows.as_deref(),
            output.as_deref(),
        ),
        Command::Backtest { config, code } => run_backtest_command(&config, code.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_intersect(
    data: &Path,
    code: &str,
    window1: usize,
    window2: usize,
    as_of: Option<NaiveDate>,
) -> Result<(), MacrossError> {
    let port = CsvPriceAdapter::new(data.to_path_buf());
    let series = port.fetch_prices(code)?;
    let diff = difference(&series, window1, window2, as_of)?;
    let visible = match as_of {
        Some(date) => series.truncate_to(date)?,
        None => series,
    };
    let crossed = cross_signal(&visible, window1, window2)?;
    let as_of_date = visible.bars().last().map(|b| b.date);

    println!(
        "{}",
        format_intersection(code, window1, window2, as_of_date, &diff, crossed)
    );
    Ok(())
}

pub fn format_intersection(
    code: &str,
    window1: usize,
    window2: usize,
    as_of: Option<NaiveDate>,
    diff: &IntersectionDifference,
    crossed: bool,
) -> String {
    let as_of = as_of.map(|d| d.to_string()).unwrap_or_default();
    format!(
        "{code} as of {as_of} (MA{window1} x MA{window2})\n\
         \x20 last close:         {:.4}\n\
         \x20 intersection close: {:.4}\n\
         \x20 difference:         {:.4} ({:+.2}%)\n\
         \x20 crossed today:      {}",
        diff.last_close,
        diff.predicted_price,
        diff.difference,
        diff.difference_percent * 100.0,
        if crossed { "yes" } else { "no" },
    )
}

fn run_crossings(
    config_path: Option<&Path>,
    data: Option<&Path>,
    code: &str,
    windows: Option<&str>,
    output: Option<&Path>,
) -> Result<(), MacrossError> {
    let adapter = match config_path {
        Some(path) => {
            let adapter = FileConfigAdapter::from_file(path)?;
            validate_signal_config(&adapter)?;
            Some(adapter)
        }
        None => None,
    };
    let raw_windows = match (windows, &adapter) {
        (Some(w), _) => w.to_string(),
        (None, Some(a)) => a
            .get_string("signals", "windows")
            .unwrap_or_else(|| DEFAULT_WINDOWS.to_string()),
        (None, None) => DEFAULT_WINDOWS.to_string(),
    };
    let data = match (data, &adapter) {
        (Some(d), _) => d.to_path_buf(),
        (None, Some(a)) => data_path(a),
        (None, None) => PathBuf::from("data"),
    };

    let windows = parse_windows(&raw_windows)
        .and_then(|w| require_distinct(&w).map(|()| w))
        .map_err(|reason| MacrossError::InvalidArgument { reason })?;
    let port = CsvPriceAdapter::new(data);
    let series = port.fetch_prices(code)?;
    let matrix = compute_crossing_matrix(&series, &windows)?;

    println!("{}", format_latest_crossings(code, &matrix));

    if let Some(path) = output {
        let table = SignalTable::build(&series, &matrix, &compute_up_down(&series))?;
        CsvSignalWriter.write_signals(&table, path)?;
        eprintln!("Wrote {} rows to {}", table.rows.len(), path.display());
    }
    Ok(())
}

pub fn format_latest_crossings(code: &str, matrix: &CrossingMatrix) -> String {
    let mut out = format!("{code} latest crossings:");
    for (pair, signal) in matrix.latest() {
        let total = matrix
            .get(&pair)
            .map(|s| s.iter().filter(|c| **c != 0).count())
            .unwrap_or(0);
        out.push_str(&format!("\n  {pair}: {signal:+} ({total} crossings in history)"));
    }
    out
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, MacrossError> {
    let start_date = match adapter.get_string("backtest", "start_date") {
        Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            MacrossError::ConfigInvalid {
                section: "backtest".into(),
                key: "start_date".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?),
        None => None,
    };
    let defaults = BacktestConfig::default();

    Ok(BacktestConfig {
        start_date,
        initial_capital: read_double(adapter, "backtest", "initial_capital", defaults.initial_capital)?,
        fast_window: read_window(adapter, "fast_window", defaults.fast_window)?,
        slow_window: read_window(adapter, "slow_window", defaults.slow_window)?,
    })
}

fn read_window(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, MacrossError> {
    let value = read_int(adapter, "backtest", key, default as i64)?;
    usize::try_from(value).map_err(|_| MacrossError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: format!("{} must be at least 1", key),
    })
}

pub fn resolve_code(code_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    code_override
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .or_else(|| config.get_string("backtest", "code"))
}

pub fn data_path(config: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        config
            .get_string("data", "path")
            .unwrap_or_else(|| "data".to_string()),
    )
}

fn run_backtest_command(config_path: &Path, code_override: Option<&str>) -> Result<(), MacrossError> {
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(config_path)?;

    let code = resolve_code(code_override, &adapter).ok_or_else(|| MacrossError::ConfigMissing {
        section: "backtest".into(),
        key: "code".into(),
    })?;
    validate_backtest_config(&adapter)?;
    let config = build_backtest_config(&adapter)?;

    let port = CsvPriceAdapter::new(data_path(&adapter));
    let result = run_backtest_pipeline(&port, &code, &config)?;
    println!("{}", format_backtest(&code, &result));
    Ok(())
}

pub fn run_backtest_pipeline(
    port: &dyn PriceDataPort,
    code: &str,
    config: &BacktestConfig,
) -> Result<BacktestResult, MacrossError> {
    let series = port.fetch_prices(code)?;
    run_backtest(&series, config)
}

pub fn format_backtest(code: &str, result: &BacktestResult) -> String {
    let report = &result.report;
    let mut out = format!(
        "{code} backtest (MA{} x MA{}), {} rows, {} trades",
        result.pair.short(),
        result.pair.long(),
        result.rows.len(),
        report.trades.len()
    );
    for trade in &report.trades {
        out.push_str(&format!(
            "\n  {} {:<4} {:>8} @ {:.4} ({:+.2}%)",
            trade.date,
            trade.action,
            trade.volume,
            trade.price,
            trade.price_change_pct * 100.0
        ));
    }
    out.push_str(&format!(
        "\n  capital: {:.2}  final: {:.2}  gain: {:.2} ({:+.2}%)",
        report.initial_capital,
        report.final_cash,
        report.gain,
        report.gain_percent * 100.0
    ));
    out
}
