//! Configuration validation.
//!
//! Validates config fields before any computation runs.

use crate::domain::error::MacrossError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_WINDOWS: &str = "3,5,10";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_initial_capital(config)?;
    validate_start_date(config)?;
    validate_windows_pair(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let raw = config
        .get_string("signals", "windows")
        .unwrap_or_else(|| DEFAULT_WINDOWS.to_string());
    parse_windows(&raw)
        .and_then(|windows| require_distinct(&windows))
        .map_err(|reason| MacrossError::ConfigInvalid {
            section: "signals".to_string(),
            key: "windows".to_string(),
            reason,
        })
}

/// A crossing matrix needs at least one pair.
pub fn require_distinct(windows: &[usize]) -> Result<(), String> {
    let mut distinct = windows.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 2 {
        return Err("at least two distinct windows are required".to_string());
    }
    Ok(())
}

/// Integer key, `default` when absent. A present value that does not parse
/// is an error rather than a silent fallback.
pub fn read_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, MacrossError> {
    match config.get_string(section, key) {
        Some(raw) => raw.trim().parse().map_err(|_| not_a_number(section, key, &raw)),
        None => Ok(default),
    }
}

/// Float counterpart of [`read_int`].
pub fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, MacrossError> {
    match config.get_string(section, key) {
        Some(raw) => raw.trim().parse().map_err(|_| not_a_number(section, key, &raw)),
        None => Ok(default),
    }
}

fn not_a_number(section: &str, key: &str, raw: &str) -> MacrossError {
    MacrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("not a number: '{}'", raw.trim()),
    }
}

/// Parse a comma-separated list of positive window sizes.
pub fn parse_windows(raw: &str) -> Result<Vec<usize>, String> {
    let windows = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(0) => Err("windows must be at least 1".to_string()),
            Ok(w) => Ok(w),
            Err(_) => Err(format!("'{}' is not a window size", s)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if windows.is_empty() {
        return Err("no windows given".to_string());
    }
    Ok(windows)
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let value = read_double(config, "backtest", "initial_capital", 10_000.0)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(MacrossError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    if let Some(s) = config.get_string("backtest", "start_date") {
        if NaiveDate::parse_from_str(&s, "%Y-%m-%d").is_err() {
            return Err(MacrossError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_windows_pair(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let fast = read_int(config, "backtest", "fast_window", 3)?;
    let slow = read_int(config, "backtest", "slow_window", 13)?;
    for (key, value) in [("fast_window", fast), ("slow_window", slow)] {
        if value < 1 {
            return Err(MacrossError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }
    if fast == slow {
        return Err(MacrossError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "slow_window".to_string(),
            reason: "fast_window and slow_window must differ".to_string(),
        });
    }
    Ok(())
}
