//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Absent keys fall back
//! to the defaults of [`StrategyParams`] and [`BacktestConfig`], so only
//! present-but-wrong values are rejected.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::BandtraderError;
use crate::domain::metrics::Annualization;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;

const STRATEGY_INT_KEYS: [&str; 6] = [
    "window",
    "rsi_period",
    "ema_short",
    "ema_long",
    "atr_window",
    "breakout_window",
];
const STRATEGY_FLOAT_KEYS: [&str; 3] = ["z_threshold", "rsi_low", "rsi_high"];
const STRATEGY_BOOL_KEYS: [&str; 2] = ["breakout_include_current", "volume_filter"];
const BACKTEST_FLOAT_KEYS: [&str; 3] = ["initial_capital", "fee", "risk_free_rate"];

/// Boolean spellings accepted in config files.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let defaults = StrategyParams::default();

    validate_parses(config, "strategy", &STRATEGY_INT_KEYS, "an integer", |v| {
        v.trim().parse::<i64>().is_ok()
    })?;
    validate_parses(config, "strategy", &STRATEGY_FLOAT_KEYS, "a number", |v| {
        v.trim().parse::<f64>().is_ok()
    })?;
    validate_parses(config, "strategy", &STRATEGY_BOOL_KEYS, "a boolean", |v| {
        parse_bool(v).is_some()
    })?;

    validate_min_int(config, "window", defaults.window, 2)?;
    validate_min_int(config, "rsi_period", defaults.rsi_period, 1)?;
    validate_min_int(config, "ema_short", defaults.ema_short, 1)?;
    validate_min_int(config, "ema_long", defaults.ema_long, 1)?;
    validate_min_int(config, "atr_window", defaults.atr_window, 1)?;
    validate_min_int(config, "breakout_window", defaults.breakout_window, 1)?;
    validate_ema_order(config, &defaults)?;
    validate_z_threshold(config, &defaults)?;
    validate_rsi_bounds(config, &defaults)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let defaults = BacktestConfig::default();

    validate_parses(config, "backtest", &BACKTEST_FLOAT_KEYS, "a number", |v| {
        v.trim().parse::<f64>().is_ok()
    })?;
    validate_initial_capital(config, &defaults)?;
    validate_fee(config, &defaults)?;
    validate_risk_free_rate(config, &defaults)?;
    validate_annualization(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BandtraderError {
    BandtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Present keys must parse; absent keys fall back to defaults later.
fn validate_parses(
    config: &dyn ConfigPort,
    section: &str,
    keys: &[&str],
    expected: &str,
    parses: impl Fn(&str) -> bool,
) -> Result<(), BandtraderError> {
    for key in keys {
        if let Some(raw) = config.get_string(section, key) {
            if !parses(&raw) {
                return Err(invalid(
                    section,
                    key,
                    format!("expected {}, got '{}'", expected, raw),
                ));
            }
        }
    }
    Ok(())
}

fn validate_min_int(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    minimum: i64,
) -> Result<(), BandtraderError> {
    let value = config.get_int("strategy", key, default as i64);
    if value < minimum {
        return Err(invalid(
            "strategy",
            key,
            format!("{} must be at least {}", key, minimum),
        ));
    }
    Ok(())
}

fn validate_ema_order(
    config: &dyn ConfigPort,
    defaults: &StrategyParams,
) -> Result<(), BandtraderError> {
    let short = config.get_int("strategy", "ema_short", defaults.ema_short as i64);
    let long = config.get_int("strategy", "ema_long", defaults.ema_long as i64);
    if short >= long {
        return Err(invalid(
            "strategy",
            "ema_short",
            "ema_short must be shorter than ema_long",
        ));
    }
    Ok(())
}

fn validate_z_threshold(
    config: &dyn ConfigPort,
    defaults: &StrategyParams,
) -> Result<(), BandtraderError> {
    let value = config.get_double("strategy", "z_threshold", defaults.z_threshold);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "strategy",
            "z_threshold",
            "z_threshold must be non-negative",
        ));
    }
    Ok(())
}

fn validate_rsi_bounds(
    config: &dyn ConfigPort,
    defaults: &StrategyParams,
) -> Result<(), BandtraderError> {
    let low = config.get_double("strategy", "rsi_low", defaults.rsi_low);
    let high = config.get_double("strategy", "rsi_high", defaults.rsi_high);
    if !(0.0..=100.0).contains(&low) {
        return Err(invalid("strategy", "rsi_low", "rsi_low must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&high) {
        return Err(invalid("strategy", "rsi_high", "rsi_high must be between 0 and 100"));
    }
    if low >= high {
        return Err(invalid("strategy", "rsi_low", "rsi_low must be below rsi_high"));
    }
    Ok(())
}

fn validate_initial_capital(
    config: &dyn ConfigPort,
    defaults: &BacktestConfig,
) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "initial_capital", defaults.initial_capital);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_fee(config: &dyn ConfigPort, defaults: &BacktestConfig) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "fee", defaults.fee);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("backtest", "fee", "fee must be in [0, 1)"));
    }
    Ok(())
}

fn validate_risk_free_rate(
    config: &dyn ConfigPort,
    defaults: &BacktestConfig,
) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "risk_free_rate", defaults.risk_free_rate);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_annualization(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    match config.get_string("backtest", "annualization") {
        None => Ok(()),
        Some(s) => s
            .parse::<Annualization>()
            .map(|_| ())
            .map_err(|reason| invalid("backtest", "annualization", reason)),
    }
}
