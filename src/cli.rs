//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_report::{
    format_backtest_summary, format_performance_report, format_tail,
};
use crate::adapters::csv_adapter::{CsvAdapter, read_portfolio_values};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::BandtraderError;
use crate::domain::metrics::{Annualization, PerformanceReport};
use crate::domain::pipeline::run_pipeline;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Rules-based single-asset backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run indicators, signals and the simulator over a price CSV
    Backtest {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the annotated series here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of trailing rows to print
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Compute performance metrics from a results CSV
    Report {
        #[arg(short, long)]
        results: PathBuf,
        #[arg(long, default_value_t = 0.02)]
        risk_free_rate: f64,
        /// trading_days, hourly, or a number of periods per year
        #[arg(long, default_value = "trading_days")]
        annualization: Annualization,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            config,
            output,
            tail,
        } => run_backtest(&data, config.as_deref(), output.as_deref(), tail),
        Command::Validate { config } => run_validate(&config),
        Command::Report {
            results,
            risk_free_rate,
            annualization,
        } => run_report(&results, risk_free_rate, annualization),
    }
}

fn fail(err: BandtraderError) -> ExitCode {
    error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

pub fn build_strategy_params(adapter: &dyn ConfigPort) -> StrategyParams {
    let d = StrategyParams::default();
    StrategyParams {
        window: adapter.get_usize("strategy", "window", d.window),
        z_threshold: adapter.get_double("strategy", "z_threshold", d.z_threshold),
        rsi_period: adapter.get_usize("strategy", "rsi_period", d.rsi_period),
        rsi_low: adapter.get_double("strategy", "rsi_low", d.rsi_low),
        rsi_high: adapter.get_double("strategy", "rsi_high", d.rsi_high),
        ema_short: adapter.get_usize("strategy", "ema_short", d.ema_short),
        ema_long: adapter.get_usize("strategy", "ema_long", d.ema_long),
        atr_window: adapter.get_usize("strategy", "atr_window", d.atr_window),
        breakout_window: adapter.get_usize("strategy", "breakout_window", d.breakout_window),
        breakout_include_current: adapter.get_bool(
            "strategy",
            "breakout_include_current",
            d.breakout_include_current,
        ),
        volume_filter: adapter.get_bool("strategy", "volume_filter", d.volume_filter),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, BandtraderError> {
    let d = BacktestConfig::default();
    let annualization = match adapter.get_string("backtest", "annualization") {
        Some(s) => s
            .parse::<Annualization>()
            .map_err(|reason| BandtraderError::ConfigInvalid {
                section: "backtest".into(),
                key: "annualization".into(),
                reason,
            })?,
        None => d.annualization,
    };

    Ok(BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", d.initial_capital),
        fee: adapter.get_double("backtest", "fee", d.fee),
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", d.risk_free_rate),
        annualization,
    })
}

/// Loads, validates and converts a config file; defaults when no path is given.
pub fn resolve_settings(
    config_path: Option<&Path>,
) -> Result<(StrategyParams, BacktestConfig), ExitCode> {
    let Some(path) = config_path else {
        return Ok((StrategyParams::default(), BacktestConfig::default()));
    };
    let adapter = load_config(path)?;
    validate_strategy_config(&adapter).map_err(fail)?;
    validate_backtest_config(&adapter).map_err(fail)?;

    let params = build_strategy_params(&adapter);
    let config = build_backtest_config(&adapter).map_err(fail)?;
    Ok((params, config))
}

fn run_backtest(
    data_path: &Path,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
    tail: usize,
) -> ExitCode {
    let (params, config) = match resolve_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    info!("Loading prices from {}", data_path.display());
    let adapter = CsvAdapter::new(data_path.to_path_buf());
    let bars = match adapter.load_bars() {
        Ok(b) => b,
        Err(e) => return fail(e),
    };

    let output = match run_pipeline(bars, &params, &config) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    if tail > 0 {
        print!("{}", format_tail(&output.series, tail));
        println!();
    }
    print!("{}", format_backtest_summary(output.summary()));
    println!();
    print!("{}", format_performance_report(&output.report));

    if let Some(path) = output_path {
        if let Err(e) = adapter.write(&output.series, path) {
            return fail(e);
        }
        info!("Results written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    match resolve_settings(Some(config_path)) {
        Ok((params, config)) => {
            info!(
                window = params.window,
                z_threshold = params.z_threshold,
                fee = config.fee,
                annualization = %config.annualization,
                "configuration is valid"
            );
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_report(results_path: &Path, risk_free_rate: f64, annualization: Annualization) -> ExitCode {
    info!("Reading results from {}", results_path.display());
    let values = match read_portfolio_values(results_path) {
        Ok(v) => v,
        Err(e) => return fail(e),
    };

    match PerformanceReport::from_column(values.as_deref(), risk_free_rate, annualization) {
        Ok(report) => {
            print!("{}", format_performance_report(&report));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
