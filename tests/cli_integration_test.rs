//! CLI integration tests.
//!
//! Tests cover:
//! - Config conversion (build_strategy_params, build_backtest_config)
//! - Settings resolution with real INI files on disk
//! - `backtest`, `validate` and `report` subcommands end to end

mod common;

use bandtrader::adapters::csv_adapter::read_portfolio_values;
use bandtrader::adapters::file_config_adapter::FileConfigAdapter;
use bandtrader::cli::{self, Cli};
use bandtrader::domain::backtest::BacktestConfig;
use bandtrader::domain::error::BandtraderError;
use bandtrader::domain::metrics::Annualization;
use bandtrader::domain::strategy::StrategyParams;
use clap::Parser;
use common::*;
use std::process::ExitCode;

const VALID_INI: &str = r#"
[strategy]
window = 20
z_threshold = 2.0
rsi_period = 10
rsi_low = 25
rsi_high = 75
ema_short = 5
ema_long = 30
atr_window = 14
breakout_window = 10
breakout_include_current = false
volume_filter = no

[backtest]
initial_capital = 5000
fee = 0.0025
risk_free_rate = 0.01
annualization = hourly
"#;

fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

fn same_code(code: ExitCode, expected: u8) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
}

fn price_csv(len: usize) -> String {
    let mut csv = String::from("date,close,volume\n");
    for (i, price) in oscillating_prices(len).iter().enumerate() {
        let ts = start_time() + chrono::Duration::days(i as i64);
        csv.push_str(&format!("{},{},{}\n", ts.format("%Y-%m-%d"), price, 500 + i));
    }
    csv
}

mod config_building {
    use super::*;

    #[test]
    fn strategy_params_from_ini() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let params = cli::build_strategy_params(&adapter);

        assert_eq!(
            params,
            StrategyParams {
                window: 20,
                z_threshold: 2.0,
                rsi_period: 10,
                rsi_low: 25.0,
                rsi_high: 75.0,
                ema_short: 5,
                ema_long: 30,
                atr_window: 14,
                breakout_window: 10,
                breakout_include_current: false,
                volume_filter: false,
            }
        );
    }

    #[test]
    fn backtest_config_from_ini() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert_eq!(config.initial_capital, 5000.0);
        assert_eq!(config.fee, 0.0025);
        assert_eq!(config.risk_free_rate, 0.01);
        assert_eq!(config.annualization, Annualization::HourlyIndex);
    }

    #[test]
    fn empty_sections_give_defaults() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n[backtest]\n").unwrap();
        assert_eq!(cli::build_strategy_params(&adapter), StrategyParams::default());
        assert_eq!(
            cli::build_backtest_config(&adapter).unwrap(),
            BacktestConfig::default()
        );
    }

    #[test]
    fn custom_annualization_number() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nannualization = 365\n").unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();
        assert_eq!(config.annualization, Annualization::Custom(365.0));
    }

    #[test]
    fn bad_annualization_is_config_invalid() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nannualization = sometimes\n").unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { ref key, .. } if key == "annualization"));
    }
}

mod settings_resolution {
    use super::*;

    #[test]
    fn no_config_path_uses_defaults() {
        let (params, config) = cli::resolve_settings(None).unwrap();
        assert_eq!(params, StrategyParams::default());
        assert_eq!(config, BacktestConfig::default());
    }

    #[test]
    fn valid_file_resolves() {
        let file = write_temp_file(VALID_INI, ".ini");
        let (params, config) = cli::resolve_settings(Some(file.path())).unwrap();
        assert_eq!(params.window, 20);
        assert_eq!(config.fee, 0.0025);
    }

    #[test]
    fn invalid_file_maps_to_config_exit_code() {
        let file = write_temp_file("[strategy]\nema_short = 30\nema_long = 10\n", ".ini");
        let code = cli::resolve_settings(Some(file.path())).unwrap_err();
        assert!(same_code(code, 2));
    }

    #[test]
    fn garbage_values_are_not_replaced_by_defaults() {
        let file = write_temp_file(
            "[strategy]\nwindow = abc\nvolume_filter = maybe\n[backtest]\nfee = cheap\n",
            ".ini",
        );
        let code = cli::resolve_settings(Some(file.path())).unwrap_err();
        assert!(same_code(code, 2));

        let file = write_temp_file("[backtest]\nfee = cheap\n", ".ini");
        let cli = Cli::parse_from(["bandtrader", "validate", "--config", file.path().to_str().unwrap()]);
        assert!(same_code(cli::run(cli), 2));
    }

    #[test]
    fn missing_file_maps_to_config_exit_code() {
        let code =
            cli::resolve_settings(Some(std::path::Path::new("/nonexistent/bandtrader.ini")))
                .unwrap_err();
        assert!(same_code(code, 2));
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn backtest_writes_annotated_csv() {
        let data = write_temp_file(&price_csv(60), ".csv");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");

        let cli = Cli::parse_from([
            "bandtrader",
            "backtest",
            "--data",
            data.path().to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--tail",
            "3",
        ]);
        assert!(is_success(cli::run(cli)));

        let values = read_portfolio_values(&out).unwrap().unwrap();
        assert_eq!(values.len(), 60);
        assert_eq!(values[0], 10_000.0);
    }

    #[test]
    fn backtest_with_config_file() {
        let data = write_temp_file(&price_csv(40), ".csv");
        let config = write_temp_file(VALID_INI, ".ini");

        let cli = Cli::parse_from([
            "bandtrader",
            "backtest",
            "--data",
            data.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ]);
        assert!(is_success(cli::run(cli)));
    }

    #[test]
    fn backtest_missing_close_column() {
        let data = write_temp_file("date,open\n2024-01-01,10\n", ".csv");
        let cli = Cli::parse_from([
            "bandtrader",
            "backtest",
            "--data",
            data.path().to_str().unwrap(),
        ]);
        assert!(same_code(cli::run(cli), 5));
    }

    #[test]
    fn backtest_rejects_non_positive_close() {
        let data = write_temp_file("date,close\n2024-01-01,10\n2024-01-02,0\n", ".csv");
        let cli = Cli::parse_from([
            "bandtrader",
            "backtest",
            "--data",
            data.path().to_str().unwrap(),
        ]);
        assert!(same_code(cli::run(cli), 5));
    }

    #[test]
    fn validate_subcommand() {
        let good = write_temp_file(VALID_INI, ".ini");
        let cli = Cli::parse_from(["bandtrader", "validate", "--config", good.path().to_str().unwrap()]);
        assert!(is_success(cli::run(cli)));

        let bad = write_temp_file("[backtest]\nfee = 2\n", ".ini");
        let cli = Cli::parse_from(["bandtrader", "validate", "--config", bad.path().to_str().unwrap()]);
        assert!(same_code(cli::run(cli), 2));
    }

    #[test]
    fn report_subcommand() {
        let results = write_temp_file(
            "timestamp,portfolio_value\n2024-01-01,100\n2024-01-02,110\n2024-01-03,105\n",
            ".csv",
        );
        let cli = Cli::parse_from([
            "bandtrader",
            "report",
            "--results",
            results.path().to_str().unwrap(),
            "--annualization",
            "hourly",
        ]);
        assert!(is_success(cli::run(cli)));
    }

    #[test]
    fn report_without_portfolio_value_column() {
        let results = write_temp_file("timestamp,close\n2024-01-01,100\n", ".csv");
        let cli = Cli::parse_from([
            "bandtrader",
            "report",
            "--results",
            results.path().to_str().unwrap(),
        ]);
        assert!(same_code(cli::run(cli), 5));
    }

    #[test]
    fn annualization_flag_rejects_garbage() {
        let result = Cli::try_parse_from([
            "bandtrader",
            "report",
            "--results",
            "x.csv",
            "--annualization",
            "weekly",
        ]);
        assert!(result.is_err());
    }
}
