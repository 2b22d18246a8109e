//! Backtest simulator.
//!
//! A long-only, single-asset state machine walked strictly in time order. The
//! decision and the fill at bar `t` use only the close and the combined signal
//! of bar `t`:
//!
//! - Flat + Long: spend all cash at the close, less `fee` of notional.
//! - Long + Short: liquidate the whole position at the close, less `fee`.
//! - Anything else leaves the state unchanged (no pyramiding, no shorting).

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::error::BandtraderError;
use crate::domain::indicator::rolling::{mean, sample_stddev};
use crate::domain::metrics::{Annualization, period_returns};
use crate::domain::ohlcv::{PriceBar, validate_bars};
use crate::domain::portfolio::Portfolio;
use crate::domain::position::{Fill, Side};
use crate::domain::signal::Signal;

/// Annualization factor of the simulator's own Sharpe figure.
pub const SHARPE_PERIODS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Proportional fee charged on both entry and exit, in [0, 1).
    pub fee: f64,
    pub risk_free_rate: f64,
    pub annualization: Annualization,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            fee: 0.001,
            risk_free_rate: 0.02,
            annualization: Annualization::TradingDays,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub initial_balance: f64,
    pub final_value: f64,
    /// Bars with a nonzero combined signal. Signals ignored because of the
    /// current state are counted too.
    pub total_trades: usize,
    /// Transitions actually executed (buys plus sells).
    pub executed_trades: usize,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub portfolio: Portfolio,
    /// Bar-over-bar change of portfolio value; `None` for the first bar.
    pub returns: Vec<Option<f64>>,
    pub summary: BacktestSummary,
}

impl BacktestResult {
    pub fn portfolio_values(&self) -> Vec<f64> {
        self.portfolio.equity_values()
    }
}

#[derive(Debug, Clone)]
pub struct Backtester {
    portfolio: Portfolio,
    fee: f64,
}

impl Backtester {
    pub fn new(initial_capital: f64, fee: f64) -> Result<Self, BandtraderError> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(BandtraderError::invalid_input(format!(
                "starting balance must be positive, got {}",
                initial_capital
            )));
        }
        if !(0.0..1.0).contains(&fee) {
            return Err(BandtraderError::invalid_input(format!(
                "fee must be in [0, 1), got {}",
                fee
            )));
        }
        Ok(Backtester {
            portfolio: Portfolio::new(initial_capital),
            fee,
        })
    }

    pub fn from_config(config: &BacktestConfig) -> Result<Self, BandtraderError> {
        Backtester::new(config.initial_capital, config.fee)
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Applies one bar's transition and records its portfolio value, priced at
    /// the same close used for any fill.
    pub fn step(&mut self, timestamp: NaiveDateTime, price: f64, signal: Signal) -> f64 {
        match signal {
            Signal::Long if !self.portfolio.is_long() => self.buy(timestamp, price),
            Signal::Short if self.portfolio.is_long() => self.sell(timestamp, price),
            _ => {}
        }

        let equity = self.portfolio.total_equity(price);
        self.portfolio.record_equity(timestamp, equity);
        equity
    }

    fn buy(&mut self, timestamp: NaiveDateTime, price: f64) {
        let cash = self.portfolio.cash;
        let units = cash * (1.0 - self.fee) / price;
        self.portfolio.position = units;
        self.portfolio.cash = 0.0;

        debug!(%timestamp, price, units, "buy");
        self.portfolio.record_fill(Fill {
            timestamp,
            side: Side::Buy,
            price,
            units,
            fee_paid: cash * self.fee,
        });
    }

    fn sell(&mut self, timestamp: NaiveDateTime, price: f64) {
        let units = self.portfolio.position;
        let gross = units * price;
        self.portfolio.cash = gross * (1.0 - self.fee);
        self.portfolio.position = 0.0;

        debug!(%timestamp, price, units, cash = self.portfolio.cash, "sell");
        self.portfolio.record_fill(Fill {
            timestamp,
            side: Side::Sell,
            price,
            units,
            fee_paid: gross * self.fee,
        });
    }

    /// Consumes the simulator once every bar has been stepped.
    pub fn finish(self, signals: &[Signal]) -> BacktestResult {
        let values = self.portfolio.equity_values();
        let returns = period_returns(&values);
        let initial_balance = self.portfolio.initial_capital;
        let final_value = values.last().copied().unwrap_or(initial_balance);

        let summary = BacktestSummary {
            initial_balance,
            final_value,
            total_trades: signals.iter().filter(|s| s.is_active()).count(),
            executed_trades: self.portfolio.fills.len(),
            total_return_pct: (final_value - initial_balance) / initial_balance * 100.0,
            sharpe_ratio: simple_sharpe(&returns),
        };

        BacktestResult {
            portfolio: self.portfolio,
            returns,
            summary,
        }
    }
}

/// mean / std of the defined returns, scaled by sqrt(252). Zero when the
/// standard deviation is zero or cannot be computed.
pub fn simple_sharpe(returns: &[Option<f64>]) -> f64 {
    let defined: Vec<f64> = returns.iter().flatten().copied().collect();
    match sample_stddev(&defined) {
        Some(std) if std > 0.0 => mean(&defined) / std * SHARPE_PERIODS_PER_YEAR.sqrt(),
        _ => 0.0,
    }
}

/// Runs the simulator over aligned bars and combined signals. Bars must pass
/// [`validate_bars`]; a non-positive close would otherwise buy infinite units.
pub fn run_backtest(
    bars: &[PriceBar],
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, BandtraderError> {
    validate_bars(bars)?;
    if bars.len() != signals.len() {
        return Err(BandtraderError::invalid_input(format!(
            "{} signals for {} bars",
            signals.len(),
            bars.len()
        )));
    }

    let mut backtester = Backtester::from_config(config)?;
    for (bar, &signal) in bars.iter().zip(signals) {
        backtester.step(bar.timestamp, bar.close, signal);
    }

    Ok(backtester.finish(signals))
}
