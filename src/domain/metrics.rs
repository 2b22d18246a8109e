//! Performance metrics over a finished portfolio-value series.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::BandtraderError;
use crate::domain::indicator::rolling::sample_stddev;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const HOURS_PER_DAY: f64 = 24.0;
pub const PORTFOLIO_VALUE_COLUMN: &str = "portfolio_value";

/// How many periods make up one year when annualizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annualization {
    /// 252 periods per year.
    TradingDays,
    /// Series indexed by hour: the period count is `bars / 24`.
    HourlyIndex,
    Custom(f64),
}

impl Annualization {
    pub fn periods_per_year(self, bars: usize) -> f64 {
        match self {
            Annualization::TradingDays => TRADING_DAYS_PER_YEAR,
            Annualization::HourlyIndex => bars as f64 / HOURS_PER_DAY,
            Annualization::Custom(periods) => periods,
        }
    }
}

impl fmt::Display for Annualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annualization::TradingDays => write!(f, "trading_days"),
            Annualization::HourlyIndex => write!(f, "hourly"),
            Annualization::Custom(periods) => write!(f, "{}", periods),
        }
    }
}

impl FromStr for Annualization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trading_days" | "daily" => Ok(Annualization::TradingDays),
            "hourly" | "hour" => Ok(Annualization::HourlyIndex),
            other => match other.parse::<f64>() {
                Ok(periods) if periods.is_finite() && periods > 0.0 => {
                    Ok(Annualization::Custom(periods))
                }
                _ => Err(format!(
                    "expected trading_days, hourly or a positive number, got '{}'",
                    s
                )),
            },
        }
    }
}

/// Summary statistics. Return, volatility and drawdown figures are percents.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl PerformanceReport {
    /// Computes the report from an optional portfolio-value column, failing
    /// when the column is absent.
    pub fn from_column(
        values: Option<&[f64]>,
        risk_free_rate: f64,
        annualization: Annualization,
    ) -> Result<Self, BandtraderError> {
        let values = values.ok_or_else(|| BandtraderError::missing_column(PORTFOLIO_VALUE_COLUMN))?;
        Self::compute(values, risk_free_rate, annualization)
    }

    pub fn compute(
        values: &[f64],
        risk_free_rate: f64,
        annualization: Annualization,
    ) -> Result<Self, BandtraderError> {
        let (Some(&initial), Some(&last)) = (values.first(), values.last()) else {
            return Err(BandtraderError::invalid_input("portfolio value series is empty"));
        };
        if initial <= 0.0 {
            return Err(BandtraderError::invalid_input(format!(
                "initial portfolio value must be positive, got {}",
                initial
            )));
        }

        let total_return = (last - initial) / initial;
        let periods = annualization.periods_per_year(values.len());
        let annualized_return = (1.0 + total_return).powf(periods / values.len() as f64) - 1.0;

        let returns: Vec<f64> = period_returns(values).into_iter().flatten().collect();
        let annualized_volatility = sample_stddev(&returns)
            .map(|std| std * periods.sqrt())
            .filter(|v| v.is_finite());

        let sharpe_ratio = match annualized_volatility {
            Some(vol) if vol > 0.0 => (annualized_return - risk_free_rate) / vol,
            _ => 0.0,
        };

        Ok(PerformanceReport {
            total_return: total_return * 100.0,
            annualized_return: annualized_return * 100.0,
            annualized_volatility: annualized_volatility.unwrap_or(0.0) * 100.0,
            sharpe_ratio,
            max_drawdown: max_drawdown(values) * 100.0,
        })
    }
}

/// Bar-over-bar fractional change. `None` for the first bar and after a zero
/// value.
pub fn period_returns(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|w| {
            if w[0] != 0.0 {
                Some((w[1] - w[0]) / w[0])
            } else {
                None
            }
        }))
        .take(values.len())
        .collect()
}

/// Minimum over time of (value - running peak) / running peak; zero or
/// negative.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for &value in values {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.min((value - peak) / peak);
        }
    }

    worst
}
