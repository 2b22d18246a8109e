//! Signal generators and their shared parameters.

pub mod breakout;
pub mod mean_reversion;

use crate::domain::indicator_helpers::IndicatorFrame;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::SignalSeries;

/// Indicator windows and rule thresholds for both signal generators.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub window: usize,
    pub z_threshold: f64,
    pub rsi_period: usize,
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub ema_short: usize,
    pub ema_long: usize,
    pub atr_window: usize,
    pub breakout_window: usize,
    pub breakout_include_current: bool,
    pub volume_filter: bool,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            window: 15,
            z_threshold: 1.2,
            rsi_period: 14,
            rsi_low: 30.0,
            rsi_high: 70.0,
            ema_short: 7,
            ema_long: 21,
            atr_window: 10,
            breakout_window: 20,
            breakout_include_current: true,
            volume_filter: true,
        }
    }
}

impl StrategyParams {
    /// Longest lookback any indicator needs before it is defined.
    pub fn max_window(&self) -> usize {
        [
            self.window,
            self.rsi_period,
            self.atr_window + 1,
            self.breakout_window + usize::from(!self.breakout_include_current),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// A rule set mapping indicator values to one signal per bar.
pub trait SignalGenerator {
    fn name(&self) -> &str;

    /// Must return a series aligned with `bars`.
    fn generate(&self, bars: &[PriceBar], indicators: &IndicatorFrame) -> SignalSeries;
}
