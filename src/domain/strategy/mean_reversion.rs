//! Mean reversion with Bollinger-style bands and a trend filter.
//!
//! Long when price sits below `mean - z * std`, RSI is oversold and the trend
//! is up. Short when price sits above `mean + z * std`, RSI is overbought and
//! the trend is down. All three conditions are required.

use crate::domain::indicator::trend::Trend;
use crate::domain::indicator_helpers::{IndicatorFrame, IndicatorSnapshot};
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{Signal, SignalSeries};
use crate::domain::strategy::{SignalGenerator, StrategyParams};

pub const SOURCE_NAME: &str = "mean_reversion";

/// Volume below this fraction of its rolling mean suppresses any signal.
pub const MIN_VOLUME_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct MeanReversion {
    pub z_threshold: f64,
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub volume_filter: bool,
}

impl MeanReversion {
    pub fn from_params(params: &StrategyParams) -> Self {
        MeanReversion {
            z_threshold: params.z_threshold,
            rsi_low: params.rsi_low,
            rsi_high: params.rsi_high,
            volume_filter: params.volume_filter,
        }
    }

    /// Band/RSI/trend rule for one bar. `None` while any input is undefined.
    pub fn classify(&self, close: f64, snap: &IndicatorSnapshot) -> Option<Signal> {
        let mean = snap.rolling_mean?;
        let std = snap.rolling_std?;
        let rsi = snap.rsi?;
        let trend = snap.trend?;

        let lower = mean - self.z_threshold * std;
        let upper = mean + self.z_threshold * std;

        let signal = if close < lower && rsi < self.rsi_low && trend == Trend::Up {
            Signal::Long
        } else if close > upper && rsi > self.rsi_high && trend == Trend::Down {
            Signal::Short
        } else {
            Signal::Flat
        };
        Some(signal)
    }

    /// True when the bar lacks conviction: volume under half its rolling mean,
    /// or no traded volume in the window at all.
    pub fn low_volume(volume: Option<f64>, volume_mean: Option<f64>) -> bool {
        match (volume, volume_mean) {
            (Some(v), Some(avg)) => avg <= 0.0 || v < avg * MIN_VOLUME_RATIO,
            _ => false,
        }
    }
}

impl SignalGenerator for MeanReversion {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn generate(&self, bars: &[PriceBar], indicators: &IndicatorFrame) -> SignalSeries {
        let values = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let snap = indicators.snapshot(i);
                if self.volume_filter && Self::low_volume(bar.volume, snap.volume_mean) {
                    return Some(Signal::Flat);
                }
                self.classify(bar.close, &snap)
            })
            .collect();

        SignalSeries::new(SOURCE_NAME, values)
    }
}
