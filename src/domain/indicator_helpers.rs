//! Materialized indicator columns for a whole price series.

use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::rolling::{
    calculate_rolling_high, calculate_rolling_low, calculate_sma, calculate_stddev,
    calculate_volume_sma,
};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::trend::{Trend, calculate_trend};
use crate::domain::indicator::zscore::calculate_zscore;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{PriceBar, closes};
use crate::domain::strategy::StrategyParams;

/// Struct-of-arrays holding every indicator column, aligned with the bars it
/// was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub rolling_mean: IndicatorSeries,
    pub rolling_std: IndicatorSeries,
    pub z_score: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub ema_short: IndicatorSeries,
    pub ema_long: IndicatorSeries,
    pub atr: IndicatorSeries,
    pub trend: Vec<Option<Trend>>,
    pub rolling_high: IndicatorSeries,
    pub rolling_low: IndicatorSeries,
    pub volume_mean: IndicatorSeries,
}

/// Per-bar view of an [`IndicatorFrame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub z_score: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub atr: Option<f64>,
    pub trend: Option<Trend>,
    pub rolling_high: Option<f64>,
    pub rolling_low: Option<f64>,
    pub volume_mean: Option<f64>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rolling_mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolling_mean.is_empty()
    }

    pub fn snapshot(&self, index: usize) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rolling_mean: self.rolling_mean.get(index),
            rolling_std: self.rolling_std.get(index),
            z_score: self.z_score.get(index),
            rsi: self.rsi.get(index),
            ema_short: self.ema_short.get(index),
            ema_long: self.ema_long.get(index),
            atr: self.atr.get(index),
            trend: self.trend.get(index).copied().flatten(),
            rolling_high: self.rolling_high.get(index),
            rolling_low: self.rolling_low.get(index),
            volume_mean: self.volume_mean.get(index),
        }
    }

    /// Every indicator column identified by its type, in a stable order.
    pub fn series(&self) -> Vec<&IndicatorSeries> {
        vec![
            &self.rolling_mean,
            &self.rolling_std,
            &self.z_score,
            &self.rsi,
            &self.ema_short,
            &self.ema_long,
            &self.atr,
            &self.rolling_high,
            &self.rolling_low,
            &self.volume_mean,
        ]
    }

    pub fn find(&self, indicator_type: IndicatorType) -> Option<&IndicatorSeries> {
        self.series()
            .into_iter()
            .find(|s| s.indicator_type == indicator_type)
    }
}

/// Computes all indicators the strategies need. Never fails: a series shorter
/// than a window simply leaves that column undefined.
pub fn compute_indicators(bars: &[PriceBar], params: &StrategyParams) -> IndicatorFrame {
    let closes = closes(bars);
    let volumes: Vec<Option<f64>> = bars.iter().map(|b| b.volume).collect();

    let rolling_mean = calculate_sma(&closes, params.window);
    let rolling_std = calculate_stddev(&closes, params.window);
    let z_score = calculate_zscore(&closes, &rolling_mean, &rolling_std, params.window);
    let ema_short = calculate_ema(&closes, params.ema_short);
    let ema_long = calculate_ema(&closes, params.ema_long);
    let trend = calculate_trend(&ema_short, &ema_long);

    IndicatorFrame {
        rsi: calculate_rsi(&closes, params.rsi_period),
        atr: calculate_atr(bars, params.atr_window),
        rolling_high: calculate_rolling_high(&closes, params.breakout_window),
        rolling_low: calculate_rolling_low(&closes, params.breakout_window),
        volume_mean: calculate_volume_sma(&volumes, params.window),
        rolling_mean,
        rolling_std,
        z_score,
        ema_short,
        ema_long,
        trend,
    }
}
