//! Average True Range.
//!
//! ATR is the simple rolling mean of True Range. True Range needs the prior
//! close, so it is undefined at bar 0. When the series has no high/low range
//! at all, ATR degrades to the constant 1.0 meaning "no volatility filter".

use crate::domain::indicator::rolling::{mean, rolling_apply};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub const ATR_UNAVAILABLE: f64 = 1.0;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if !bars.iter().all(PriceBar::has_range) {
        return IndicatorSeries::new(IndicatorType::Atr(period), vec![Some(ATR_UNAVAILABLE); bars.len()]);
    }

    let true_ranges: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                None
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    IndicatorSeries::new(
        IndicatorType::Atr(period),
        rolling_apply(&true_ranges, period, |w| Some(mean(w))),
    )
}
