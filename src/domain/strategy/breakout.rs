//! Breakout (momentum) signals from rolling highs and lows.
//!
//! Long when the close exceeds the rolling high of `window` bars, Short when
//! it falls below the rolling low. By default the window includes the current
//! bar. Warm-up bars resolve to Flat; this source never reports "no signal".

use crate::domain::indicator::rolling::{calculate_rolling_high, calculate_rolling_low};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator_helpers::IndicatorFrame;
use crate::domain::ohlcv::{PriceBar, closes};
use crate::domain::signal::{Signal, SignalSeries};
use crate::domain::strategy::{SignalGenerator, StrategyParams};

pub const SOURCE_NAME: &str = "momentum";

#[derive(Debug, Clone, PartialEq)]
pub struct Breakout {
    pub window: usize,
    pub include_current: bool,
}

impl Breakout {
    pub fn from_params(params: &StrategyParams) -> Self {
        Breakout {
            window: params.breakout_window,
            include_current: params.breakout_include_current,
        }
    }

    fn classify(close: f64, high: Option<f64>, low: Option<f64>) -> Signal {
        match (high, low) {
            (Some(h), _) if close > h => Signal::Long,
            (_, Some(l)) if close < l => Signal::Short,
            _ => Signal::Flat,
        }
    }

    /// Channel of the `window` bars strictly before each bar.
    fn prior_channel(&self, bars: &[PriceBar]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let closes = closes(bars);
        let shift = |series: IndicatorSeries| -> Vec<Option<f64>> {
            std::iter::once(None)
                .chain(series.values.into_iter())
                .take(closes.len())
                .collect()
        };
        (
            shift(calculate_rolling_high(&closes, self.window)),
            shift(calculate_rolling_low(&closes, self.window)),
        )
    }
}

impl SignalGenerator for Breakout {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn generate(&self, bars: &[PriceBar], indicators: &IndicatorFrame) -> SignalSeries {
        let (highs, lows) = if self.include_current {
            (
                indicators.rolling_high.values.clone(),
                indicators.rolling_low.values.clone(),
            )
        } else {
            self.prior_channel(bars)
        };

        let values = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let high = highs.get(i).copied().flatten();
                let low = lows.get(i).copied().flatten();
                Some(Self::classify(bar.close, high, low))
            })
            .collect();

        SignalSeries::new(SOURCE_NAME, values)
    }
}
