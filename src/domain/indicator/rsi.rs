//! RSI (Relative Strength Index).
//!
//! Gains and losses are averaged with a simple rolling mean over `period`
//! bars (not Wilder smoothing). The first bar has no prior close and
//! contributes a change of 0, so the first defined value sits at index
//! `period - 1`.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are 0: undefined

use crate::domain::indicator::rolling::{mean, rolling_apply};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gains = rolling_apply(&gains, period, |w| Some(mean(w)));
    let avg_losses = rolling_apply(&losses, period, |w| Some(mean(w)));

    let values = avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(gain, loss)| rsi_from_averages(gain?, loss?))
        .collect();

    IndicatorSeries::new(IndicatorType::Rsi(period), values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { None } else { Some(100.0) }
    } else {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }
}
