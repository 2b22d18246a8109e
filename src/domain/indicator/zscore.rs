//! Z-score of price against its rolling mean.
//!
//! z[i] = (C[i] - SMA(n)[i]) / STDDEV(n)[i]
//! Undefined while either input is undefined, and when the stddev is zero.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_zscore(
    closes: &[f64],
    rolling_mean: &IndicatorSeries,
    rolling_std: &IndicatorSeries,
    period: usize,
) -> IndicatorSeries {
    let values = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let mean = rolling_mean.get(i)?;
            let std = rolling_std.get(i)?;
            if std == 0.0 {
                None
            } else {
                Some((close - mean) / std)
            }
        })
        .collect();

    IndicatorSeries::new(IndicatorType::ZScore(period), values)
}
