//! Fixed-window rolling statistics.
//!
//! Windows are positional: entry `i` covers inputs `i+1-period ..= i`. A window
//! is undefined until it is full, and undefined if any input inside it is.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Applies `f` to every full window of defined values.
pub fn rolling_apply<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = Vec::with_capacity(values.len());
    let mut window: Vec<f64> = Vec::with_capacity(period);

    for i in 0..values.len() {
        if period == 0 || i + 1 < period {
            out.push(None);
            continue;
        }

        window.clear();
        for value in &values[i + 1 - period..=i] {
            match value {
                Some(v) => window.push(*v),
                None => break,
            }
        }

        if window.len() == period {
            out.push(f(&window));
        } else {
            out.push(None);
        }
    }

    out
}

pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (n - 1 denominator). `None` below two points.
pub fn sample_stddev(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let m = mean(window);
    let variance = window.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    Some(variance.sqrt())
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

pub fn calculate_sma(values: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Sma(period),
        rolling_apply(&defined(values), period, |w| Some(mean(w))),
    )
}

pub fn calculate_stddev(values: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Stddev(period),
        rolling_apply(&defined(values), period, sample_stddev),
    )
}

pub fn calculate_rolling_high(values: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::RollingHigh(period),
        rolling_apply(&defined(values), period, |w| {
            w.iter().copied().reduce(f64::max)
        }),
    )
}

pub fn calculate_rolling_low(values: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::RollingLow(period),
        rolling_apply(&defined(values), period, |w| {
            w.iter().copied().reduce(f64::min)
        }),
    )
}

/// Rolling mean of an optional column such as volume.
pub fn calculate_volume_sma(volumes: &[Option<f64>], period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::VolumeSma(period),
        rolling_apply(volumes, period, |w| Some(mean(w))),
    )
}
