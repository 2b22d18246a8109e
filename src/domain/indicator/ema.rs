//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close: EMA[0] = C[0],
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Defined from the first bar.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(closes: &[f64], span: usize) -> IndicatorSeries {
    if span == 0 {
        return IndicatorSeries::undefined(IndicatorType::Ema(span), closes.len());
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(closes.len());
    let mut ema: Option<f64> = None;

    for &close in closes {
        let next = match ema {
            None => close,
            Some(prev) => close * k + prev * (1.0 - k),
        };
        ema = Some(next);
        values.push(ema);
    }

    IndicatorSeries::new(IndicatorType::Ema(span), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seeded_with_first_close() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_eq!(series.warmup(), 0);
        assert_relative_eq!(series.get(0).unwrap(), 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        let k = 2.0 / 4.0;
        let ema1 = 20.0 * k + 10.0 * (1.0 - k);
        let ema2 = 30.0 * k + ema1 * (1.0 - k);
        assert_relative_eq!(series.get(1).unwrap(), ema1);
        assert_relative_eq!(series.get(2).unwrap(), ema2);
    }

    #[test]
    fn ema_span_1_tracks_price() {
        let series = calculate_ema(&[10.0, 20.0, 5.0], 1);
        assert_eq!(series.values, vec![Some(10.0), Some(20.0), Some(5.0)]);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 5], 3);
        for value in series.values.iter().flatten() {
            assert_relative_eq!(*value, 100.0);
        }
    }

    #[test]
    fn ema_span_zero_is_undefined() {
        let series = calculate_ema(&[10.0, 20.0], 0);
        assert_eq!(series.values, vec![None, None]);
        assert_eq!(series.indicator_type, IndicatorType::Ema(0));
    }

    #[test]
    fn ema_empty() {
        assert!(calculate_ema(&[], 3).is_empty());
    }
}
