//! Technical indicator implementations.
//!
//! Every indicator produces an [`IndicatorSeries`] aligned with its input:
//! same length, with `None` wherever not enough history exists yet. Undefined
//! values are never replaced by a placeholder number.

pub mod atr;
pub mod ema;
pub mod rolling;
pub mod rsi;
pub mod trend;
pub mod zscore;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Stddev(usize),
    ZScore(usize),
    Rsi(usize),
    Ema(usize),
    Atr(usize),
    RollingHigh(usize),
    RollingLow(usize),
    VolumeSma(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Vec<Option<f64>>) -> Self {
        IndicatorSeries {
            indicator_type,
            values,
        }
    }

    /// A series of the given length with no defined values.
    pub fn undefined(indicator_type: IndicatorType, len: usize) -> Self {
        IndicatorSeries::new(indicator_type, vec![None; len])
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of leading undefined entries.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::ZScore(period) => write!(f, "ZSCORE({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::RollingHigh(period) => write!(f, "HIGH({})", period),
            IndicatorType::RollingLow(period) => write!(f, "LOW({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
        assert_eq!(IndicatorType::RollingHigh(20).to_string(), "HIGH(20)");
        assert_eq!(IndicatorType::VolumeSma(15).to_string(), "VOLUME_SMA(15)");
    }

    #[test]
    fn series_get_out_of_range_is_none() {
        let series = IndicatorSeries::new(IndicatorType::Sma(2), vec![None, Some(1.5)]);
        assert_eq!(series.get(0), None);
        assert_eq!(series.get(1), Some(1.5));
        assert_eq!(series.get(2), None);
    }

    #[test]
    fn series_warmup_counts_leading_none() {
        let series =
            IndicatorSeries::new(IndicatorType::Sma(3), vec![None, None, Some(1.0), None]);
        assert_eq!(series.warmup(), 2);
        assert_eq!(IndicatorSeries::undefined(IndicatorType::Sma(3), 4).warmup(), 4);
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Ema(7), "short");
        map.insert(IndicatorType::Ema(21), "long");

        assert_eq!(map.get(&IndicatorType::Ema(7)), Some(&"short"));
        assert_eq!(map.get(&IndicatorType::Ema(21)), Some(&"long"));
        assert_eq!(map.get(&IndicatorType::Sma(7)), None);
    }
}
