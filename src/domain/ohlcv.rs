//! Price bar representation and input validation.

use crate::domain::error::BandtraderError;
use chrono::NaiveDateTime;

/// One entry of a time-ordered price series. Only `close` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        PriceBar {
            timestamp,
            close,
            high: None,
            low: None,
            volume: None,
        }
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    ///
    /// `None` when the bar carries no high/low range.
    pub fn true_range(&self, prev_close: f64) -> Option<f64> {
        let (high, low) = (self.high?, self.low?);
        let hl = high - low;
        let hc = (high - prev_close).abs();
        let lc = (low - prev_close).abs();
        Some(hl.max(hc).max(lc))
    }

    pub fn has_range(&self) -> bool {
        self.high.is_some() && self.low.is_some()
    }
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Checks the input contract: non-empty, strictly increasing timestamps and
/// finite positive closes.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), BandtraderError> {
    if bars.is_empty() {
        return Err(BandtraderError::invalid_input("price series is empty"));
    }

    for (i, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(BandtraderError::invalid_input(format!(
                "close at {} must be a positive number, got {}",
                bar.timestamp, bar.close
            )));
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(BandtraderError::invalid_input(format!(
                "timestamps must be strictly increasing: {} follows {}",
                bar.timestamp,
                bars[i - 1].timestamp
            )));
        }
    }

    Ok(())
}
