//! Binary trend direction from a fast/slow EMA pair.

use crate::domain::indicator::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Up when the fast EMA is strictly above the slow one; there is no
    /// neutral state.
    pub fn from_emas(fast: f64, slow: f64) -> Self {
        if fast > slow { Trend::Up } else { Trend::Down }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Trend::Up => 1,
            Trend::Down => -1,
        }
    }
}

pub fn calculate_trend(ema_short: &IndicatorSeries, ema_long: &IndicatorSeries) -> Vec<Option<Trend>> {
    (0..ema_short.len().min(ema_long.len()))
        .map(|i| Some(Trend::from_emas(ema_short.get(i)?, ema_long.get(i)?)))
        .collect()
}
