//! Discrete trade signals.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Long,
    #[default]
    Flat,
    Short,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Flat => 0,
            Signal::Short => -1,
        }
    }

    /// Maps any integer onto a signal by sign, i.e. clips to [-1, 1].
    pub fn from_clipped(sum: i32) -> Self {
        match sum.clamp(-1, 1) {
            1 => Signal::Long,
            -1 => Signal::Short,
            _ => Signal::Flat,
        }
    }

    pub fn is_active(self) -> bool {
        self != Signal::Flat
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Signals emitted by one source, aligned with the price series. `None`
/// marks bars where the source had no opinion.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub source: String,
    pub values: Vec<Option<Signal>>,
}

impl SignalSeries {
    pub fn new(source: impl Into<String>, values: Vec<Option<Signal>>) -> Self {
        SignalSeries {
            source: source.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Signal at `index`, with "no signal" read as Flat.
    pub fn signal_or_flat(&self, index: usize) -> Signal {
        self.values.get(index).copied().flatten().unwrap_or_default()
    }
}
