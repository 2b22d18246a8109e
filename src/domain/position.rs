//! Executed fills and completed round trips.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed transition of the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub timestamp: NaiveDateTime,
    pub side: Side,
    pub price: f64,
    pub units: f64,
    pub fee_paid: f64,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.units * self.price
    }
}

/// A buy followed by the sell that closed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub units: f64,
    /// Cash spent on entry, fee included.
    pub cost: f64,
    /// Cash received on exit, fee deducted.
    pub proceeds: f64,
}

impl ClosedTrade {
    pub fn pnl(&self) -> f64 {
        self.proceeds - self.cost
    }

    pub fn return_pct(&self) -> f64 {
        if self.cost > 0.0 {
            self.pnl() / self.cost * 100.0
        } else {
            0.0
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl() > 0.0
    }
}
