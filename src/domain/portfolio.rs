//! Single-asset portfolio state and equity tracking.

use chrono::NaiveDateTime;

use super::position::{ClosedTrade, Fill, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Cash plus a long-only holding of one asset. Owned and mutated only by the
/// backtest simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    /// Units of the asset held; zero or positive.
    pub position: f64,
    pub initial_capital: f64,
    pub fills: Vec<Fill>,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            position: 0.0,
            initial_capital,
            fills: Vec::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position > 0.0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        if self.is_long() {
            self.position * price
        } else {
            0.0
        }
    }

    pub fn total_equity(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    /// Records a fill and, for a sell, pairs it with the open buy.
    pub fn record_fill(&mut self, fill: Fill) {
        if fill.side == Side::Sell {
            if let Some(entry) = self.fills.iter().rev().find(|f| f.side == Side::Buy) {
                self.closed_trades.push(ClosedTrade {
                    entry_time: entry.timestamp,
                    exit_time: fill.timestamp,
                    entry_price: entry.price,
                    exit_price: fill.price,
                    units: fill.units,
                    cost: entry.notional() + entry.fee_paid,
                    proceeds: fill.notional() - fill.fee_paid,
                });
            }
        }
        self.fills.push(fill);
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.equity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.cash - 10_000.0).abs() < f64::EPSILON);
        assert!((portfolio.initial_capital - 10_000.0).abs() < f64::EPSILON);
        assert!(!portfolio.is_long());
        assert!(portfolio.fills.is_empty());
        assert!(portfolio.equity_curve.is_empty());
    }

    #[test]
    fn total_equity_flat() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.total_equity(123.0) - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_equity_uses_market_value() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.cash = 0.0;
        portfolio.position = 100.0;
        assert!((portfolio.total_equity(105.0) - 10_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sell_fill_closes_trade() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.record_fill(Fill {
            timestamp: ts(1),
            side: Side::Buy,
            price: 100.0,
            units: 99.0,
            fee_paid: 100.0,
        });
        assert!(portfolio.closed_trades.is_empty());

        portfolio.record_fill(Fill {
            timestamp: ts(2),
            side: Side::Sell,
            price: 110.0,
            units: 99.0,
            fee_paid: 10.89,
        });

        assert_eq!(portfolio.fills.len(), 2);
        assert_eq!(portfolio.closed_trades.len(), 1);
        let trade = &portfolio.closed_trades[0];
        assert!((trade.cost - 10_000.0).abs() < 1e-9);
        assert!((trade.proceeds - (10_890.0 - 10.89)).abs() < 1e-9);
        assert_eq!(trade.entry_time, ts(1));
        assert_eq!(trade.exit_time, ts(2));
    }

    #[test]
    fn record_equity() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.record_equity(ts(15), 10_500.0);
        assert_eq!(portfolio.equity_curve.len(), 1);
        assert_eq!(portfolio.equity_curve[0].timestamp, ts(15));
        assert_eq!(portfolio.equity_values(), vec![10_500.0]);
    }
}
