//! Plain-text summaries for the terminal.

use std::fmt::Write;

use crate::domain::backtest::BacktestSummary;
use crate::domain::metrics::PerformanceReport;
use crate::domain::pipeline::AnnotatedSeries;
use crate::domain::signal::Signal;

pub const Z_SCORE_BAND: f64 = 1.5;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

pub fn z_score_label(z: Option<f64>) -> &'static str {
    match z {
        None => "n/a",
        Some(z) if z <= -Z_SCORE_BAND => "bullish",
        Some(z) if z <= Z_SCORE_BAND => "neutral",
        Some(_) => "bearish",
    }
}

pub fn rsi_label(rsi: Option<f64>) -> &'static str {
    match rsi {
        None => "n/a",
        Some(r) if r <= RSI_OVERSOLD => "oversold",
        Some(r) if r <= RSI_OVERBOUGHT => "neutral",
        Some(_) => "overbought",
    }
}

pub fn signal_label(signal: Signal) -> &'static str {
    match signal {
        Signal::Long => "buy",
        Signal::Short => "sell",
        Signal::Flat => "hold",
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_backtest_summary(summary: &BacktestSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Backtest Results ===");
    let _ = writeln!(out, "Initial Portfolio Value: {:.2}", summary.initial_balance);
    let _ = writeln!(out, "Final Portfolio Value:   {:.2}", summary.final_value);
    let _ = writeln!(out, "Total Trades:            {}", summary.total_trades);
    let _ = writeln!(out, "Executed Trades:         {}", summary.executed_trades);
    let _ = writeln!(out, "Total Return:            {:.2}%", summary.total_return_pct);
    let _ = writeln!(out, "Sharpe Ratio:            {:.2}", summary.sharpe_ratio);
    out
}

pub fn format_performance_report(report: &PerformanceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Performance ===");
    let _ = writeln!(out, "Total Return:          {:.2}%", report.total_return);
    let _ = writeln!(out, "Annualized Return:     {:.2}%", report.annualized_return);
    let _ = writeln!(out, "Annualized Volatility: {:.2}%", report.annualized_volatility);
    let _ = writeln!(out, "Sharpe Ratio:          {:.2}", report.sharpe_ratio);
    let _ = writeln!(out, "Max Drawdown:          {:.2}%", report.max_drawdown);
    out
}

/// The last `count` rows with z-score, RSI and signal labels.
pub fn format_tail(series: &AnnotatedSeries, count: usize) -> String {
    let mut out = String::new();
    let start = series.len().saturating_sub(count);

    let _ = writeln!(
        out,
        "{:<20} {:>12} {:>8} {:<8} {:>7} {:<10} {:>6} {:<4} {:>14}",
        "timestamp", "close", "z", "", "rsi", "", "signal", "", "portfolio"
    );
    for i in start..series.len() {
        let bar = &series.bars[i];
        let snap = series.indicators.snapshot(i);
        let signal = series.combined.get(i).copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<20} {:>12.4} {:>8} {:<8} {:>7} {:<10} {:>6} {:<4} {:>14}",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.close,
            fmt_opt(snap.z_score, 2),
            z_score_label(snap.z_score),
            fmt_opt(snap.rsi, 1),
            rsi_label(snap.rsi),
            signal.value(),
            signal_label(signal),
            fmt_opt(series.portfolio_values.get(i).copied(), 2),
        );
    }
    out
}
