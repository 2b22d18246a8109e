//! End-to-end run: price series → indicators → per-source signals →
//! combined signal → simulated portfolio → summary metrics.
//!
//! Each stage consumes the previous stage's output immutably; the only
//! mutable state is the portfolio inside the simulator.

use tracing::{debug, info, warn};

use crate::domain::backtest::{BacktestConfig, BacktestResult, BacktestSummary, run_backtest};
use crate::domain::combiner::combine;
use crate::domain::error::BandtraderError;
use crate::domain::indicator_helpers::{IndicatorFrame, compute_indicators};
use crate::domain::metrics::PerformanceReport;
use crate::domain::ohlcv::{PriceBar, validate_bars};
use crate::domain::signal::{Signal, SignalSeries};
use crate::domain::strategy::breakout::Breakout;
use crate::domain::strategy::mean_reversion::MeanReversion;
use crate::domain::strategy::{SignalGenerator, StrategyParams};

/// The input series with every derived column attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSeries {
    pub bars: Vec<PriceBar>,
    pub indicators: IndicatorFrame,
    pub sources: Vec<SignalSeries>,
    pub combined: Vec<Signal>,
    pub portfolio_values: Vec<f64>,
    pub returns: Vec<Option<f64>>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn source(&self, name: &str) -> Option<&SignalSeries> {
        self.sources.iter().find(|s| s.source == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub series: AnnotatedSeries,
    pub backtest: BacktestResult,
    pub report: PerformanceReport,
}

impl PipelineOutput {
    pub fn summary(&self) -> &BacktestSummary {
        &self.backtest.summary
    }
}

pub fn default_generators(params: &StrategyParams) -> Vec<Box<dyn SignalGenerator>> {
    vec![
        Box::new(MeanReversion::from_params(params)),
        Box::new(Breakout::from_params(params)),
    ]
}

pub fn run_pipeline(
    bars: Vec<PriceBar>,
    params: &StrategyParams,
    config: &BacktestConfig,
) -> Result<PipelineOutput, BandtraderError> {
    run_pipeline_with(bars, params, config, &default_generators(params))
}

pub fn run_pipeline_with(
    bars: Vec<PriceBar>,
    params: &StrategyParams,
    config: &BacktestConfig,
    generators: &[Box<dyn SignalGenerator>],
) -> Result<PipelineOutput, BandtraderError> {
    validate_bars(&bars)?;

    if bars.len() < params.max_window() {
        warn!(
            bars = bars.len(),
            needed = params.max_window(),
            "series shorter than the longest indicator window; some signals stay undefined"
        );
    }

    info!(bars = bars.len(), "computing indicators");
    let indicators = compute_indicators(&bars, params);

    let sources: Vec<SignalSeries> = generators
        .iter()
        .map(|g| g.generate(&bars, &indicators))
        .collect();
    for source in &sources {
        let active = source.values.iter().flatten().filter(|s| s.is_active()).count();
        info!(source = %source.source, active, "generated signals");
    }

    let combined = combine(&sources)?;

    info!(
        initial_capital = config.initial_capital,
        fee = config.fee,
        "running backtest"
    );
    let backtest = run_backtest(&bars, &combined, config)?;
    for trade in &backtest.portfolio.closed_trades {
        debug!(
            entry = %trade.entry_time,
            exit = %trade.exit_time,
            pnl = trade.pnl(),
            return_pct = trade.return_pct(),
            "closed trade"
        );
    }
    let portfolio_values = backtest.portfolio_values();

    let report =
        PerformanceReport::compute(&portfolio_values, config.risk_free_rate, config.annualization)?;

    let series = AnnotatedSeries {
        bars,
        indicators,
        sources,
        combined,
        returns: backtest.returns.clone(),
        portfolio_values,
    };

    Ok(PipelineOutput {
        series,
        backtest,
        report,
    })
}
