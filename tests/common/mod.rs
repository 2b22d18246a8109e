#![allow(dead_code)]

use bandtrader::domain::error::BandtraderError;
pub use bandtrader::domain::ohlcv::PriceBar;
use bandtrader::domain::pipeline::AnnotatedSeries;
use bandtrader::ports::data_port::DataPort;
use bandtrader::ports::report_port::ReportPort;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_bars(&self) -> Result<Vec<PriceBar>, BandtraderError> {
        match &self.error {
            Some(reason) => Err(BandtraderError::Data {
                reason: reason.clone(),
            }),
            None => Ok(self.bars.clone()),
        }
    }
}

/// Records what would have been written instead of touching the disk.
#[derive(Default)]
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(PathBuf, usize)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(&self, series: &AnnotatedSeries, output_path: &Path) -> Result<(), BandtraderError> {
        self.written
            .borrow_mut()
            .push((output_path.to_path_buf(), series.len()));
        Ok(())
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start_time() + Duration::hours(i as i64), close))
        .collect()
}

pub fn make_bars_with_volume(prices: &[f64], volume: f64) -> Vec<PriceBar> {
    make_bars(prices)
        .into_iter()
        .map(|mut bar| {
            bar.volume = Some(volume);
            bar
        })
        .collect()
}

/// Bars with a high/low band of `spread` around each close.
pub fn make_bars_with_range(prices: &[f64], spread: f64) -> Vec<PriceBar> {
    make_bars(prices)
        .into_iter()
        .map(|mut bar| {
            bar.high = Some(bar.close + spread);
            bar.low = Some(bar.close - spread);
            bar
        })
        .collect()
}

/// Oscillating series that pushes z-score and RSI to both extremes.
pub fn oscillating_prices(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + (i as f64 * 0.35).sin() * 10.0 + (i as f64 * 1.7).cos() * 2.0)
        .collect()
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
