//! CSV file adapter: loads price bars and writes annotated results.

use crate::domain::error::BandtraderError;
use crate::domain::metrics::PORTFOLIO_VALUE_COLUMN;
use crate::domain::ohlcv::PriceBar;
use crate::domain::pipeline::AnnotatedSeries;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

const TIMESTAMP_COLUMNS: [&str; 4] = ["timestamp", "time", "datetime", "date"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn data_err(reason: impl Into<String>) -> BandtraderError {
    BandtraderError::Data {
        reason: reason.into(),
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, BandtraderError> {
    csv::Reader::from_path(path)
        .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Accepts unix seconds, ISO-like date-times, or plain dates (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_optional(
    record: &csv::StringRecord,
    index: Option<usize>,
    name: &str,
    row: usize,
) -> Result<Option<f64>, BandtraderError> {
    let Some(raw) = index.and_then(|i| record.get(i)).map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| data_err(format!("invalid {} value '{}' on row {}: {}", name, raw, row, e)))
}

impl DataPort for CsvAdapter {
    fn load_bars(&self) -> Result<Vec<PriceBar>, BandtraderError> {
        let mut rdr = open_reader(&self.path)?;
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?
            .clone();

        let ts_idx = TIMESTAMP_COLUMNS
            .iter()
            .find_map(|name| column_index(&headers, name))
            .ok_or_else(|| BandtraderError::missing_column("timestamp"))?;
        let close_idx =
            column_index(&headers, "close").ok_or_else(|| BandtraderError::missing_column("close"))?;
        let high_idx = column_index(&headers, "high");
        let low_idx = column_index(&headers, "low");
        let volume_idx = column_index(&headers, "volume");

        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;
            let row = row + 1;

            let ts_str = record
                .get(ts_idx)
                .ok_or_else(|| data_err(format!("missing timestamp on row {}", row)))?;
            let timestamp = parse_timestamp(ts_str)
                .ok_or_else(|| data_err(format!("invalid timestamp '{}' on row {}", ts_str, row)))?;

            let close = parse_optional(&record, Some(close_idx), "close", row)?
                .ok_or_else(|| data_err(format!("missing close on row {}", row)))?;

            bars.push(PriceBar {
                timestamp,
                close,
                high: parse_optional(&record, high_idx, "high", row)?,
                low: parse_optional(&record, low_idx, "low", row)?,
                volume: parse_optional(&record, volume_idx, "volume", row)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

/// Reads one numeric column from a results file. `Ok(None)` when the header
/// lacks the column; every row must carry a value.
pub fn read_column(path: &Path, name: &str) -> Result<Option<Vec<f64>>, BandtraderError> {
    let mut rdr = open_reader(path)?;
    let headers = rdr
        .headers()
        .map_err(|e| data_err(format!("CSV header error: {}", e)))?
        .clone();
    let Some(idx) = column_index(&headers, name) else {
        return Ok(None);
    };

    let mut values = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;
        let row = row + 1;
        let value = parse_optional(&record, Some(idx), name, row)?
            .ok_or_else(|| data_err(format!("missing {} on row {}", name, row)))?;
        values.push(value);
    }
    Ok(Some(values))
}

pub fn read_portfolio_values(path: &Path) -> Result<Option<Vec<f64>>, BandtraderError> {
    read_column(path, PORTFOLIO_VALUE_COLUMN)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvAdapter {
    fn write(&self, series: &AnnotatedSeries, output_path: &Path) -> Result<(), BandtraderError> {
        let mut wtr = csv::Writer::from_path(output_path)
            .map_err(|e| data_err(format!("failed to create {}: {}", output_path.display(), e)))?;

        let mut header: Vec<String> = [
            "timestamp",
            "close",
            "high",
            "low",
            "volume",
            "rolling_mean",
            "rolling_std",
            "z_score",
            "rsi",
            "ema_short",
            "ema_long",
            "atr",
            "trend",
            "recent_high",
            "recent_low",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        header.extend(series.sources.iter().map(|s| format!("{}_signal", s.source)));
        header.extend(
            ["signal", PORTFOLIO_VALUE_COLUMN, "daily_returns"]
                .iter()
                .map(|s| s.to_string()),
        );

        wtr.write_record(&header)
            .map_err(|e| data_err(format!("CSV write error: {}", e)))?;

        for (i, bar) in series.bars.iter().enumerate() {
            let snap = series.indicators.snapshot(i);
            let mut record = vec![
                bar.timestamp.format(OUTPUT_TIME_FORMAT).to_string(),
                bar.close.to_string(),
                fmt_opt(bar.high),
                fmt_opt(bar.low),
                fmt_opt(bar.volume),
                fmt_opt(snap.rolling_mean),
                fmt_opt(snap.rolling_std),
                fmt_opt(snap.z_score),
                fmt_opt(snap.rsi),
                fmt_opt(snap.ema_short),
                fmt_opt(snap.ema_long),
                fmt_opt(snap.atr),
                snap.trend.map(|t| t.as_i8().to_string()).unwrap_or_default(),
                fmt_opt(snap.rolling_high),
                fmt_opt(snap.rolling_low),
            ];
            for source in &series.sources {
                record.push(
                    source
                        .values
                        .get(i)
                        .copied()
                        .flatten()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                );
            }
            record.push(
                series
                    .combined
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            );
            record.push(fmt_opt(series.portfolio_values.get(i).copied()));
            record.push(fmt_opt(series.returns.get(i).copied().flatten()));

            wtr.write_record(&record)
                .map_err(|e| data_err(format!("CSV write error: {}", e)))?;
        }

        wtr.flush()?;
        Ok(())
    }
}
