//! Merges several signal sources into one bounded decision per bar.

use crate::domain::error::BandtraderError;
use crate::domain::signal::{Signal, SignalSeries};

/// Sums the sources bar by bar and clips to [-1, 1]. Undefined source values
/// count as 0, so agreeing sources still yield a single unit and opposing
/// sources cancel.
pub fn combine(sources: &[SignalSeries]) -> Result<Vec<Signal>, BandtraderError> {
    let Some(first) = sources.first() else {
        return Ok(Vec::new());
    };

    if let Some(bad) = sources.iter().find(|s| s.len() != first.len()) {
        return Err(BandtraderError::invalid_input(format!(
            "signal source {} has {} bars, expected {}",
            bad.source,
            bad.len(),
            first.len()
        )));
    }

    let combined = (0..first.len())
        .map(|i| {
            let sum: i32 = sources
                .iter()
                .map(|s| i32::from(s.signal_or_flat(i).value()))
                .sum();
            Signal::from_clipped(sum)
        })
        .collect();

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[Option<i8>]) -> SignalSeries {
        let values = values
            .iter()
            .map(|v| v.map(|x| Signal::from_clipped(i32::from(x))))
            .collect();
        SignalSeries::new(name, values)
    }

    #[test]
    fn agreeing_sources_do_not_double() {
        let a = series("a", &[Some(1), Some(-1)]);
        let b = series("b", &[Some(1), Some(-1)]);
        assert_eq!(combine(&[a, b]).unwrap(), vec![Signal::Long, Signal::Short]);
    }

    #[test]
    fn opposing_sources_cancel() {
        let a = series("a", &[Some(1), Some(-1)]);
        let b = series("b", &[Some(-1), Some(1)]);
        assert_eq!(combine(&[a, b]).unwrap(), vec![Signal::Flat, Signal::Flat]);
    }

    #[test]
    fn undefined_counts_as_zero() {
        let a = series("a", &[None, None, Some(-1)]);
        let b = series("b", &[Some(1), Some(0), None]);
        assert_eq!(
            combine(&[a, b]).unwrap(),
            vec![Signal::Long, Signal::Flat, Signal::Short]
        );
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = series("a", &[Some(1)]);
        let b = series("b", &[Some(1), Some(1)]);
        assert!(matches!(
            combine(&[a, b]),
            Err(BandtraderError::InvalidInput { .. })
        ));
    }

    #[test]
    fn no_sources_is_empty() {
        assert!(combine(&[]).unwrap().is_empty());
    }
}
