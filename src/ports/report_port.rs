//! Result export port trait.

use crate::domain::error::BandtraderError;
use crate::domain::pipeline::AnnotatedSeries;
use std::path::Path;

/// Port for writing the annotated series produced by a run. Implementations
/// only read the series.
pub trait ReportPort {
    fn write(&self, series: &AnnotatedSeries, output_path: &Path) -> Result<(), BandtraderError>;
}
