//! Price data access port trait.

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::PriceBar;

pub trait DataPort {
    /// Loads the full series, ordered by timestamp.
    fn load_bars(&self) -> Result<Vec<PriceBar>, BandtraderError>;
}
