//! Data loading for reconstruction anomaly detection
//!
//! Reads date-indexed sector return tables from CSV into a [`Series`].

mod error;
mod loader;

pub use error::{DataError, Result};
pub use loader::{load_sector_returns, load_sector_returns_from_reader, LoadOptions};

pub use recon_spi::Series;
