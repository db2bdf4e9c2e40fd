//! Reconstruction Anomaly Facade
//!
//! Unified re-exports for the reconstruction anomaly module.
//!
//! This facade provides a single entry point to all functionality:
//! - `Reconstructor` trait and the data model from SPI
//! - Configuration types from API
//! - Pipeline stages, reconstructors, and reports from Core

// Re-export everything from SPI
pub use recon_spi::*;

// Re-export everything from API
pub use recon_api::*;

// Re-export everything from Core
pub use recon_core::*;
