//! Reconstruction Anomaly API
//!
//! Configuration types and builders for the reconstruction anomaly pipeline.

mod config;

// Re-export SPI types
pub use recon_spi::{ReconError, Result};

pub use config::{
    parse_date, CalibrationConfig, ExclusionRange, PipelineConfig, PipelineConfigBuilder, RunLength,
    SplitConfig, WindowConfig,
};
