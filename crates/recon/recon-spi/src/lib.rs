//! Reconstruction Anomaly Service Provider Interface
//!
//! Defines the model capability, the data model shared by every pipeline
//! stage, and the error type.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::Reconstructor;
pub use error::{ReconError, Result};
pub use model::{
    AnomalyFlags, ErrorMatrix, PointAnomalies, Reconstruction, ReconstructionBatch, Sample,
    SectorAnomalies, Series, Thresholds, Window,
};
