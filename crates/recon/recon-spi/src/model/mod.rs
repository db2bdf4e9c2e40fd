//! Data models for reconstruction anomaly detection.
//!
//! This module contains the data structures passed between pipeline stages,
//! from the raw series down to per-sector point anomalies.

mod batch;
mod error_matrix;
mod point_anomalies;
mod series;
mod thresholds;
mod window;

pub use batch::ReconstructionBatch;
pub use error_matrix::{AnomalyFlags, ErrorMatrix};
pub use point_anomalies::{PointAnomalies, SectorAnomalies};
pub use series::Series;
pub use thresholds::Thresholds;
pub use window::{Reconstruction, Sample, Window};
