//! Reconstruction Anomaly Core
//!
//! Implementations of every pipeline stage: windowing, inference, scoring,
//! threshold calibration, run-length aggregation, and the end-to-end
//! pipeline that chains them.

mod aggregation;
mod calibration;
mod inference;
mod pipeline;
mod reconstructors;
mod report;
mod scoring;
mod split;
mod windowing;

pub use aggregation::*;
pub use calibration::*;
pub use inference::*;
pub use pipeline::*;
pub use reconstructors::*;
pub use report::*;
pub use scoring::*;
pub use split::*;
pub use windowing::*;
