//! # recon
//!
//! Reconstruction-error anomaly detection for multi-sector return series.
//! Windows a series, reconstructs every window with a pretrained model,
//! calibrates per-sector error thresholds on validation data, and reports
//! sectors that stay above threshold for a full window.

pub use recon_facade::*;
