//! Error types for reconstruction anomaly detection.
//!
//! This module contains the error type and the Result alias.

mod recon_error;

pub use recon_error::{ReconError, Result};
