//! Contract definitions for reconstruction anomaly detection.
//!
//! This module contains trait definitions that model providers must implement.

mod reconstructor;

pub use reconstructor::Reconstructor;
