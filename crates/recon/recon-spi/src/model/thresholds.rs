//! Calibrated per-sector thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Anomaly threshold per sector.
///
/// Built once from reference errors and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    quantile: f64,
    sectors: Vec<String>,
    values: Vec<f64>,
}

impl Thresholds {
    pub fn new(quantile: f64, sectors: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if sectors.len() != values.len() {
            return Err(ReconError::invalid(
                "thresholds",
                format!("{} sectors but {} values", sectors.len(), values.len()),
            ));
        }
        Ok(Self {
            quantile,
            sectors,
            values,
        })
    }

    /// Quantile the thresholds were calibrated at.
    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Threshold of a sector by name.
    pub fn get(&self, sector: &str) -> Option<f64> {
        self.sectors
            .iter()
            .position(|s| s == sector)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.sectors
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
