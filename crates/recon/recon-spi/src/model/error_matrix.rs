//! Per-sample reconstruction errors and the flags derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Thresholds;
use crate::error::{ReconError, Result};

/// Mean absolute reconstruction error per `(sample, sector)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMatrix {
    sectors: Vec<String>,
    anchors: Vec<NaiveDate>,
    values: Vec<Vec<f64>>,
}

impl ErrorMatrix {
    /// Create a matrix with one row per anchor and one column per sector.
    pub fn new(sectors: Vec<String>, anchors: Vec<NaiveDate>, values: Vec<Vec<f64>>) -> Result<Self> {
        if anchors.len() != values.len() {
            return Err(ReconError::ShapeMismatch {
                expected: (anchors.len(), sectors.len()),
                got: (values.len(), sectors.len()),
            });
        }
        if let Some(row) = values.iter().find(|row| row.len() != sectors.len()) {
            return Err(ReconError::ShapeMismatch {
                expected: (values.len(), sectors.len()),
                got: (values.len(), row.len()),
            });
        }
        Ok(Self {
            sectors,
            anchors,
            values,
        })
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn anchors(&self) -> &[NaiveDate] {
        &self.anchors
    }

    /// Rows indexed `[sample][sector]`.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn sample_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, sample: usize, sector: usize) -> Option<f64> {
        self.values.get(sample).and_then(|row| row.get(sector)).copied()
    }

    /// All errors of one sector, in sample order.
    pub fn column(&self, sector: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[sector]).collect()
    }

    /// Flag every entry strictly above its sector's threshold.
    ///
    /// Thresholds must cover exactly this matrix's sectors, in order.
    pub fn exceeds(&self, thresholds: &Thresholds) -> Result<AnomalyFlags> {
        if thresholds.sectors() != self.sectors.as_slice() {
            return Err(ReconError::SectorMismatch {
                expected: self.sectors.clone(),
                got: thresholds.sectors().to_vec(),
            });
        }
        let limits = thresholds.values();
        let flags = self
            .values
            .iter()
            .map(|row| row.iter().zip(limits).map(|(e, t)| e > t).collect())
            .collect();

        Ok(AnomalyFlags {
            sectors: self.sectors.clone(),
            anchors: self.anchors.clone(),
            flags,
        })
    }
}

/// Whether each `(sample, sector)` error exceeded its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlags {
    sectors: Vec<String>,
    anchors: Vec<NaiveDate>,
    flags: Vec<Vec<bool>>,
}

impl AnomalyFlags {
    /// Create flags with one row per anchor and one column per sector.
    pub fn new(sectors: Vec<String>, anchors: Vec<NaiveDate>, flags: Vec<Vec<bool>>) -> Result<Self> {
        if anchors.len() != flags.len() {
            return Err(ReconError::ShapeMismatch {
                expected: (anchors.len(), sectors.len()),
                got: (flags.len(), sectors.len()),
            });
        }
        if let Some(row) = flags.iter().find(|row| row.len() != sectors.len()) {
            return Err(ReconError::ShapeMismatch {
                expected: (flags.len(), sectors.len()),
                got: (flags.len(), row.len()),
            });
        }
        Ok(Self {
            sectors,
            anchors,
            flags,
        })
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn anchors(&self) -> &[NaiveDate] {
        &self.anchors
    }

    /// Rows indexed `[sample][sector]`.
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.flags
    }

    pub fn sample_count(&self) -> usize {
        self.flags.len()
    }

    /// Flags of one sector, in sample order.
    pub fn column(&self, sector: usize) -> Vec<bool> {
        self.flags.iter().map(|row| row[sector]).collect()
    }

    /// Total number of flagged `(sample, sector)` entries.
    pub fn count(&self) -> usize {
        self.flags.iter().flatten().filter(|&&f| f).count()
    }
}
