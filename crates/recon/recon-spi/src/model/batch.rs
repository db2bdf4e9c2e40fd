//! Inference output.

use chrono::NaiveDate;
use serde::Serialize;

/// Reconstructions paired with the windows they came from.
///
/// Both tensors are time-major, `[sample][step][sector]`, and share the
/// ordering of `anchors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructionBatch {
    pub sectors: Vec<String>,
    pub anchors: Vec<NaiveDate>,
    pub predicted: Vec<Vec<Vec<f64>>>,
    pub actual: Vec<Vec<Vec<f64>>>,
}

impl ReconstructionBatch {
    /// An empty batch for the given sectors.
    pub fn empty(sectors: Vec<String>) -> Self {
        Self {
            sectors,
            anchors: Vec::new(),
            predicted: Vec::new(),
            actual: Vec::new(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
