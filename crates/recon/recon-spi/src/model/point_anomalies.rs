//! Point anomalies after run-length aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Dense per-sector point anomalies over the sample-index space.
///
/// `flags[c][idx]` is set when sector `c` is anomalous at sample index
/// `idx`, whose anchor date is `anchors[idx]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointAnomalies {
    sectors: Vec<String>,
    anchors: Vec<NaiveDate>,
    flags: Vec<Vec<bool>>,
}

/// Sparse view of one sector's point anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAnomalies {
    pub sector: String,
    /// Sample indices, ascending.
    pub indices: Vec<usize>,
    /// Anchor date of each index: the last date of the sample's window,
    /// i.e. `series.dates()[idx + L - 1]`, not `series.dates()[idx]`.
    pub dates: Vec<NaiveDate>,
}

impl PointAnomalies {
    /// Create from sector-major flags, one vector per sector.
    pub fn new(sectors: Vec<String>, anchors: Vec<NaiveDate>, flags: Vec<Vec<bool>>) -> Result<Self> {
        if flags.len() != sectors.len() {
            return Err(ReconError::ShapeMismatch {
                expected: (sectors.len(), anchors.len()),
                got: (flags.len(), anchors.len()),
            });
        }
        if let Some(column) = flags.iter().find(|f| f.len() != anchors.len()) {
            return Err(ReconError::ShapeMismatch {
                expected: (sectors.len(), anchors.len()),
                got: (sectors.len(), column.len()),
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

    /// Dense flags of a sector.
    pub fn sector(&self, name: &str) -> Option<&[bool]> {
        self.sectors
            .iter()
            .position(|s| s == name)
            .map(|c| self.flags[c].as_slice())
    }

    /// Flagged sample indices of a sector; empty for unknown sectors.
    pub fn indices(&self, name: &str) -> Vec<usize> {
        self.sector(name)
            .map(|flags| {
                flags
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &f)| if f { Some(i) } else { None })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of flagged points across sectors.
    pub fn count(&self) -> usize {
        self.flags.iter().flatten().filter(|&&f| f).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Sparse representation, one entry per sector in column order.
    pub fn to_sparse(&self) -> Vec<SectorAnomalies> {
        self.sectors
            .iter()
            .map(|sector| {
                let indices = self.indices(sector);
                let dates = indices.iter().map(|&i| self.anchors[i]).collect();
                SectorAnomalies {
                    sector: sector.clone(),
                    indices,
                    dates,
                }
            })
            .collect()
    }
}
