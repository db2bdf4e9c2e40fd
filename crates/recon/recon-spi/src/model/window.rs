//! Windows, samples, and reconstructions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ReconError, Result};

/// Fixed-length slice of a series, stored sector-major.
///
/// `values[c][t]` is sector `c` at step `t`; every sector has the same
/// number of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    values: Vec<Vec<f64>>,
}

/// Model output for a window. Same shape as the window it reconstructs.
pub type Reconstruction = Window;

impl Window {
    /// Create a window from sector-major values.
    pub fn new(values: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = values.first() {
            let steps = first.len();
            if let Some(bad) = values.iter().find(|v| v.len() != steps) {
                return Err(ReconError::ShapeMismatch {
                    expected: (values.len(), steps),
                    got: (values.len(), bad.len()),
                });
            }
        }
        Ok(Self { values })
    }

    /// Build a window by transposing time-major rows (`rows[t][c]`).
    pub fn from_time_major(rows: &[Vec<f64>]) -> Self {
        let sectors = rows.first().map_or(0, Vec::len);
        let values = (0..sectors)
            .map(|c| rows.iter().map(|row| row[c]).collect())
            .collect();
        Self { values }
    }

    /// `(sectors, steps)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.sector_count(), self.len())
    }

    pub fn sector_count(&self) -> usize {
        self.values.len()
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of one sector across the window.
    pub fn sector(&self, c: usize) -> Option<&[f64]> {
        self.values.get(c).map(Vec::as_slice)
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Transpose back to time-major rows (`rows[t][c]`).
    pub fn to_time_major(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|t| self.values.iter().map(|sector| sector[t]).collect())
            .collect()
    }

    /// Sector-major flattening: all steps of sector 0, then sector 1, ...
    pub fn flatten(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

/// A window together with the observation it ends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Date of the last observation in the window.
    pub anchor: NaiveDate,
    /// Position of the anchor in the source series.
    pub position: usize,
    pub window: Window,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_time_major_transposes() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let window = Window::from_time_major(&rows);
        assert_eq!(window.shape(), (2, 3));
        assert_eq!(window.sector(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(window.sector(1), Some(&[10.0, 20.0, 30.0][..]));
        assert_eq!(window.to_time_major(), rows);
    }

    #[test]
    fn test_new_rejects_ragged() {
        let result = Window::new(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(ReconError::ShapeMismatch {
                expected: (2, 2),
                got: (2, 1)
            })
        ));
    }

    #[test]
    fn test_flatten_is_sector_major() {
        let window = Window::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(window.flatten(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_window() {
        let window = Window::from_time_major(&[]);
        assert!(window.is_empty());
        assert_eq!(window.shape(), (0, 0));
    }
}
