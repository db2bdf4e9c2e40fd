//! Date-indexed multi-sector series.

use std::collections::HashSet;
use std::ops::Range;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ReconError, Result};

/// Chronologically ordered observations, one value per sector per date.
///
/// Rows are time-major: `rows[t][c]` is the value of sector `c` on `dates[t]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    sectors: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl Series {
    /// Create a series, validating its shape and date ordering.
    ///
    /// Sector names must be unique and non-empty as a set, every row must
    /// carry one value per sector, and dates must be strictly increasing.
    pub fn new(sectors: Vec<String>, dates: Vec<NaiveDate>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if sectors.is_empty() {
            return Err(ReconError::invalid("sectors", "at least one sector is required"));
        }
        let mut seen = HashSet::with_capacity(sectors.len());
        for name in &sectors {
            if !seen.insert(name.as_str()) {
                return Err(ReconError::invalid(
                    "sectors",
                    format!("duplicate sector '{}'", name),
                ));
            }
        }
        if dates.len() != rows.len() {
            return Err(ReconError::invalid(
                "rows",
                format!("{} dates but {} rows", dates.len(), rows.len()),
            ));
        }
        if let Some((t, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != sectors.len()) {
            return Err(ReconError::invalid(
                "rows",
                format!("row {} has {} values for {} sectors", t, row.len(), sectors.len()),
            ));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ReconError::invalid(
                "dates",
                format!("{} does not follow {} chronologically", pair[1], pair[0]),
            ));
        }

        Ok(Self {
            sectors,
            dates,
            rows,
        })
    }

    /// Sector names in column order.
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    /// Number of sectors.
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Column index of a sector.
    pub fn sector_index(&self, name: &str) -> Option<usize> {
        self.sectors.iter().position(|s| s == name)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of every sector at position `t`.
    pub fn row(&self, t: usize) -> Option<&[f64]> {
        self.rows.get(t).map(Vec::as_slice)
    }

    /// All values of one sector, in date order.
    pub fn column(&self, sector: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[sector]).collect()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positional slice, clamped to the series bounds.
    pub fn slice(&self, range: Range<usize>) -> Series {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Series {
            sectors: self.sectors.clone(),
            dates: self.dates[start..end].to_vec(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// Multiply every value by `factor`.
    pub fn scaled(&self, factor: f64) -> Series {
        Series {
            sectors: self.sectors.clone(),
            dates: self.dates.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|v| v * factor).collect())
                .collect(),
        }
    }
}
