//! Threshold calibration from reference errors.

use recon_api::CalibrationConfig;
use recon_spi::{ErrorMatrix, ReconError, Result, Thresholds};

/// Quantile with linear interpolation between order statistics.
///
/// Position `q * (n - 1)` in the sorted data, interpolated the same way
/// NumPy's default `linear` method does. Returns `None` for empty input.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;

    let (a, b) = (sorted[lower], sorted[upper]);
    let diff = b - a;
    // Interpolate from the nearer end to keep rounding identical to NumPy.
    Some(if fraction >= 0.5 {
        b - diff * (1.0 - fraction)
    } else {
        a + diff * fraction
    })
}

/// Derives per-sector thresholds from a reference error distribution.
#[derive(Debug, Clone)]
pub struct ThresholdCalibrator {
    quantile: f64,
}

impl ThresholdCalibrator {
    /// Create a calibrator for `quantile` in `(0, 1)`.
    pub fn new(quantile: f64) -> Result<Self> {
        CalibrationConfig::new(quantile).validate()?;
        Ok(Self { quantile })
    }

    /// Create from configuration.
    pub fn from_config(config: &CalibrationConfig) -> Result<Self> {
        Self::new(config.quantile)
    }

    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// One threshold per sector: the configured quantile of its error column.
    ///
    /// An empty matrix has no defined threshold and is rejected.
    pub fn calibrate(&self, errors: &ErrorMatrix) -> Result<Thresholds> {
        if errors.is_empty() {
            return Err(ReconError::InsufficientData {
                required: 1,
                got: 0,
            });
        }
        if errors.rows().iter().flatten().any(|e| !e.is_finite()) {
            return Err(ReconError::invalid("errors", "reference errors must be finite"));
        }

        let values = (0..errors.sectors().len())
            .map(|c| quantile(&errors.column(c), self.quantile).unwrap_or_default())
            .collect();

        Thresholds::new(self.quantile, errors.sectors().to_vec(), values)
    }
}
