//! Pipeline configuration types.

use std::path::Path;

use chrono::NaiveDate;
use recon_spi::{ReconError, Result};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date. A trailing time component (`2009-04-01 00:00:00`
/// or `2009-04-01T00:00:00`) is accepted and ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| ReconError::DateParse(raw.to_string()))
}

// ============================================================================
// Window Configuration
// ============================================================================

/// Sliding window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Observations per window (default: 20).
    pub sequence_length: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { sequence_length: 20 }
    }
}

impl WindowConfig {
    pub fn new(sequence_length: usize) -> Self {
        Self { sequence_length }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequence_length == 0 {
            return Err(ReconError::invalid("sequence_length", "must be at least 1"));
        }
        Ok(())
    }
}

/// Inclusive date range whose anchors are left out of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ExclusionRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Parse both bounds as `YYYY-MM-DD`; malformed dates fail immediately.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The 2008-08-01 ..= 2009-04-01 crisis period.
    pub fn financial_crisis() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2008, 8, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2009, 4, 1).unwrap_or_default(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(ReconError::invalid(
                "exclusion",
                format!("start {} is after end {}", self.start, self.end),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Split Configuration
// ============================================================================

/// Position-based train/validation/test split.
///
/// The first `floor(len * (1 - test_ratio))` rows form the in-sample set;
/// its last `validation_ratio` share (again floored) is the validation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Share of rows held out for out-of-sample testing (default: 0.2).
    pub test_ratio: f64,
    /// Share of in-sample rows used for calibration (default: 0.2).
    pub validation_ratio: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            validation_ratio: 0.2,
        }
    }
}

impl SplitConfig {
    pub fn new(test_ratio: f64, validation_ratio: f64) -> Self {
        Self {
            test_ratio,
            validation_ratio,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("test_ratio", self.test_ratio),
            ("validation_ratio", self.validation_ratio),
        ] {
            if !(0.0..1.0).contains(&ratio) {
                return Err(ReconError::invalid(name, "must be in [0, 1)"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Calibration Configuration
// ============================================================================

/// Threshold calibration configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Quantile of validation errors used as threshold (default: 0.95).
    pub quantile: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { quantile: 0.95 }
    }
}

impl CalibrationConfig {
    pub fn new(quantile: f64) -> Self {
        Self { quantile }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.quantile > 0.0 && self.quantile < 1.0) {
            return Err(ReconError::invalid("quantile", "must be in (0, 1)"));
        }
        Ok(())
    }
}

/// How many consecutive flagged samples make a point anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunLength {
    /// The `L - 1` samples preceding the index, excluding the index itself.
    #[default]
    Legacy,
    /// The `L` samples ending at and including the index.
    Full,
}

impl RunLength {
    /// Number of flags inspected for a sequence length.
    pub fn flags_required(&self, sequence_length: usize) -> usize {
        match self {
            RunLength::Legacy => sequence_length.saturating_sub(1),
            RunLength::Full => sequence_length,
        }
    }
}

// ============================================================================
// Pipeline Configuration
// ============================================================================

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub window: WindowConfig,
    pub split: SplitConfig,
    pub calibration: CalibrationConfig,
    /// Excluded from calibration and out-of-sample windows; in-sample windows
    /// always keep every anchor.
    pub exclusion: Option<ExclusionRange>,
    pub run_length: RunLength,
    /// Reconstruct windows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            split: SplitConfig::default(),
            calibration: CalibrationConfig::default(),
            exclusion: Some(ExclusionRange::financial_crisis()),
            run_length: RunLength::default(),
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReconError::invalid("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        self.split.validate()?;
        self.calibration.validate()?;
        if let Some(exclusion) = &self.exclusion {
            exclusion.validate()?;
        }
        if self.run_length.flags_required(self.window.sequence_length) == 0 {
            return Err(ReconError::invalid(
                "run_length",
                "legacy run length needs a sequence length of at least 2",
            ));
        }
        Ok(())
    }
}

/// Builder for PipelineConfig.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence_length(mut self, sequence_length: usize) -> Self {
        self.config.window.sequence_length = sequence_length;
        self
    }

    pub fn split(mut self, test_ratio: f64, validation_ratio: f64) -> Self {
        self.config.split = SplitConfig::new(test_ratio, validation_ratio);
        self
    }

    pub fn quantile(mut self, quantile: f64) -> Self {
        self.config.calibration.quantile = quantile;
        self
    }

    pub fn exclusion(mut self, exclusion: ExclusionRange) -> Self {
        self.config.exclusion = Some(exclusion);
        self
    }

    pub fn no_exclusion(mut self) -> Self {
        self.config.exclusion = None;
        self
    }

    pub fn run_length(mut self, run_length: RunLength) -> Self {
        self.config.run_length = run_length;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
