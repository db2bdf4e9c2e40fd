//! Pipeline reports and serializable summaries.

use recon_spi::{AnomalyFlags, ErrorMatrix, PointAnomalies, SectorAnomalies, Thresholds};
use serde::Serialize;

/// Everything computed for one scored dataset.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub label: String,
    /// Observations in the dataset before windowing.
    pub rows: usize,
    pub errors: ErrorMatrix,
    pub flags: AnomalyFlags,
    pub points: PointAnomalies,
}

impl DatasetReport {
    pub fn sample_count(&self) -> usize {
        self.errors.sample_count()
    }

    /// Flagged `(sample, sector)` entries before aggregation.
    pub fn anomalous_samples(&self) -> usize {
        self.flags.count()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            label: self.label.clone(),
            rows: self.rows,
            samples: self.sample_count(),
            anomalous_samples: self.anomalous_samples(),
            point_anomalies: self.points.count(),
            sectors: self.points.to_sparse(),
        }
    }
}

/// Serializable view of a [`DatasetReport`].
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub label: String,
    pub rows: usize,
    pub samples: usize,
    pub anomalous_samples: usize,
    pub point_anomalies: usize,
    pub sectors: Vec<SectorAnomalies>,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub model: String,
    pub thresholds: Thresholds,
    pub validation_errors: ErrorMatrix,
    pub in_sample: DatasetReport,
    pub out_of_sample: DatasetReport,
}

impl PipelineReport {
    /// Serializable summary with validation error histograms of `bins` bins.
    pub fn summary(&self, bins: usize) -> ReportSummary {
        ReportSummary {
            model: self.model.clone(),
            thresholds: self.thresholds.clone(),
            validation_samples: self.validation_errors.sample_count(),
            validation_histograms: error_histograms(&self.validation_errors, &self.thresholds, bins),
            in_sample: self.in_sample.summary(),
            out_of_sample: self.out_of_sample.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub model: String,
    pub thresholds: Thresholds,
    pub validation_samples: usize,
    pub validation_histograms: Vec<ErrorHistogram>,
    pub in_sample: DatasetSummary,
    pub out_of_sample: DatasetSummary,
}

/// Equal-width histogram of one sector's errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorHistogram {
    pub sector: String,
    pub threshold: f64,
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Histogram every sector of an error matrix.
pub fn error_histograms(errors: &ErrorMatrix, thresholds: &Thresholds, bins: usize) -> Vec<ErrorHistogram> {
    errors
        .sectors()
        .iter()
        .enumerate()
        .map(|(c, sector)| {
            let (edges, counts) = histogram(&errors.column(c), bins);
            ErrorHistogram {
                sector: sector.clone(),
                threshold: thresholds.get(sector).unwrap_or(f64::NAN),
                edges,
                counts,
            }
        })
        .collect()
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A constant sample is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    if values.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0; bins];
    for &v in values {
        let bin = (((v - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    (edges, counts)
}
