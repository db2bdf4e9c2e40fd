//! End-to-end anomaly pipeline.

use recon_api::PipelineConfig;
use recon_spi::{ErrorMatrix, Reconstructor, Result, Series, Thresholds};

use crate::aggregation::RunLengthAggregator;
use crate::calibration::ThresholdCalibrator;
use crate::inference::InferenceRunner;
use crate::report::{DatasetReport, PipelineReport};
use crate::scoring::score;
use crate::split::split_series;
use crate::windowing::SampleBuilder;

/// Thresholds together with the reference errors they came from.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub thresholds: Thresholds,
    pub errors: ErrorMatrix,
}

/// Calibrates thresholds on the validation split, then scores the in-sample
/// and out-of-sample splits against them.
pub struct AnomalyPipeline<R: Reconstructor> {
    model: R,
    config: PipelineConfig,
}

impl<R: Reconstructor> AnomalyPipeline<R> {
    pub fn new(model: R, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    /// Reconstruction errors of a dataset.
    ///
    /// With `exclude` set, anchors inside the configured exclusion range are
    /// skipped; otherwise every anchor is kept.
    pub fn errors(&self, series: &Series, exclude: bool) -> Result<ErrorMatrix> {
        let mut builder = SampleBuilder::from_config(&self.config.window)?;
        if let (true, Some(range)) = (exclude, self.config.exclusion) {
            builder = builder.with_exclusion(range)?;
        }
        let samples = builder.build(series);
        let batch = InferenceRunner::new(&self.model)
            .parallel(self.config.parallel)
            .run(&samples, series.sectors())?;
        score(&batch)
    }

    /// Thresholds from the validation split, exclusion range applied.
    pub fn calibrate(&self, series: &Series) -> Result<Calibration> {
        let split = split_series(series, &self.config.split)?;
        tracing::info!(
            model = self.model.name(),
            rows = series.len(),
            train = split.train.len(),
            validation = split.validation.len(),
            test = split.test.len(),
            "calibrating thresholds"
        );

        let errors = self.errors(&split.validation, true)?;
        let thresholds = ThresholdCalibrator::from_config(&self.config.calibration)?.calibrate(&errors)?;
        for (sector, value) in thresholds.iter() {
            tracing::debug!(sector, threshold = value, "calibrated");
        }
        Ok(Calibration { thresholds, errors })
    }

    /// Flag and aggregate one dataset against fixed thresholds.
    pub fn score_dataset(
        &self,
        label: &str,
        series: &Series,
        thresholds: &Thresholds,
        exclude: bool,
    ) -> Result<DatasetReport> {
        let errors = self.errors(series, exclude)?;
        let flags = errors.exceeds(thresholds)?;
        let points = RunLengthAggregator::from_config(&self.config)?.aggregate(&flags)?;

        tracing::info!(
            dataset = label,
            samples = errors.sample_count(),
            anomalous_samples = flags.count(),
            point_anomalies = points.count(),
            "scored dataset"
        );

        Ok(DatasetReport {
            label: label.to_string(),
            rows: series.len(),
            errors,
            flags,
            points,
        })
    }

    /// Calibrate, then score in-sample (every anchor) and out-of-sample
    /// (exclusion applied) data.
    pub fn run(&self, series: &Series) -> Result<PipelineReport> {
        let Calibration { thresholds, errors } = self.calibrate(series)?;
        let split = split_series(series, &self.config.split)?;

        let in_sample = self.score_dataset("in_sample", &split.in_sample, &thresholds, false)?;
        let out_of_sample = self.score_dataset("out_of_sample", &split.test, &thresholds, true)?;

        Ok(PipelineReport {
            model: self.model.name().to_string(),
            thresholds,
            validation_errors: errors,
            in_sample,
            out_of_sample,
        })
    }
}
