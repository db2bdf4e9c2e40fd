//! Model inference over samples.

use rayon::prelude::*;
use recon_spi::{ReconError, Reconstruction, ReconstructionBatch, Reconstructor, Result, Sample};

/// Feeds every sample through a model exactly once, preserving order.
pub struct InferenceRunner<'a, R: Reconstructor + ?Sized> {
    model: &'a R,
    parallel: bool,
}

impl<'a, R: Reconstructor + ?Sized> InferenceRunner<'a, R> {
    /// Create a sequential runner.
    pub fn new(model: &'a R) -> Self {
        Self {
            model,
            parallel: false,
        }
    }

    /// Reconstruct on the rayon thread pool. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reconstruct all samples.
    ///
    /// The first model error or shape mismatch aborts the whole run.
    pub fn run(&self, samples: &[Sample], sectors: &[String]) -> Result<ReconstructionBatch> {
        let reconstructions: Vec<Reconstruction> = if self.parallel {
            samples
                .par_iter()
                .map(|sample| self.reconstruct(sample, sectors.len()))
                .collect::<Result<_>>()?
        } else {
            samples
                .iter()
                .map(|sample| self.reconstruct(sample, sectors.len()))
                .collect::<Result<_>>()?
        };

        tracing::debug!(
            model = self.model.name(),
            samples = samples.len(),
            parallel = self.parallel,
            "reconstructed samples"
        );

        Ok(ReconstructionBatch {
            sectors: sectors.to_vec(),
            anchors: samples.iter().map(|s| s.anchor).collect(),
            predicted: reconstructions.iter().map(|r| r.to_time_major()).collect(),
            actual: samples.iter().map(|s| s.window.to_time_major()).collect(),
        })
    }

    fn reconstruct(&self, sample: &Sample, sector_count: usize) -> Result<Reconstruction> {
        let expected = sample.window.shape();
        if expected.0 != sector_count {
            return Err(ReconError::ShapeMismatch {
                expected: (sector_count, expected.1),
                got: expected,
            });
        }
        let reconstruction = self.model.reconstruct(&sample.window)?;
        if reconstruction.shape() != expected {
            return Err(ReconError::ShapeMismatch {
                expected,
                got: reconstruction.shape(),
            });
        }
        Ok(reconstruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use recon_spi::Window;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Doubling {
        calls: AtomicUsize,
    }

    impl Reconstructor for Doubling {
        fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Window::new(
                window
                    .values()
                    .iter()
                    .map(|s| s.iter().map(|v| v * 2.0).collect())
                    .collect(),
            )
        }

        fn name(&self) -> &str {
            "doubling"
        }
    }

    struct Truncating;

    impl Reconstructor for Truncating {
        fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
            Window::new(window.values().iter().map(|s| s[1..].to_vec()).collect())
        }

        fn name(&self) -> &str {
            "truncating"
        }
    }

    struct Failing;

    impl Reconstructor for Failing {
        fn reconstruct(&self, _window: &Window) -> Result<Reconstruction> {
            Err(ReconError::ModelError("weights not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                anchor: NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(),
                position: i + 2,
                window: Window::new(vec![
                    vec![i as f64, i as f64 + 1.0, i as f64 + 2.0],
                    vec![0.5, 0.5, 0.5],
                ])
                .unwrap(),
            })
            .collect()
    }

    fn sectors() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    #[test]
    fn test_every_sample_once_in_order() {
        let model = Doubling {
            calls: AtomicUsize::new(0),
        };
        let batch = InferenceRunner::new(&model).run(&samples(5), &sectors()).unwrap();

        assert_eq!(model.calls.load(Ordering::SeqCst), 5);
        assert_eq!(batch.len(), 5);
        // time-major: [sample][step][sector]
        assert_eq!(batch.actual[3][0], vec![3.0, 0.5]);
        assert_eq!(batch.predicted[3][2], vec![10.0, 1.0]);
        assert!(batch.anchors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = Doubling {
            calls: AtomicUsize::new(0),
        };
        let data = samples(20);
        let sequential = InferenceRunner::new(&model).run(&data, &sectors()).unwrap();
        let parallel = InferenceRunner::new(&model)
            .parallel(true)
            .run(&data, &sectors())
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_shape_mismatch_is_fatal() {
        let err = InferenceRunner::new(&Truncating)
            .run(&samples(2), &sectors())
            .unwrap_err();
        assert!(matches!(
            err,
            ReconError::ShapeMismatch {
                expected: (2, 3),
                got: (2, 2)
            }
        ));
    }

    #[test]
    fn test_model_error_propagates() {
        let err = InferenceRunner::new(&Failing)
            .parallel(true)
            .run(&samples(3), &sectors())
            .unwrap_err();
        assert!(matches!(err, ReconError::ModelError(_)));
    }

    #[test]
    fn test_empty_samples() {
        let batch = InferenceRunner::new(&Failing).run(&[], &sectors()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.sectors, sectors());
    }

    #[test]
    fn test_trait_object_model() {
        let model: Box<dyn Reconstructor> = Box::new(Doubling {
            calls: AtomicUsize::new(0),
        });
        let batch = InferenceRunner::new(&model).run(&samples(1), &sectors()).unwrap();
        assert_eq!(batch.len(), 1);
    }
}
