//! Integration tests for recon

use chrono::{Days, NaiveDate};
use recon::{
    build_samples, mean_absolute_error, score, split_series, AnomalyPipeline, AutoencoderWeights,
    DenseAutoencoder, ExclusionRange, InferenceRunner, PipelineConfig, ReconError, Reconstructor,
    RunLength, Series, SplitConfig, ThresholdCalibrator, Thresholds,
};

fn sector_names() -> Vec<String> {
    ["Energy", "Financials", "Health Care"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Smooth deterministic returns, one phase-shifted wave per sector.
fn wave_series(start: NaiveDate, len: usize) -> Series {
    let dates = (0..len as u64).map(|i| start + Days::new(i)).collect();
    let rows = (0..len)
        .map(|t| {
            (0..3)
                .map(|c| ((t as f64) * 0.3 + c as f64).sin())
                .collect()
        })
        .collect();
    Series::new(sector_names(), dates, rows).unwrap()
}

/// Autoencoder that passes positive inputs through unchanged and squashes
/// negative ones by the LeakyReLU slope.
fn pass_through_weights(sectors: usize, len: usize) -> AutoencoderWeights {
    let n = sectors * len;
    let eye: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    AutoencoderWeights {
        sequence_length: len,
        sectors,
        encoder: eye.clone(),
        encoder_bias: vec![0.0; n],
        decoder: eye,
        decoder_bias: vec![0.0; n],
        leaky_slope: 0.5,
    }
}

#[test]
fn test_exclusion_never_adds_samples() {
    let series = wave_series(NaiveDate::from_ymd_opt(2008, 6, 1).unwrap(), 400);
    let crisis = ExclusionRange::financial_crisis();

    let all = build_samples(&series, 20, None).unwrap();
    let filtered = build_samples(&series, 20, Some(&crisis)).unwrap();

    assert_eq!(all.len(), 381);
    assert!(filtered.len() < all.len());
    assert!(filtered.iter().all(|s| !crisis.contains(s.anchor)));
}

#[test]
fn test_dense_autoencoder_round_trip_through_stages() {
    let series = wave_series(NaiveDate::from_ymd_opt(2012, 1, 2).unwrap(), 60);
    let model = DenseAutoencoder::new(pass_through_weights(3, 10)).unwrap();
    let samples = build_samples(&series, 10, None).unwrap();

    let batch = InferenceRunner::new(&model).run(&samples, series.sectors()).unwrap();
    let errors = score(&batch).unwrap();
    assert_eq!(errors.sample_count(), 51);

    // Error is half the mean magnitude of the negative part of each window.
    let sample = &samples[7];
    for c in 0..3 {
        let window = sample.window.sector(c).unwrap();
        let expected =
            window.iter().map(|&v| if v < 0.0 { -v * 0.5 } else { 0.0 }).sum::<f64>() / 10.0;
        assert!((errors.get(7, c).unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn test_dense_autoencoder_wrong_sequence_length_aborts() {
    let series = wave_series(NaiveDate::from_ymd_opt(2012, 1, 2).unwrap(), 200);
    let model = DenseAutoencoder::new(pass_through_weights(3, 10)).unwrap();
    let config = PipelineConfig::builder()
        .sequence_length(20)
        .no_exclusion()
        .build()
        .unwrap();
    let pipeline = AnomalyPipeline::new(model, config).unwrap();

    assert!(matches!(
        pipeline.run(&series),
        Err(ReconError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_weights_json_matches_struct() {
    let weights = pass_through_weights(1, 2);
    let json = serde_json::to_string(&weights).unwrap();
    assert_eq!(AutoencoderWeights::from_json_str(&json).unwrap(), weights);
}

#[test]
fn test_thresholds_reused_across_datasets() {
    let series = wave_series(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 500);
    let model = DenseAutoencoder::new(pass_through_weights(3, 5)).unwrap();
    let config = PipelineConfig::builder()
        .sequence_length(5)
        .no_exclusion()
        .build()
        .unwrap();
    let pipeline = AnomalyPipeline::new(model, config).unwrap();

    let calibration = pipeline.calibrate(&series).unwrap();
    let split = split_series(&series, &SplitConfig::default()).unwrap();
    let in_sample = pipeline
        .score_dataset("in_sample", &split.in_sample, &calibration.thresholds, false)
        .unwrap();
    let report = pipeline.run(&series).unwrap();

    assert_eq!(report.thresholds, calibration.thresholds);
    assert_eq!(report.in_sample.points, in_sample.points);
}

#[test]
fn test_foreign_thresholds_rejected() {
    let series = wave_series(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), 50);
    let model = DenseAutoencoder::new(pass_through_weights(3, 5)).unwrap();
    let pipeline = AnomalyPipeline::new(
        model,
        PipelineConfig::builder().sequence_length(5).build().unwrap(),
    )
    .unwrap();
    let other = Thresholds::new(0.95, vec!["Energy".to_string()], vec![0.1]).unwrap();

    assert!(matches!(
        pipeline.score_dataset("test", &series, &other, false),
        Err(ReconError::SectorMismatch { .. })
    ));
}

#[test]
fn test_scorer_rejects_mismatched_batches() {
    let a = vec![vec![vec![1.0, 2.0]]; 3];
    let b = vec![vec![vec![1.0, 2.0]]; 2];
    assert!(mean_absolute_error(&a, &b).is_err());
}

#[test]
fn test_calibrator_from_default_config() {
    let calibrator = ThresholdCalibrator::from_config(&PipelineConfig::default().calibration).unwrap();
    assert_eq!(calibrator.quantile(), 0.95);
}

#[test]
fn test_model_names() {
    let dense = DenseAutoencoder::new(pass_through_weights(1, 2)).unwrap();
    assert_eq!(dense.name(), "dense-autoencoder");
    let boxed: Box<dyn Reconstructor> = Box::new(dense);
    assert_eq!(boxed.name(), "dense-autoencoder");
    assert_eq!(RunLength::default(), RunLength::Legacy);
}
