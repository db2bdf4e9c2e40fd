//! Position-based dataset split.

use recon_api::SplitConfig;
use recon_spi::{Result, Series};

/// Train, validation, in-sample, and test partitions of one series.
#[derive(Debug, Clone)]
pub struct SeriesSplit {
    pub train: Series,
    pub validation: Series,
    /// Train followed by validation.
    pub in_sample: Series,
    pub test: Series,
}

/// Split by position: `n = floor(len * (1 - test_ratio))` in-sample rows,
/// of which the first `floor(n * (1 - validation_ratio))` are training rows.
pub fn split_series(series: &Series, config: &SplitConfig) -> Result<SeriesSplit> {
    config.validate()?;
    let in_sample_len = (series.len() as f64 * (1.0 - config.test_ratio)) as usize;
    let train_len = (in_sample_len as f64 * (1.0 - config.validation_ratio)) as usize;

    Ok(SeriesSplit {
        train: series.slice(0..train_len),
        validation: series.slice(train_len..in_sample_len),
        in_sample: series.slice(0..in_sample_len),
        test: series.slice(in_sample_len..series.len()),
    })
}
