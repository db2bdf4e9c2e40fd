//! Sliding window sample construction.

use recon_api::{ExclusionRange, WindowConfig};
use recon_spi::{ReconError, Result, Sample, Series, Window};

/// Slices a series into overlapping fixed-length windows.
///
/// Every position `t >= L - 1` is a candidate anchor; the window is the `L`
/// observations ending at `t`. With an exclusion range, anchors dated inside
/// it are dropped.
#[derive(Debug, Clone)]
pub struct SampleBuilder {
    sequence_length: usize,
    exclusion: Option<ExclusionRange>,
}

impl SampleBuilder {
    /// Create a builder that keeps every anchor.
    pub fn new(sequence_length: usize) -> Result<Self> {
        WindowConfig::new(sequence_length).validate()?;
        Ok(Self {
            sequence_length,
            exclusion: None,
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &WindowConfig) -> Result<Self> {
        Self::new(config.sequence_length)
    }

    /// Drop anchors inside `range` (inclusive).
    pub fn with_exclusion(mut self, range: ExclusionRange) -> Result<Self> {
        range.validate()?;
        self.exclusion = Some(range);
        Ok(self)
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn exclusion(&self) -> Option<&ExclusionRange> {
        self.exclusion.as_ref()
    }

    /// Build samples in chronological anchor order.
    ///
    /// A series shorter than the sequence length yields no samples.
    pub fn build(&self, series: &Series) -> Vec<Sample> {
        let len = self.sequence_length;
        if series.len() < len {
            return Vec::new();
        }
        let dates = series.dates();
        let rows = series.rows();

        (len - 1..series.len())
            .filter(|&t| !self.is_excluded(t, series))
            .map(|t| Sample {
                anchor: dates[t],
                position: t,
                window: Window::from_time_major(&rows[t + 1 - len..=t]),
            })
            .collect()
    }

    fn is_excluded(&self, t: usize, series: &Series) -> bool {
        self.exclusion
            .as_ref()
            .is_some_and(|range| range.contains(series.dates()[t]))
    }
}

/// Build samples without holding on to a builder.
pub fn build_samples(
    series: &Series,
    sequence_length: usize,
    exclusion: Option<&ExclusionRange>,
) -> Result<Vec<Sample>> {
    let builder = SampleBuilder::new(sequence_length)?;
    let builder = match exclusion {
        Some(range) => builder.with_exclusion(*range)?,
        None => builder,
    };
    Ok(builder.build(series))
}

impl TryFrom<&WindowConfig> for SampleBuilder {
    type Error = ReconError;

    fn try_from(config: &WindowConfig) -> Result<Self> {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(len: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2008, 7, 1).unwrap();
        let dates = (0..len as u64)
            .map(|i| start.checked_add_days(Days::new(i)).unwrap())
            .collect();
        let rows = (0..len).map(|i| vec![i as f64, -(i as f64)]).collect();
        Series::new(vec!["A".to_string(), "B".to_string()], dates, rows).unwrap()
    }

    #[test]
    fn test_short_series_is_empty() {
        let builder = SampleBuilder::new(5).unwrap();
        assert!(builder.build(&series(4)).is_empty());
        assert!(builder.build(&series(0)).is_empty());
    }

    #[test]
    fn test_exact_length_yields_one_sample() {
        let samples = SampleBuilder::new(5).unwrap().build(&series(5));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, 4);
    }

    #[test]
    fn test_windows_end_at_anchor() {
        let s = series(10);
        let samples = SampleBuilder::new(3).unwrap().build(&s);
        assert_eq!(samples.len(), 8);

        let first = &samples[0];
        assert_eq!(first.anchor, s.dates()[2]);
        assert_eq!(first.window.shape(), (2, 3));
        assert_eq!(first.window.sector(0), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(first.window.sector(1), Some(&[0.0, -1.0, -2.0][..]));

        let last = samples.last().unwrap();
        assert_eq!(last.anchor, s.dates()[9]);
        assert_eq!(last.window.sector(0), Some(&[7.0, 8.0, 9.0][..]));
    }

    #[test]
    fn test_exclusion_drops_inclusive_range() {
        let s = series(60);
        let range = ExclusionRange::parse("2008-08-01", "2008-08-10").unwrap();
        let all = SampleBuilder::new(5).unwrap().build(&s);
        let filtered = SampleBuilder::new(5)
            .unwrap()
            .with_exclusion(range)
            .unwrap()
            .build(&s);

        assert_eq!(all.len() - filtered.len(), 10);
        assert!(filtered.iter().all(|sample| !range.contains(sample.anchor)));
    }

    #[test]
    fn test_exclusion_keeps_window_contents() {
        // Anchors after the range still see observations inside it.
        let s = series(60);
        let range = ExclusionRange::parse("2008-08-01", "2008-08-10").unwrap();
        let filtered = build_samples(&s, 5, Some(&range)).unwrap();
        let after = filtered
            .iter()
            .find(|sample| sample.anchor > range.end)
            .unwrap();
        assert_eq!(after.window.sector(0).unwrap()[0], (after.position - 4) as f64);
    }

    #[test]
    fn test_zero_sequence_length_rejected() {
        assert!(SampleBuilder::new(0).is_err());
        assert!(SampleBuilder::try_from(&WindowConfig::new(0)).is_err());
    }

    #[test]
    fn test_anchors_strictly_increasing() {
        let samples = SampleBuilder::new(4).unwrap().build(&series(30));
        assert!(samples.windows(2).all(|w| w[0].anchor < w[1].anchor));
    }
}
