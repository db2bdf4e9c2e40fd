//! Run-length aggregation of sample flags into point anomalies.

use recon_api::{PipelineConfig, RunLength};
use recon_spi::{AnomalyFlags, PointAnomalies, ReconError, Result};

/// Turns per-sample flags into per-index point anomalies.
///
/// A sample index `idx >= L - 1` is a point anomaly for a sector when a
/// whole run of consecutive samples for that sector was flagged:
/// with [`RunLength::Legacy`] the `L - 1` samples before `idx`, with
/// [`RunLength::Full`] the `L` samples ending at `idx`. Sectors never
/// influence each other.
#[derive(Debug, Clone)]
pub struct RunLengthAggregator {
    sequence_length: usize,
    run_length: RunLength,
}

impl RunLengthAggregator {
    pub fn new(sequence_length: usize, run_length: RunLength) -> Result<Self> {
        if sequence_length == 0 {
            return Err(ReconError::invalid("sequence_length", "must be at least 1"));
        }
        if run_length.flags_required(sequence_length) == 0 {
            return Err(ReconError::invalid(
                "run_length",
                "legacy run length needs a sequence length of at least 2",
            ));
        }
        Ok(Self {
            sequence_length,
            run_length,
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.window.sequence_length, config.run_length)
    }

    pub fn aggregate(&self, flags: &AnomalyFlags) -> Result<PointAnomalies> {
        let dense = (0..flags.sectors().len())
            .map(|c| self.aggregate_sector(&flags.column(c)))
            .collect();
        PointAnomalies::new(flags.sectors().to_vec(), flags.anchors().to_vec(), dense)
    }

    /// Dense point anomalies for a single sector's flags.
    pub fn aggregate_sector(&self, flags: &[bool]) -> Vec<bool> {
        let required = self.run_length.flags_required(self.sequence_length);
        // Legacy looks at the run ending one sample before idx.
        let lag = match self.run_length {
            RunLength::Legacy => 1,
            RunLength::Full => 0,
        };

        let mut streaks = Vec::with_capacity(flags.len());
        let mut streak = 0usize;
        for &flag in flags {
            streak = if flag { streak + 1 } else { 0 };
            streaks.push(streak);
        }

        (0..flags.len())
            .map(|idx| {
                idx + 1 >= self.sequence_length && idx >= lag && streaks[idx - lag] >= required
            })
            .collect()
    }
}
