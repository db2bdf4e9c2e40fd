//! Reconstruction error scoring.

use recon_spi::{ErrorMatrix, ReconError, ReconstructionBatch, Result};

/// Mean absolute error over the time axis.
///
/// Inputs are time-major `[sample][step][sector]`; the result is
/// `[sample][sector]`. Every sample needs at least one step.
pub fn mean_absolute_error(
    predicted: &[Vec<Vec<f64>>],
    actual: &[Vec<Vec<f64>>],
) -> Result<Vec<Vec<f64>>> {
    if predicted.len() != actual.len() {
        return Err(ReconError::invalid(
            "predicted",
            format!("{} predictions for {} samples", predicted.len(), actual.len()),
        ));
    }

    predicted
        .iter()
        .zip(actual)
        .map(|(pred, truth)| sample_error(pred, truth))
        .collect()
}

fn sample_error(pred: &[Vec<f64>], truth: &[Vec<f64>]) -> Result<Vec<f64>> {
    if truth.is_empty() {
        return Err(ReconError::invalid("steps", "window has no time steps"));
    }
    let sectors = truth[0].len();
    let shape = |rows: &[Vec<f64>]| (rows.len(), rows.first().map_or(0, Vec::len));
    if pred.len() != truth.len()
        || pred.iter().chain(truth).any(|row| row.len() != sectors)
    {
        return Err(ReconError::ShapeMismatch {
            expected: shape(truth),
            got: shape(pred),
        });
    }

    let mut totals = vec![0.0; sectors];
    for (p_row, t_row) in pred.iter().zip(truth) {
        for (total, (p, t)) in totals.iter_mut().zip(p_row.iter().zip(t_row)) {
            *total += (p - t).abs();
        }
    }
    let steps = truth.len() as f64;
    Ok(totals.into_iter().map(|total| total / steps).collect())
}

/// Score a reconstruction batch into an error matrix.
pub fn score(batch: &ReconstructionBatch) -> Result<ErrorMatrix> {
    let values = mean_absolute_error(&batch.predicted, &batch.actual)?;
    if let Some(row) = values.iter().find(|row| row.len() != batch.sectors.len()) {
        return Err(ReconError::ShapeMismatch {
            expected: (values.len(), batch.sectors.len()),
            got: (values.len(), row.len()),
        });
    }
    ErrorMatrix::new(batch.sectors.clone(), batch.anchors.clone(), values)
}
