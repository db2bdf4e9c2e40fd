//! Concrete reconstructor implementations.

use std::path::Path;

use recon_spi::{ReconError, Reconstruction, Reconstructor, Result, Window};
use serde::{Deserialize, Serialize};

// ============================================================================
// Dense Autoencoder
// ============================================================================

fn default_leaky_slope() -> f64 {
    0.01
}

/// Serialized weights of a single-hidden-layer autoencoder.
///
/// The input is the sector-major flattened window of `sectors *
/// sequence_length` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoencoderWeights {
    pub sequence_length: usize,
    pub sectors: usize,
    /// `hidden x input`
    pub encoder: Vec<Vec<f64>>,
    pub encoder_bias: Vec<f64>,
    /// `input x hidden`
    pub decoder: Vec<Vec<f64>>,
    pub decoder_bias: Vec<f64>,
    /// Negative slope of the LeakyReLU hidden activation.
    #[serde(default = "default_leaky_slope")]
    pub leaky_slope: f64,
}

impl AutoencoderWeights {
    pub fn input_dim(&self) -> usize {
        self.sectors * self.sequence_length
    }

    pub fn hidden_dim(&self) -> usize {
        self.encoder.len()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let weights: Self =
            serde_json::from_str(json).map_err(|e| ReconError::ModelError(e.to_string()))?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every matrix agrees with the declared dimensions.
    pub fn validate(&self) -> Result<()> {
        let input = self.input_dim();
        let hidden = self.hidden_dim();
        if input == 0 || hidden == 0 {
            return Err(ReconError::ModelError(
                "autoencoder needs non-empty input and hidden layers".to_string(),
            ));
        }
        let layers = [
            ("encoder", &self.encoder, hidden, input),
            ("decoder", &self.decoder, input, hidden),
        ];
        for (name, matrix, rows, cols) in layers {
            if matrix.len() != rows || matrix.iter().any(|row| row.len() != cols) {
                return Err(ReconError::ModelError(format!(
                    "{} must be {} x {}",
                    name, rows, cols
                )));
            }
        }
        if self.encoder_bias.len() != hidden || self.decoder_bias.len() != input {
            return Err(ReconError::ModelError(format!(
                "bias lengths must be {} (encoder) and {} (decoder)",
                hidden, input
            )));
        }
        if !self.leaky_slope.is_finite() {
            return Err(ReconError::ModelError("leaky_slope must be finite".to_string()));
        }
        Ok(())
    }
}

/// Dense autoencoder with a LeakyReLU hidden layer and linear output.
#[derive(Debug, Clone)]
pub struct DenseAutoencoder {
    weights: AutoencoderWeights,
}

impl DenseAutoencoder {
    pub fn new(weights: AutoencoderWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Load weights once from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(AutoencoderWeights::from_json_file(path)?)
    }

    pub fn weights(&self) -> &AutoencoderWeights {
        &self.weights
    }

    fn leaky_relu(&self, x: f64) -> f64 {
        if x >= 0.0 {
            x
        } else {
            x * self.weights.leaky_slope
        }
    }
}

fn affine(matrix: &[Vec<f64>], bias: &[f64], input: &[f64]) -> Vec<f64> {
    matrix
        .iter()
        .zip(bias)
        .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
        .collect()
}

impl Reconstructor for DenseAutoencoder {
    fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
        let expected = (self.weights.sectors, self.weights.sequence_length);
        if window.shape() != expected {
            return Err(ReconError::ShapeMismatch {
                expected,
                got: window.shape(),
            });
        }

        let input = window.flatten();
        let hidden: Vec<f64> = affine(&self.weights.encoder, &self.weights.encoder_bias, &input)
            .into_iter()
            .map(|h| self.leaky_relu(h))
            .collect();
        let output = affine(&self.weights.decoder, &self.weights.decoder_bias, &hidden);

        Window::new(
            output
                .chunks(self.weights.sequence_length)
                .map(<[f64]>::to_vec)
                .collect(),
        )
    }

    fn name(&self) -> &str {
        "dense-autoencoder"
    }
}

// ============================================================================
// Moving Average Baseline
// ============================================================================

/// Weights-free baseline: each step is the trailing mean of up to `span`
/// steps of its own sector.
#[derive(Debug, Clone)]
pub struct MovingAverageReconstructor {
    span: usize,
}

impl MovingAverageReconstructor {
    pub fn new(span: usize) -> Result<Self> {
        if span == 0 {
            return Err(ReconError::invalid("span", "must be at least 1"));
        }
        Ok(Self { span })
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Default for MovingAverageReconstructor {
    fn default() -> Self {
        Self { span: 5 }
    }
}

impl Reconstructor for MovingAverageReconstructor {
    fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
        let smoothed = window
            .values()
            .iter()
            .map(|sector| {
                (0..sector.len())
                    .map(|t| {
                        let k = (t + 1).min(self.span);
                        sector[t + 1 - k..=t].iter().sum::<f64>() / k as f64
                    })
                    .collect()
            })
            .collect();
        Window::new(smoothed)
    }

    fn name(&self) -> &str {
        "moving-average"
    }
}
