//! Dense tanh layer built from a slice of the flat weight vector.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::simulation::error::BrainError;

/// A single dense layer with tanh activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Number of parameters of a layer with the given shape.
    #[inline]
    pub fn parameter_count(input_size: usize, output_size: usize) -> usize {
        input_size * output_size + output_size
    }

    /// Builds a layer from `weights` (row-major) followed by `biases`.
    pub fn from_flat(input_size: usize, output_size: usize, flat: &[f32]) -> Result<Self, BrainError> {
        let expected = Self::parameter_count(input_size, output_size);
        if flat.len() != expected {
            return Err(BrainError::WeightCount {
                expected,
                actual: flat.len(),
            });
        }
        let (w, b) = flat.split_at(input_size * output_size);
        Ok(Self {
            weights: matrix(output_size, input_size, w)?,
            biases: Array1::from_vec(b.to_vec()),
        })
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;

        // In-place tanh for better cache locality
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Appends weights then biases to `flat`.
    pub fn extend_flat(&self, flat: &mut Vec<f32>) {
        flat.extend(self.weights.iter().copied());
        flat.extend(self.biases.iter().copied());
    }
}

/// Reshapes a row-major slice into a `rows × cols` matrix.
pub(crate) fn matrix(rows: usize, cols: usize, flat: &[f32]) -> Result<Array2<f32>, BrainError> {
    Array2::from_shape_vec((rows, cols), flat.to_vec()).map_err(|_| BrainError::WeightCount {
        expected: rows * cols,
        actual: flat.len(),
    })
}
