//! Stateless feed-forward brain.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::mlp::Mlp;
use super::{HIDDEN_SIZE, OUTPUT_SIZE};
use crate::simulation::error::BrainError;

/// `hidden = tanh(W_ih·x + b_h)`, `out = tanh(W_ho·hidden + b_o)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForward {
    /// Input to hidden layer.
    pub hidden: Mlp,
    /// Hidden to output layer.
    pub output: Mlp,
}

impl FeedForward {
    /// Weight count for an input width.
    pub fn weight_count(input_size: usize) -> usize {
        Mlp::parameter_count(input_size, HIDDEN_SIZE) + Mlp::parameter_count(HIDDEN_SIZE, OUTPUT_SIZE)
    }

    /// Builds the network from `W_ih, b_h, W_ho, b_o`.
    pub fn from_flat(input_size: usize, weights: &[f32]) -> Result<Self, BrainError> {
        let expected = Self::weight_count(input_size);
        if weights.len() != expected {
            return Err(BrainError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        let (first, second) = weights.split_at(Mlp::parameter_count(input_size, HIDDEN_SIZE));
        Ok(Self {
            hidden: Mlp::from_flat(input_size, HIDDEN_SIZE, first)?,
            output: Mlp::from_flat(HIDDEN_SIZE, OUTPUT_SIZE, second)?,
        })
    }

    /// Input width.
    pub fn input_size(&self) -> usize {
        self.hidden.weights.ncols()
    }

    /// Forward pass returning `(outputs, hidden activations)`.
    pub fn forward(&self, inputs: &Array1<f32>) -> (Array1<f32>, Array1<f32>) {
        let hidden = self.hidden.forward(inputs);
        let outputs = self.output.forward(&hidden);
        (outputs, hidden)
    }

    /// Flat weights in construction order.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(Self::weight_count(self.input_size()));
        self.hidden.extend_flat(&mut flat);
        self.output.extend_flat(&mut flat);
        flat
    }
}
