//! Stateful recurrent brain.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mlp::{Mlp, matrix};
use super::{HIDDEN_SIZE, OUTPUT_SIZE};
use crate::simulation::error::BrainError;
use crate::simulation::random::gaussian;

/// Elman-style recurrent network with an 8-wide hidden state.
///
/// `h_t = tanh(W_ih·x_t + W_hh·h_{t-1} + b_h + noise)`,
/// `out_t = tanh(W_ho·h_t + b_o)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrent {
    /// Input to hidden weights (`HIDDEN_SIZE` × input width).
    pub w_ih: Array2<f32>,
    /// Hidden to hidden weights.
    pub w_hh: Array2<f32>,
    /// Hidden bias.
    pub b_h: Array1<f32>,
    /// Hidden to output layer.
    pub output: Mlp,
    /// Hidden state carried between calls.
    pub hidden: Array1<f32>,
    /// Standard deviation of per-step hidden noise.
    pub noise_std: f32,
}

impl Recurrent {
    /// Weight count for an input width.
    pub fn weight_count(input_size: usize) -> usize {
        input_size * HIDDEN_SIZE
            + HIDDEN_SIZE * HIDDEN_SIZE
            + HIDDEN_SIZE
            + Mlp::parameter_count(HIDDEN_SIZE, OUTPUT_SIZE)
    }

    /// Builds the network from `W_ih, W_hh, b_h, W_ho, b_o`.
    ///
    /// The hidden state starts as `N(0, initial_hidden_std)` noise rather than
    /// zeros so fresh brains are not stuck at the origin.
    pub fn from_flat<R: Rng + ?Sized>(
        input_size: usize,
        weights: &[f32],
        initial_hidden_std: f32,
        noise_std: f32,
        rng: &mut R,
    ) -> Result<Self, BrainError> {
        let expected = Self::weight_count(input_size);
        if weights.len() != expected {
            return Err(BrainError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        let (w_ih, rest) = weights.split_at(input_size * HIDDEN_SIZE);
        let (w_hh, rest) = rest.split_at(HIDDEN_SIZE * HIDDEN_SIZE);
        let (b_h, rest) = rest.split_at(HIDDEN_SIZE);

        Ok(Self {
            w_ih: matrix(HIDDEN_SIZE, input_size, w_ih)?,
            w_hh: matrix(HIDDEN_SIZE, HIDDEN_SIZE, w_hh)?,
            b_h: Array1::from_vec(b_h.to_vec()),
            output: Mlp::from_flat(HIDDEN_SIZE, OUTPUT_SIZE, rest)?,
            hidden: initial_hidden(initial_hidden_std, rng),
            noise_std,
        })
    }

    /// Input width.
    pub fn input_size(&self) -> usize {
        self.w_ih.ncols()
    }

    /// Advances the hidden state and returns `(outputs, new hidden state)`.
    pub fn step<R: Rng + ?Sized>(&mut self, inputs: &Array1<f32>, rng: &mut R) -> (Array1<f32>, Array1<f32>) {
        let mut pre = self.w_ih.dot(inputs);
        pre += &self.w_hh.dot(&self.hidden);
        pre += &self.b_h;
        if self.noise_std > 0.0 {
            pre.mapv_inplace(|v| v + gaussian(rng, self.noise_std));
        }
        pre.mapv_inplace(f32::tanh);
        self.hidden = pre;
        let outputs = self.output.forward(&self.hidden);
        (outputs, self.hidden.clone())
    }

    /// Replaces the hidden state with fresh noise.
    pub fn reset<R: Rng + ?Sized>(&mut self, initial_hidden_std: f32, rng: &mut R) {
        self.hidden = initial_hidden(initial_hidden_std, rng);
    }

    /// Flat weights in construction order.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(Self::weight_count(self.input_size()));
        flat.extend(self.w_ih.iter().copied());
        flat.extend(self.w_hh.iter().copied());
        flat.extend(self.b_h.iter().copied());
        self.output.extend_flat(&mut flat);
        flat
    }
}

fn initial_hidden<R: Rng + ?Sized>(std_dev: f32, rng: &mut R) -> Array1<f32> {
    Array1::from_iter((0..HIDDEN_SIZE).map(|_| gaussian(rng, std_dev)))
}
