//! Neural network implementation for agent brains.
//!
//! Two interchangeable architectures share the same contract: 24 sensory
//! inputs (plus `8n` memory inputs) in, 6 tanh outputs out, through 8 tanh
//! hidden units. Weights are never trained; they are rebuilt from the genome.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod feed_forward;
pub mod memory;
pub mod mlp;
pub mod recurrent;

pub use feed_forward::FeedForward;
pub use memory::MemoryBuffer;
pub use mlp::Mlp;
pub use recurrent::Recurrent;

use super::error::BrainError;
use super::params::BrainParams;

/// Sensory inputs produced by the movement system.
pub const SENSORY_INPUTS: usize = 24;
/// Hidden units in both architectures.
pub const HIDDEN_SIZE: usize = 8;
/// Brain outputs.
pub const OUTPUT_SIZE: usize = 6;

/// Type of neural network architecture to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrainKind {
    /// Stateless two-layer perceptron.
    FeedForward,
    /// Recurrent network with persistent hidden state.
    Recurrent,
}

impl BrainKind {
    /// Input width including `memory_depth` stored hidden states.
    #[inline]
    pub fn input_size(memory_depth: usize) -> usize {
        SENSORY_INPUTS + memory_depth * HIDDEN_SIZE
    }

    /// Flat weight count: 254 (feed-forward) or 318 (recurrent) at memory
    /// depth zero, plus 64 per memory slot.
    pub fn weight_count(self, memory_depth: usize) -> usize {
        let inputs = Self::input_size(memory_depth);
        match self {
            BrainKind::FeedForward => FeedForward::weight_count(inputs),
            BrainKind::Recurrent => Recurrent::weight_count(inputs),
        }
    }
}

/// Result of one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Thought {
    /// Tanh outputs, see [`Output`].
    pub outputs: Array1<f32>,
    /// Hidden activations of this pass.
    pub hidden: Array1<f32>,
}

/// Meaning of each brain output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Desired heading, x component.
    SteerX = 0,
    /// Desired heading, y component.
    SteerY = 1,
    /// Effort in `[-1, 1]`, mapped to `[0, 1]`.
    Effort = 2,
    /// Attack drive; attacks above 0.5.
    Attack = 3,
    /// Mate drive; seeks mating above 0.5.
    Mate = 4,
    /// Rest drive; stops and lowers metabolism above 0.5.
    Rest = 5,
}

/// Neural network brain, either feed-forward or recurrent.
///
/// The tick pipeline only uses [`Brain::think`] and never inspects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Brain {
    /// Stateless variant.
    FeedForward(FeedForward),
    /// Stateful variant.
    Recurrent(Recurrent),
}

impl Brain {
    /// Assembles a brain from its flat weight vector.
    ///
    /// A weight vector of the wrong length is a configuration error.
    pub fn from_weights<R: Rng + ?Sized>(
        params: &BrainParams,
        weights: &[f32],
        rng: &mut R,
    ) -> Result<Self, BrainError> {
        let inputs = BrainKind::input_size(params.memory_depth);
        let expected = params.kind.weight_count(params.memory_depth);
        if weights.len() != expected {
            return Err(BrainError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        Ok(match params.kind {
            BrainKind::FeedForward => Brain::FeedForward(FeedForward::from_flat(inputs, weights)?),
            BrainKind::Recurrent => Brain::Recurrent(Recurrent::from_flat(
                inputs,
                weights,
                params.initial_hidden_std,
                params.hidden_noise_std,
                rng,
            )?),
        })
    }

    /// Rebuilds the brain from new weights, carrying the hidden state over
    /// when it is shape-compatible.
    ///
    /// The state is kept iff both brains are recurrent with equal hidden
    /// width; otherwise the new brain starts from fresh noise.
    pub fn rebuild<R: Rng + ?Sized>(
        &self,
        params: &BrainParams,
        weights: &[f32],
        rng: &mut R,
    ) -> Result<Self, BrainError> {
        let mut rebuilt = Self::from_weights(params, weights, rng)?;
        if let (Brain::Recurrent(old), Brain::Recurrent(new)) = (self, &mut rebuilt) {
            if old.hidden.len() == new.hidden.len() {
                new.hidden.assign(&old.hidden);
            }
        }
        Ok(rebuilt)
    }

    /// Clears any internal state, as on death or respawn.
    pub fn reset<R: Rng + ?Sized>(&mut self, params: &BrainParams, rng: &mut R) {
        if let Brain::Recurrent(net) = self {
            net.reset(params.initial_hidden_std, rng);
        }
    }

    /// Runs a forward pass through the brain.
    ///
    /// Inputs must match [`Brain::input_size`] exactly.
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        inputs: &Array1<f32>,
        rng: &mut R,
    ) -> Result<Thought, BrainError> {
        let expected = self.input_size();
        if inputs.len() != expected {
            return Err(BrainError::InputLength {
                expected,
                actual: inputs.len(),
            });
        }
        let (outputs, hidden) = match self {
            Brain::FeedForward(net) => net.forward(inputs),
            Brain::Recurrent(net) => net.step(inputs, rng),
        };
        Ok(Thought { outputs, hidden })
    }

    /// Input width including memory augmentation.
    pub fn input_size(&self) -> usize {
        match self {
            Brain::FeedForward(net) => net.input_size(),
            Brain::Recurrent(net) => net.input_size(),
        }
    }

    /// Current recurrent hidden state, if any.
    pub fn hidden_state(&self) -> Option<&Array1<f32>> {
        match self {
            Brain::FeedForward(_) => None,
            Brain::Recurrent(net) => Some(&net.hidden),
        }
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        match self {
            Brain::FeedForward(net) => net.to_flat_vector(),
            Brain::Recurrent(net) => net.to_flat_vector(),
        }
    }

    /// Returns the type of brain architecture.
    pub fn kind(&self) -> BrainKind {
        match self {
            Brain::FeedForward(_) => BrainKind::FeedForward,
            Brain::Recurrent(_) => BrainKind::Recurrent,
        }
    }
}

/// Runs a forward pass with memory augmentation.
///
/// The stored hidden states are appended to `sensory`, the brain is
/// evaluated, and the new hidden activations are pushed into `memory`.
pub fn think_with_memory<R: Rng + ?Sized>(
    brain: &mut Brain,
    memory: &mut MemoryBuffer,
    sensory: &Array1<f32>,
    rng: &mut R,
) -> Result<Thought, BrainError> {
    let inputs = memory.augment(sensory);
    let thought = brain.think(&inputs, rng)?;
    memory.push(thought.hidden.clone());
    Ok(thought)
}
