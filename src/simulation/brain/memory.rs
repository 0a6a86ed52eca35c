//! Short-term memory of past hidden states.

use std::collections::VecDeque;

use ndarray::{Array1, s};
use serde::{Deserialize, Serialize};

/// Fixed-capacity ring of the most recent hidden-state vectors.
///
/// Before a forward pass the stored states (newest first) are appended to the
/// sensory inputs; slots not yet filled read as zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBuffer {
    depth: usize,
    width: usize,
    entries: VecDeque<Array1<f32>>,
}

impl MemoryBuffer {
    /// Creates an empty buffer holding `depth` vectors of `width` values.
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            entries: VecDeque::with_capacity(depth),
        }
    }

    /// Capacity in vectors.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of stored vectors.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of values appended by [`MemoryBuffer::augment`].
    #[inline]
    pub fn extra_inputs(&self) -> usize {
        self.depth * self.width
    }

    /// Concatenates `sensory` with the stored states, newest first.
    pub fn augment(&self, sensory: &Array1<f32>) -> Array1<f32> {
        let base = sensory.len();
        let mut inputs = Array1::zeros(base + self.extra_inputs());
        inputs.slice_mut(s![..base]).assign(sensory);
        for (slot, entry) in self.entries.iter().rev().enumerate() {
            let offset = base + slot * self.width;
            let len = entry.len().min(self.width);
            inputs
                .slice_mut(s![offset..offset + len])
                .assign(&entry.slice(s![..len]));
        }
        inputs
    }

    /// Stores a new hidden state, evicting the oldest when full.
    pub fn push(&mut self, hidden: Array1<f32>) {
        if self.depth == 0 {
            return;
        }
        if self.entries.len() == self.depth {
            self.entries.pop_front();
        }
        self.entries.push_back(hidden);
    }

    /// Forgets every stored state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
