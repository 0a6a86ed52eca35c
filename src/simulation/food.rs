//! Food items that agents can consume for energy.
//!
//! Food grows around cluster centres. Eaten food is only flagged during the
//! tick and removed by the cleanup phase.

use serde::{Deserialize, Serialize};

use super::geometric_utils::Vec2;
use super::locatable::Locatable;

/// A food item that agents can consume for energy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Sequential identifier.
    pub id: u64,
    /// Position in 2D space.
    pub pos: Vec2,
    /// Energy value before the eater's efficiency is applied.
    pub energy: f32,
    /// Set when eaten; removed at cleanup.
    pub consumed: bool,
    /// Index of the cluster that spawned this item.
    pub cluster: usize,
}

impl Food {
    /// Creates a fresh food item.
    pub fn new(id: u64, pos: Vec2, energy: f32, cluster: usize) -> Self {
        Self {
            id,
            pos,
            energy,
            consumed: false,
            cluster,
        }
    }

    /// Checks if this food item has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Marks this food as consumed and returns its energy.
    pub fn consume(&mut self) -> f32 {
        self.consumed = true;
        self.energy
    }
}

impl Locatable for Food {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn is_active(&self) -> bool {
        !self.consumed
    }
}
