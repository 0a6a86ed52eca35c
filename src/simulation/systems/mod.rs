//! The fixed-order tick pipeline.
//!
//! Each phase is a function over the whole world. Only movement runs in
//! parallel; every other phase walks agents in ascending id order and draws
//! from the world's single random stream, so the first agent in id order
//! wins any conflict.

use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::world::World;

mod cleanup;
mod combat;
mod disease;
mod events;
mod lifecycle;
mod metabolism;
mod movement;
mod reproduction;

/// A stage of the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Sense, think, steer and move.
    Movement,
    /// Attacks between neighbours.
    Combat,
    /// Eating nearby food.
    Feeding,
    /// Drinking and thirst.
    Hydration,
    /// Metabolic drain and stress.
    Energy,
    /// Mating and offspring.
    Reproduction,
    /// Growing older and dying of age.
    Aging,
    /// In-life mutations.
    SomaticMutation,
    /// Infection progress and transmission.
    Disease,
    /// Epidemics and food blooms.
    Events,
    /// Removal of the dead and eaten, food regrowth, statistics and species.
    Cleanup,
}

impl Phase {
    /// Execution order within one tick.
    pub const ORDER: [Phase; 11] = [
        Phase::Movement,
        Phase::Combat,
        Phase::Feeding,
        Phase::Hydration,
        Phase::Energy,
        Phase::Reproduction,
        Phase::Aging,
        Phase::SomaticMutation,
        Phase::Disease,
        Phase::Events,
        Phase::Cleanup,
    ];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Movement => "movement",
            Phase::Combat => "combat",
            Phase::Feeding => "feeding",
            Phase::Hydration => "hydration",
            Phase::Energy => "energy",
            Phase::Reproduction => "reproduction",
            Phase::Aging => "aging",
            Phase::SomaticMutation => "somatic_mutation",
            Phase::Disease => "disease",
            Phase::Events => "events",
            Phase::Cleanup => "cleanup",
        }
    }
}

/// Dispatches one phase.
pub(crate) fn run(world: &mut World, phase: Phase, dt: f32) -> Result<(), SimError> {
    match phase {
        Phase::Movement => movement::run(world, dt)?,
        Phase::Combat => combat::run(world, dt),
        Phase::Feeding => metabolism::feed(world),
        Phase::Hydration => metabolism::hydrate(world, dt),
        Phase::Energy => metabolism::drain(world, dt),
        Phase::Reproduction => reproduction::run(world, dt)?,
        Phase::Aging => lifecycle::age(world, dt),
        Phase::SomaticMutation => lifecycle::somatic_mutation(world)?,
        Phase::Disease => disease::run(world, dt),
        Phase::Events => events::run(world, dt),
        Phase::Cleanup => cleanup::run(world, dt),
    }
    Ok(())
}
