//! # Evosphere - Evolving Agent Ecosystem Kernel
//!
//! A headless simulation of agents whose behavior is controlled by genetically
//! encoded neural networks. Agents move, eat, drink, fight, mate and die in a
//! bounded 2D world with finite food and water; their diploid genomes are
//! recombined and mutated from one generation to the next.
//!
//! ## Features
//!
//! - Diploid genetics with dominance-weighted expression, crossover and
//!   four mutation categories
//! - Feed-forward and recurrent brains (24 → 8 → 6, tanh) with optional
//!   N-step hidden-state memory
//! - Uniform spatial grids for neighbor queries
//! - Fixed-order tick pipeline, parallel movement with deterministic
//!   per-agent random streams
//! - Disease, epidemics, food blooms and species tracking
//! - Save/load simulation state
//!
//! ## Core Modules
//!
//! - [`simulation::genetics`] - Genes, genomes, expression and inheritance
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::spatial`] - Uniform spatial grid
//! - [`simulation::world`] - World state and the tick entry point
//! - [`simulation::systems`] - The phases of a tick
//! - [`simulation::params`] - Simulation parameters

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state and lifecycle.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Food clusters, temperature and region grids.
    pub mod environment;
    /// Error types.
    pub mod error;
    /// Bounded log of notable world events.
    pub mod event_log;
    /// Food items that agents can consume.
    pub mod food;
    /// Diploid genetics: expression, crossover, mutation, similarity.
    pub mod genetics;
    /// Geometric utility functions for distance calculations.
    pub mod geometric_utils;
    /// Trait for entities with a position.
    ///
    /// The [`locatable::Locatable`] trait is implemented by every entity the
    /// spatial grids index (Agent, Food, WaterSource, Obstacle).
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Seeded random streams.
    pub mod random;
    /// Senses and perception.
    pub mod sensing;
    /// Uniform spatial grids.
    pub mod spatial;
    /// Species classification.
    pub mod species;
    /// Aggregate statistics.
    pub mod stats;
    /// The phases of a tick.
    pub mod systems;
    /// Water sources and obstacles.
    pub mod terrain;
    /// Derived agent values and render-facing views.
    pub mod views;
    /// World state and the tick entry point.
    pub mod world;
}
