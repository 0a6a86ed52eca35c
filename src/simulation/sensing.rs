//! Senses and the perception system that turns them into brain inputs.
//!
//! Senses read a [`SenseContext`], a read-only snapshot of the world taken
//! when the movement phase starts, and each produce a fixed number of
//! activations. [`Perception`] concatenates them in order.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use std::fmt;

use ndarray::Array1;

use super::agent::Agent;
use super::brain::SENSORY_INPUTS;
use super::environment::Environment;
use super::food::Food;
use super::genetics::Trait;
use super::geometric_utils::{Vec2, length, normalize, vec2};
use super::params::Params;
use super::spatial::SpatialIndex;
use super::terrain::{Obstacle, WaterSource};
use super::views;

/// Number of heading-relative sectors.
pub const SECTOR_COUNT: usize = 4;

/// Read-only world state visible to senses.
#[derive(Clone, Copy)]
pub struct SenseContext<'a> {
    /// Simulation parameters.
    pub params: &'a Params,
    /// Temperature and region grids.
    pub environment: &'a Environment,
    /// Spatial grids rebuilt at the start of the tick.
    pub grids: &'a SpatialIndex,
    /// Agent positions at phase entry, indexed like the agent grid.
    pub agent_positions: &'a [Vec2],
    /// Food items, indexed like the food grid.
    pub food: &'a [Food],
    /// Water sources, indexed like the water grid.
    pub water: &'a [WaterSource],
    /// Obstacles, indexed like the obstacle grid.
    pub obstacles: &'a [Obstacle],
}

/// Trait for different sensory modalities that agents can use to perceive
/// their environment.
///
/// Each sense returns a vector of activations that will be fed as inputs to
/// the agent's brain.
pub trait Sense: Sync {
    /// Process sensory information and return neural network inputs.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent doing the sensing
    /// * `index` - Position of the agent in the agent grid
    /// * `ctx` - World snapshot
    ///
    /// # Returns
    ///
    /// A 1D array of exactly [`Sense::input_size`] activations.
    fn sense(&self, agent: &Agent, index: usize, ctx: &SenseContext<'_>) -> Array1<f32>;

    /// Returns the number of neural network inputs this sense produces.
    fn input_size(&self) -> usize;

    /// Returns a human-readable name for this sense.
    fn name(&self) -> &str;
}

/// Sector of `offset` relative to `heading`: 0 front, 1 left, 2 back, 3 right.
pub fn sector_of(heading: Vec2, offset: Vec2) -> usize {
    let forward = offset.x * heading.x + offset.y * heading.y;
    let left = offset.y * heading.x - offset.x * heading.y;
    let angle = left.atan2(forward);
    let shifted = (angle + FRAC_PI_4).rem_euclid(TAU);
    ((shifted / FRAC_PI_2) as usize).min(SECTOR_COUNT - 1)
}

/// Heading of an agent: its direction of travel, or +x when standing still.
pub fn heading(agent: &Agent) -> Vec2 {
    if length(agent.vel) > f32::EPSILON {
        normalize(agent.vel)
    } else {
        vec2(1.0, 0.0)
    }
}

/// Proximity of the nearest food, water, agent and obstacle per sector.
///
/// Activations are `1 - distance / vision_range`, zero when nothing is in
/// range. Water and obstacles are measured to their edge. Layout: four food
/// sectors, four water, four agent, four obstacle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectorSense;

impl SectorSense {
    /// Creates the sense.
    pub fn new() -> Self {
        Self
    }
}

fn record(out: &mut Array1<f32>, channel: usize, sector: usize, distance: f32, range: f32) {
    let proximity = (1.0 - distance / range).clamp(0.0, 1.0);
    let slot = &mut out[channel * SECTOR_COUNT + sector];
    if proximity > *slot {
        *slot = proximity;
    }
}

impl Sense for SectorSense {
    fn sense(&self, agent: &Agent, index: usize, ctx: &SenseContext<'_>) -> Array1<f32> {
        let mut out = Array1::zeros(self.input_size());
        let range = agent.trait_value(Trait::VisionRange);
        if range <= 0.0 {
            return out;
        }
        let heading = heading(agent);
        let pos = agent.pos;

        ctx.grids.food.for_each_within(pos, range, |d2, k| {
            if let Some(item) = ctx.food.get(k) {
                let sector = sector_of(heading, item.pos - pos);
                record(&mut out, 0, sector, d2.sqrt(), range);
            }
        });

        let water_reach = range + ctx.params.world.water_radius_max;
        ctx.grids.water.for_each_within(pos, water_reach, |d2, k| {
            if let Some(source) = ctx.water.get(k) {
                let edge = (d2.sqrt() - source.radius).max(0.0);
                let sector = sector_of(heading, source.pos - pos);
                record(&mut out, 1, sector, edge, range);
            }
        });

        ctx.grids.agents.for_each_within(pos, range, |d2, k| {
            if k == index {
                return;
            }
            if let Some(&other) = ctx.agent_positions.get(k) {
                let sector = sector_of(heading, other - pos);
                record(&mut out, 2, sector, d2.sqrt(), range);
            }
        });

        let obstacle_reach = range + ctx.params.world.obstacle_radius_max;
        ctx.grids.obstacles.for_each_within(pos, obstacle_reach, |d2, k| {
            if let Some(rock) = ctx.obstacles.get(k) {
                let edge = (d2.sqrt() - rock.radius).max(0.0);
                let sector = sector_of(heading, rock.pos - pos);
                record(&mut out, 3, sector, edge, range);
            }
        });

        out
    }

    fn input_size(&self) -> usize {
        4 * SECTOR_COUNT
    }

    fn name(&self) -> &str {
        "Sectors"
    }
}

/// Internal state: energy, hydration, health, age, speed, stress, infection
/// and a constant bias input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalSense;

impl InternalSense {
    /// Creates the sense.
    pub fn new() -> Self {
        Self
    }
}

impl Sense for InternalSense {
    fn sense(&self, agent: &Agent, _index: usize, ctx: &SenseContext<'_>) -> Array1<f32> {
        let params = ctx.params;
        let top_speed = views::effective_max_speed(agent, params, ctx.environment);
        let speed_ratio = if top_speed > 0.0 {
            (length(agent.vel) / top_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Array1::from_vec(vec![
            views::energy_ratio(agent, params),
            views::hydration_ratio(agent, params),
            views::health_ratio(agent, params),
            views::age_ratio(agent, params),
            speed_ratio,
            agent.stress,
            if agent.disease.infected { 1.0 } else { 0.0 },
            1.0,
        ])
    }

    fn input_size(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "Internal"
    }
}

/// Manages multiple senses and combines them into brain inputs.
///
/// The perception system:
/// 1. Queries each sense for its outputs
/// 2. Concatenates all sensory outputs in order
/// 3. Returns a single input vector for the brain
pub struct Perception {
    senses: Vec<Box<dyn Sense>>,
}

impl Perception {
    /// Creates a new perception system with the given senses.
    pub fn new(senses: Vec<Box<dyn Sense>>) -> Self {
        Self { senses }
    }

    /// Process all senses and return combined brain inputs.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent doing the sensing
    /// * `index` - Position of the agent in the agent grid
    /// * `ctx` - World snapshot
    ///
    /// # Returns
    ///
    /// A 1D array containing all sensory activations concatenated in order.
    pub fn perceive(&self, agent: &Agent, index: usize, ctx: &SenseContext<'_>) -> Array1<f32> {
        let mut combined = Array1::zeros(self.total_input_size());
        let mut offset = 0;
        for sense in &self.senses {
            let outputs = sense.sense(agent, index, ctx);
            let size = sense.input_size();
            for (i, &value) in outputs.iter().take(size).enumerate() {
                combined[offset + i] = value;
            }
            offset += size;
        }
        combined
    }

    /// Returns the total number of brain inputs produced by all senses.
    pub fn total_input_size(&self) -> usize {
        self.senses.iter().map(|s| s.input_size()).sum()
    }

    /// Returns a reference to the senses in this perception system.
    pub fn senses(&self) -> &[Box<dyn Sense>] {
        &self.senses
    }
}

impl Default for Perception {
    fn default() -> Self {
        let perception = Self::new(vec![Box::new(SectorSense::new()), Box::new(InternalSense::new())]);
        debug_assert_eq!(perception.total_input_size(), SENSORY_INPUTS);
        perception
    }
}

impl fmt::Debug for Perception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.senses.iter().map(|s| s.name()))
            .finish()
    }
}
