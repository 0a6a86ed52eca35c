//! Derived agent values.
//!
//! Nothing here is stored on the agent. Every value is recomputed from the
//! agent's stored fields, its phenotype and the parameters, so a somatic
//! mutation or a region change is reflected immediately.

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::environment::Environment;
use super::genetics::{Phenotype, Sex, Trait};
use super::geometric_utils::{Vec2, length};
use super::params::Params;

/// Collision and reach radius of the agent's body.
#[inline]
pub fn body_radius(phenotype: &Phenotype, params: &Params) -> f32 {
    params.movement.agent_radius * phenotype.get(Trait::Size)
}

/// Health cap, scaled by body size.
#[inline]
pub fn max_health(phenotype: &Phenotype, params: &Params) -> f32 {
    params.combat.max_health * phenotype.get(Trait::Size)
}

/// Top speed before region modifiers.
#[inline]
pub fn base_max_speed(phenotype: &Phenotype, params: &Params) -> f32 {
    params.movement.max_speed * phenotype.get(Trait::Speed)
}

/// Top speed at the agent's current position.
pub fn effective_max_speed(agent: &Agent, params: &Params, environment: &Environment) -> f32 {
    base_max_speed(&agent.phenotype, params)
        * environment.speed_factor(&params.environment, agent.pos)
}

/// Age at which the agent dies of old age.
#[inline]
pub fn lifespan(phenotype: &Phenotype, params: &Params) -> f32 {
    params.aging.max_age.min(phenotype.get(Trait::MaxAge))
}

/// Energy as a fraction of the cap.
#[inline]
pub fn energy_ratio(agent: &Agent, params: &Params) -> f32 {
    (agent.energy / params.energy.max_energy).clamp(0.0, 1.0)
}

/// Hydration as a fraction of the cap.
#[inline]
pub fn hydration_ratio(agent: &Agent, params: &Params) -> f32 {
    (agent.hydration / params.hydration.max_hydration).clamp(0.0, 1.0)
}

/// Health as a fraction of the size-scaled cap.
#[inline]
pub fn health_ratio(agent: &Agent, params: &Params) -> f32 {
    let cap = max_health(&agent.phenotype, params);
    if cap > 0.0 {
        (agent.health / cap).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Age as a fraction of the lifespan.
#[inline]
pub fn age_ratio(agent: &Agent, params: &Params) -> f32 {
    let span = lifespan(&agent.phenotype, params);
    if span > 0.0 {
        (agent.age / span).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Hue in `[0, 1)` for a species id, spread by the golden ratio.
#[inline]
pub fn species_hue(species: u32) -> f32 {
    (species as f32 * 0.618_034).fract()
}

/// Read-only snapshot of an agent for renderers and tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Agent identifier.
    pub id: u64,
    /// Position.
    pub pos: Vec2,
    /// Velocity.
    pub vel: Vec2,
    /// Body radius.
    pub radius: f32,
    /// Species identifier.
    pub species: u32,
    /// Species hue in `[0, 1)`.
    pub hue: f32,
    /// Sex.
    pub sex: Sex,
    /// Health fraction.
    pub health_ratio: f32,
    /// Energy fraction.
    pub energy_ratio: f32,
    /// Hydration fraction.
    pub hydration_ratio: f32,
    /// Current speed.
    pub speed: f32,
    /// Infection flag.
    pub infected: bool,
    /// Generation number.
    pub generation: u32,
}

impl AgentView {
    /// Builds the view of an agent.
    pub fn of(agent: &Agent, params: &Params) -> Self {
        Self {
            id: agent.id,
            pos: agent.pos,
            vel: agent.vel,
            radius: body_radius(&agent.phenotype, params),
            species: agent.species,
            hue: species_hue(agent.species),
            sex: agent.genome.sex,
            health_ratio: health_ratio(agent, params),
            energy_ratio: energy_ratio(agent, params),
            hydration_ratio: hydration_ratio(agent, params),
            speed: length(agent.vel),
            infected: agent.disease.infected,
            generation: agent.generation,
        }
    }
}
