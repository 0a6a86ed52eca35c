//! Agent state and lifecycle.
//!
//! Agents own their genome, derived phenotype, brain and memory. They are
//! never removed mid-tick: a dying agent records its [`DeathCause`] and stays
//! in the population, inert, until the cleanup phase drops it.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::{Brain, HIDDEN_SIZE, MemoryBuffer, OUTPUT_SIZE, Output, SENSORY_INPUTS};
use super::error::SimError;
use super::genetics::{GeneLayout, Genome, Phenotype, Trait, TraitTable, derive_phenotype};
use super::geometric_utils::{Vec2, vec2};
use super::locatable::Locatable;
use super::params::Params;
use super::views;

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Energy reached zero.
    Starvation,
    /// Hydration reached zero.
    Dehydration,
    /// Age reached the lifespan.
    OldAge,
    /// Health reached zero in combat.
    Combat,
    /// Energy drained to zero by an infection.
    Disease,
}

/// Infection state of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseStatus {
    /// Whether the agent currently carries a disease.
    pub infected: bool,
    /// Identifier of the carried disease (meaningless when not infected).
    pub disease_id: u32,
    /// Seconds until recovery.
    pub recovery_timer: f32,
}

/// A simulated agent with a genetically encoded brain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique, sequential identifier.
    pub id: u64,
    /// Position in 2D space.
    pub pos: Vec2,
    /// Velocity in units per second.
    pub vel: Vec2,
    /// Diploid genome.
    pub genome: Genome,
    /// Clamped trait values derived from the genome.
    pub phenotype: Phenotype,
    /// Neural network that controls behavior.
    pub brain: Brain,
    /// Past hidden states fed back as inputs.
    pub memory: MemoryBuffer,
    /// Current energy (dies at zero).
    pub energy: f32,
    /// Current hydration (dies at zero).
    pub hydration: f32,
    /// Current health (dies at zero).
    pub health: f32,
    /// Time alive in simulation seconds.
    pub age: f32,
    /// Founders are generation 0.
    pub generation: u32,
    /// Stress in `[0, 1]` derived from recent damage.
    pub stress: f32,
    /// Decaying sum of damage taken.
    pub recent_damage: f32,
    /// Mutations inherited at birth plus somatic mutations.
    pub mutation_count: u32,
    /// Infection state.
    pub disease: DiseaseStatus,
    /// Seconds until the agent may mate again.
    pub reproduction_cooldown: f32,
    /// Species identifier assigned by the species tracker.
    pub species: u32,
    /// Brain inputs of the last movement phase.
    pub last_inputs: Array1<f32>,
    /// Brain outputs of the last movement phase.
    pub last_outputs: Array1<f32>,
    /// Set once the agent dies.
    pub death: Option<DeathCause>,
}

impl Agent {
    /// Creates an agent from a genome.
    ///
    /// The phenotype and brain are derived from the genome; energy and
    /// hydration start at the configured initial values and health at the
    /// size-scaled maximum.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier
    /// * `pos` - Starting position
    /// * `genome` - Genome owned by the new agent
    /// * `generation` - Generation number
    /// * `layout` - Locus table
    /// * `traits` - Trait ranges
    /// * `params` - Simulation parameters
    /// * `rng` - Random stream for the initial hidden state
    ///
    /// # Returns
    ///
    /// The new agent, or an error if the genome or brain shape is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng + ?Sized>(
        id: u64,
        pos: Vec2,
        genome: Genome,
        generation: u32,
        layout: &GeneLayout,
        traits: &TraitTable,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        genome.validate(layout)?;
        let phenotype = derive_phenotype(&genome, layout, traits);
        let brain = Brain::from_weights(&params.brain, &genome.brain_weights(layout), rng)?;
        let health = views::max_health(&phenotype, params);
        Ok(Self {
            id,
            pos,
            vel: vec2(0.0, 0.0),
            genome,
            phenotype,
            brain,
            memory: MemoryBuffer::new(params.brain.memory_depth, HIDDEN_SIZE),
            energy: params.energy.initial_energy,
            hydration: params.hydration.initial_hydration,
            health,
            age: 0.0,
            generation,
            stress: 0.0,
            recent_damage: 0.0,
            mutation_count: 0,
            disease: DiseaseStatus::default(),
            reproduction_cooldown: 0.0,
            species: 0,
            last_inputs: Array1::zeros(SENSORY_INPUTS),
            last_outputs: Array1::zeros(OUTPUT_SIZE),
            death: None,
        })
    }

    /// Checks if the agent is alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Marks the agent dead. The first recorded cause wins.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            self.death = Some(cause);
        }
    }

    /// Value of a trait.
    #[inline]
    pub fn trait_value(&self, name: Trait) -> f32 {
        self.phenotype.get(name)
    }

    /// Last brain output for `output`, or zero before the first think.
    #[inline]
    pub fn output(&self, output: Output) -> f32 {
        self.last_outputs
            .get(output as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Effort mapped from `[-1, 1]` to `[0, 1]`.
    #[inline]
    pub fn effort(&self) -> f32 {
        ((self.output(Output::Effort) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Whether the attack drive is active.
    #[inline]
    pub fn wants_attack(&self) -> bool {
        self.output(Output::Attack) > 0.5
    }

    /// Whether the mate drive is active.
    #[inline]
    pub fn wants_mate(&self) -> bool {
        self.output(Output::Mate) > 0.5
    }

    /// Whether the rest drive is active.
    #[inline]
    pub fn is_resting(&self) -> bool {
        self.output(Output::Rest) > 0.5
    }

    /// Whether the agent has reached its genetic maturity age.
    #[inline]
    pub fn is_mature(&self) -> bool {
        self.age >= self.phenotype.get(Trait::MaturityAge)
    }

    /// Increments the agent's age.
    ///
    /// # Arguments
    ///
    /// * `dt` - Time delta in seconds
    pub fn age_by(&mut self, dt: f32) {
        self.age += dt;
    }

    /// Reduces the agent's energy, never below zero.
    ///
    /// # Arguments
    ///
    /// * `amount` - Energy to subtract
    pub fn consume_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }

    /// Increases the agent's energy up to a maximum.
    ///
    /// # Arguments
    ///
    /// * `amount` - Energy to add
    /// * `max_energy` - Maximum energy cap
    pub fn gain_energy(&mut self, amount: f32, max_energy: f32) {
        self.energy = (self.energy + amount).min(max_energy);
    }

    /// Changes hydration by `amount`, clamped to `[0, max_hydration]`.
    pub fn change_hydration(&mut self, amount: f32, max_hydration: f32) {
        self.hydration = (self.hydration + amount).clamp(0.0, max_hydration);
    }

    /// Applies damage to health and the recent-damage accumulator.
    ///
    /// # Returns
    ///
    /// `true` if the damage was lethal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.recent_damage += amount;
        self.health <= 0.0
    }

    /// Infects the agent unless it is already infected.
    ///
    /// # Returns
    ///
    /// `true` if a new infection started.
    pub fn infect(&mut self, disease_id: u32, recovery_time: f32) -> bool {
        if self.disease.infected {
            return false;
        }
        self.disease = DiseaseStatus {
            infected: true,
            disease_id,
            recovery_timer: recovery_time,
        };
        true
    }

    /// Counts the recovery timer down and clears the infection at zero.
    pub fn update_disease(&mut self, dt: f32) {
        if self.disease.infected {
            self.disease.recovery_timer -= dt;
            if self.disease.recovery_timer <= 0.0 {
                self.disease = DiseaseStatus::default();
            }
        }
    }

    /// Decays recent damage and recomputes stress.
    ///
    /// # Arguments
    ///
    /// * `decay_rate` - Fraction of recent damage forgotten per second
    /// * `damage_scale` - Recent damage that maps to stress 1.0
    /// * `dt` - Time delta in seconds
    pub fn update_stress(&mut self, decay_rate: f32, damage_scale: f32, dt: f32) {
        self.recent_damage *= (1.0 - decay_rate * dt).max(0.0);
        self.stress = if damage_scale > 0.0 {
            (self.recent_damage / damage_scale).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Decrements the reproduction cooldown timer.
    pub fn update_cooldown(&mut self, dt: f32) {
        self.reproduction_cooldown = (self.reproduction_cooldown - dt).max(0.0);
    }
}

impl Locatable for Agent {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn is_active(&self) -> bool {
        self.is_alive()
    }
}
