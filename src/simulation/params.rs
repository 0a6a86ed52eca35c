//! Simulation parameters.
//!
//! A [`Params`] value is supplied once to [`World::new`](super::world::World::new)
//! and never mutated by the kernel. Parameters are grouped by the system that
//! reads them; every group has a sensible [`Default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::BrainKind;
use super::error::{ConfigError, SimError};
use super::genetics::{Trait, TraitSpec, TraitTable};

/// Simulation parameters that control world behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Seed of the world random stream.
    pub seed: u64,
    /// World extent, populations and resources.
    pub world: WorldParams,
    /// Mutation, crossover and trait table.
    pub genetics: GeneticsParams,
    /// Brain architecture.
    pub brain: BrainParams,
    /// Steering and speed limits.
    pub movement: MovementParams,
    /// Energy budget and metabolism.
    pub energy: EnergyParams,
    /// Water budget.
    pub hydration: HydrationParams,
    /// Combat constants.
    pub combat: CombatParams,
    /// Mating rules.
    pub reproduction: ReproductionParams,
    /// Lifespan.
    pub aging: AgingParams,
    /// Disease transmission.
    pub disease: DiseaseParams,
    /// Population-wide events.
    pub events: EventParams,
    /// Temperature and region grids.
    pub environment: EnvironmentParams,
    /// Species classification.
    pub species: SpeciesParams,
    /// Toggles for optional systems.
    pub features: FeatureFlags,
}

/// World extent, populations and resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldParams {
    /// Simulation area width.
    pub width: f32,
    /// Simulation area height.
    pub height: f32,
    /// Edge length of a spatial grid cell.
    pub cell_size: f32,
    /// Agents created at world construction.
    pub initial_population: usize,
    /// Hard population cap enforced by reproduction.
    pub max_population: usize,
    /// Food items created at world construction.
    pub initial_food: usize,
    /// Food count that cleanup replenishes towards.
    pub target_food: usize,
    /// Food items respawned per second while below target.
    pub food_respawn_rate: f32,
    /// Energy value of one food item.
    pub food_energy: f32,
    /// Number of food cluster centres.
    pub food_cluster_count: usize,
    /// Standard deviation of food placement around a cluster centre.
    pub food_cluster_spread: f32,
    /// Number of water sources.
    pub water_source_count: usize,
    /// Smallest water source radius.
    pub water_radius_min: f32,
    /// Largest water source radius.
    pub water_radius_max: f32,
    /// Number of obstacles.
    pub obstacle_count: usize,
    /// Smallest obstacle radius.
    pub obstacle_radius_min: f32,
    /// Largest obstacle radius.
    pub obstacle_radius_max: f32,
}

/// Mutation, crossover and trait table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticsParams {
    /// Per-gene probability of a mutation event.
    pub mutation_rate: f32,
    /// Standard deviation of point mutations.
    pub point_stddev: f32,
    /// Standard deviation of dominance mutations.
    pub dominance_stddev: f32,
    /// Standard deviation of large-effect mutations.
    pub large_stddev: f32,
    /// Per-pair probability of crossing over.
    pub crossover_rate: f32,
    /// Per-tick probability of an in-life mutation pass.
    pub somatic_mutation_chance: f32,
    /// Magnitude scale of in-life mutations.
    pub somatic_scale: f32,
    /// Initial allele spread as a fraction of the trait range.
    pub initial_spread: f32,
    /// Standard deviation of initial brain-weight alleles.
    pub brain_init_stddev: f32,
    /// Trait ranges, defaults and gene counts.
    pub traits: Vec<TraitSpec>,
}

/// Brain architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainParams {
    /// Feed-forward or recurrent.
    pub kind: BrainKind,
    /// Number of past hidden states appended to the inputs.
    pub memory_depth: usize,
    /// Standard deviation of the initial recurrent hidden state.
    pub initial_hidden_std: f32,
    /// Standard deviation of per-step recurrent noise.
    pub hidden_noise_std: f32,
}

/// Steering and speed limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementParams {
    /// Speed of an agent with speed trait 1.0.
    pub max_speed: f32,
    /// How quickly velocity converges towards the desired velocity (1/s).
    pub steering_rate: f32,
    /// Body radius of an agent with size trait 1.0.
    pub agent_radius: f32,
    /// Energy cost per second at full speed and full effort.
    pub move_energy_cost: f32,
}

/// Energy budget and metabolism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyParams {
    /// Energy cap.
    pub max_energy: f32,
    /// Energy of initial agents.
    pub initial_energy: f32,
    /// Basal drain per second for a size 1.0 agent.
    pub drain_base: f32,
    /// Reach of the feeding system.
    pub eating_distance: f32,
    /// Extra drain fraction at stress 1.0.
    pub stress_drain_factor: f32,
    /// Drain multiplier while resting.
    pub rest_drain_factor: f32,
    /// Fraction of recent damage forgotten per second.
    pub damage_decay_rate: f32,
    /// Recent damage that maps to stress 1.0.
    pub stress_damage_scale: f32,
}

/// Water budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationParams {
    /// Hydration cap.
    pub max_hydration: f32,
    /// Hydration of initial agents.
    pub initial_hydration: f32,
    /// Drain per second.
    pub drain_rate: f32,
    /// Gain per second while inside a water source.
    pub drink_rate: f32,
}

/// Combat constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatParams {
    /// Reach of an attack.
    pub attack_distance: f32,
    /// Damage per second of a size 1.0 attacker at full aggression and effort.
    pub base_damage: f32,
    /// Energy an attacker spends per second of attacking at full effort.
    pub attack_energy_cost: f32,
    /// Fraction of damage absorbed at armor 1.0.
    pub armor_factor: f32,
    /// Relative spread of the random damage factor.
    pub damage_variance: f32,
    /// Energy transferred to the attacker on a kill.
    pub kill_energy_gain: f32,
    /// Health of a size 1.0 agent.
    pub max_health: f32,
}

/// Mating rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproductionParams {
    /// Maximum distance between partners.
    pub mating_distance: f32,
    /// Seconds before a parent may mate again.
    pub cooldown: f32,
    /// Minimum energy as a fraction of the cap.
    pub energy_threshold: f32,
    /// Minimum hydration as a fraction of the cap.
    pub hydration_threshold: f32,
    /// Energy each parent pays per mating.
    pub energy_cost: f32,
    /// Starting energy of an offspring.
    pub offspring_energy: f32,
    /// Starting hydration of an offspring.
    pub offspring_hydration: f32,
    /// Upper bound on offspring per mating.
    pub max_simultaneous_offspring: usize,
    /// Offspring are placed within this radius of the mother.
    pub spawn_radius: f32,
}

/// Lifespan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingParams {
    /// Global age limit in seconds.
    pub max_age: f32,
}

/// Disease transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseParams {
    /// Reach of transmission.
    pub transmission_radius: f32,
    /// Infection probability per second of exposure at zero resistance.
    pub transmission_rate: f32,
    /// Energy drain per second at zero resistance.
    pub energy_drain: f32,
    /// Seconds until an infected agent recovers.
    pub recovery_time: f32,
}

/// Population-wide events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventParams {
    /// Population above which an epidemic may break out.
    pub epidemic_population_threshold: usize,
    /// Outbreak probability per second above the threshold.
    pub epidemic_chance: f32,
    /// Fraction of the population infected at outbreak.
    pub epidemic_infect_fraction: f32,
    /// Seconds an epidemic stays active.
    pub epidemic_duration: f32,
    /// Population below which a food bloom is triggered.
    pub bloom_population_threshold: usize,
    /// Food items added by a bloom.
    pub bloom_food_amount: usize,
    /// Minimum seconds between blooms.
    pub bloom_cooldown: f32,
    /// Entries kept in the event log.
    pub log_capacity: usize,
}

/// Temperature and region grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentParams {
    /// Cell size of the temperature grid.
    pub temperature_cell_size: f32,
    /// Temperature at the top edge of the world.
    pub base_temperature: f32,
    /// Temperature increase from top to bottom edge.
    pub temperature_gradient: f32,
    /// Standard deviation of per-cell temperature noise.
    pub temperature_noise: f32,
    /// Temperature with no extra drain.
    pub comfort_temperature: f32,
    /// Extra drain fraction per degree away from comfort.
    pub temperature_drain_factor: f32,
    /// Cell size of the region grid.
    pub region_cell_size: f32,
    /// Speed multiplier inside forest.
    pub forest_speed: f32,
    /// Speed multiplier inside desert.
    pub desert_speed: f32,
    /// Hydration drain multiplier inside desert.
    pub desert_thirst_factor: f32,
}

/// Species classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Minimum genetic similarity to join a species.
    pub similarity_threshold: f32,
    /// Ticks between reclassifications.
    pub interval: u64,
}

/// Toggles for optional systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeatureFlags {
    /// Run the combat phase.
    pub combat: bool,
    /// Run the disease phase.
    pub disease: bool,
    /// Run the events phase.
    pub events: bool,
    /// Run the somatic mutation phase.
    pub somatic_mutation: bool,
    /// Place obstacles.
    pub obstacles: bool,
    /// Generate a temperature grid.
    pub temperature: bool,
    /// Generate a region grid.
    pub regions: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 42,
            world: WorldParams::default(),
            genetics: GeneticsParams::default(),
            brain: BrainParams::default(),
            movement: MovementParams::default(),
            energy: EnergyParams::default(),
            hydration: HydrationParams::default(),
            combat: CombatParams::default(),
            reproduction: ReproductionParams::default(),
            aging: AgingParams::default(),
            disease: DiseaseParams::default(),
            events: EventParams::default(),
            environment: EnvironmentParams::default(),
            species: SpeciesParams::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            cell_size: 50.0,
            initial_population: 80,
            max_population: 400,
            initial_food: 250,
            target_food: 250,
            food_respawn_rate: 15.0,
            food_energy: 30.0,
            food_cluster_count: 6,
            food_cluster_spread: 60.0,
            water_source_count: 5,
            water_radius_min: 25.0,
            water_radius_max: 50.0,
            obstacle_count: 8,
            obstacle_radius_min: 10.0,
            obstacle_radius_max: 30.0,
        }
    }
}

impl Default for GeneticsParams {
    fn default() -> Self {
        Self {
            mutation_rate: 0.02,
            point_stddev: 0.1,
            dominance_stddev: 0.1,
            large_stddev: 0.5,
            crossover_rate: 0.7,
            somatic_mutation_chance: 0.001,
            somatic_scale: 0.5,
            initial_spread: 0.15,
            brain_init_stddev: 0.5,
            traits: default_traits(),
        }
    }
}

/// Default trait table: two loci per trait.
pub fn default_traits() -> Vec<TraitSpec> {
    vec![
        TraitSpec::new(Trait::Size, 0.5, 2.0, 1.0, 2),
        TraitSpec::new(Trait::Speed, 0.5, 2.0, 1.0, 2),
        TraitSpec::new(Trait::Efficiency, 0.5, 1.5, 1.0, 2),
        TraitSpec::new(Trait::MaxAge, 60.0, 600.0, 300.0, 2),
        TraitSpec::new(Trait::MaturityAge, 5.0, 60.0, 20.0, 2),
        TraitSpec::new(Trait::Aggression, 0.0, 1.0, 0.3, 2),
        TraitSpec::new(Trait::Armor, 0.0, 1.0, 0.2, 2),
        TraitSpec::new(Trait::DiseaseResistance, 0.0, 1.0, 0.3, 2),
        TraitSpec::new(Trait::VisionRange, 20.0, 150.0, 80.0, 2),
        TraitSpec::new(Trait::Fertility, 0.0, 1.0, 0.3, 2),
    ]
}

impl Default for BrainParams {
    fn default() -> Self {
        Self {
            kind: BrainKind::Recurrent,
            memory_depth: 0,
            initial_hidden_std: 0.1,
            hidden_noise_std: 0.0,
        }
    }
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            max_speed: 60.0,
            steering_rate: 4.0,
            agent_radius: 4.0,
            move_energy_cost: 0.6,
        }
    }
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            initial_energy: 80.0,
            drain_base: 0.8,
            eating_distance: 10.0,
            stress_drain_factor: 0.5,
            rest_drain_factor: 0.5,
            damage_decay_rate: 0.5,
            stress_damage_scale: 30.0,
        }
    }
}

impl Default for HydrationParams {
    fn default() -> Self {
        Self {
            max_hydration: 100.0,
            initial_hydration: 80.0,
            drain_rate: 0.8,
            drink_rate: 20.0,
        }
    }
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            attack_distance: 12.0,
            base_damage: 20.0,
            attack_energy_cost: 2.0,
            armor_factor: 0.7,
            damage_variance: 0.2,
            kill_energy_gain: 40.0,
            max_health: 100.0,
        }
    }
}

impl Default for ReproductionParams {
    fn default() -> Self {
        Self {
            mating_distance: 15.0,
            cooldown: 20.0,
            energy_threshold: 0.6,
            hydration_threshold: 0.5,
            energy_cost: 25.0,
            offspring_energy: 50.0,
            offspring_hydration: 60.0,
            max_simultaneous_offspring: 2,
            spawn_radius: 6.0,
        }
    }
}

impl Default for AgingParams {
    fn default() -> Self {
        Self { max_age: 500.0 }
    }
}

impl Default for DiseaseParams {
    fn default() -> Self {
        Self {
            transmission_radius: 20.0,
            transmission_rate: 0.4,
            energy_drain: 1.5,
            recovery_time: 30.0,
        }
    }
}

impl Default for EventParams {
    fn default() -> Self {
        Self {
            epidemic_population_threshold: 300,
            epidemic_chance: 0.01,
            epidemic_infect_fraction: 0.1,
            epidemic_duration: 60.0,
            bloom_population_threshold: 10,
            bloom_food_amount: 60,
            bloom_cooldown: 30.0,
            log_capacity: 50,
        }
    }
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            temperature_cell_size: 100.0,
            base_temperature: 5.0,
            temperature_gradient: 30.0,
            temperature_noise: 2.0,
            comfort_temperature: 20.0,
            temperature_drain_factor: 0.02,
            region_cell_size: 125.0,
            forest_speed: 0.7,
            desert_speed: 0.9,
            desert_thirst_factor: 1.5,
        }
    }
}

impl Default for SpeciesParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            interval: 50,
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            combat: true,
            disease: true,
            events: true,
            somatic_mutation: true,
            obstacles: true,
            temperature: false,
            regions: false,
        }
    }
}

fn positive(value: f32, name: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "must be a positive finite number",
        })
    }
}

fn probability(value: f32, name: &'static str) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "must lie in [0, 1]",
        })
    }
}

fn ordered(lo: f32, hi: f32, name: &'static str) -> Result<(), ConfigError> {
    if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "minimum must be non-negative and not exceed maximum",
        })
    }
}

impl Params {
    /// Loads parameters from a JSON file and validates them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let params: Params = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves parameters to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Builds the validated trait table.
    pub fn trait_table(&self) -> Result<TraitTable, ConfigError> {
        TraitTable::new(&self.genetics.traits)
    }

    /// Checks every parameter the kernel relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        positive(w.width, "world.width")?;
        positive(w.height, "world.height")?;
        positive(w.cell_size, "world.cell_size")?;
        positive(w.food_energy, "world.food_energy")?;
        ordered(w.water_radius_min, w.water_radius_max, "world.water_radius")?;
        ordered(
            w.obstacle_radius_min,
            w.obstacle_radius_max,
            "world.obstacle_radius",
        )?;
        if w.initial_population > w.max_population {
            return Err(ConfigError::InvalidParameter {
                name: "world.initial_population",
                reason: "cannot exceed world.max_population",
            });
        }
        if w.food_cluster_count == 0 && w.initial_food > 0 {
            return Err(ConfigError::InvalidParameter {
                name: "world.food_cluster_count",
                reason: "at least one cluster is required to place food",
            });
        }

        let g = &self.genetics;
        probability(g.mutation_rate, "genetics.mutation_rate")?;
        probability(g.crossover_rate, "genetics.crossover_rate")?;
        probability(g.somatic_mutation_chance, "genetics.somatic_mutation_chance")?;
        self.trait_table()?;

        if self.brain.memory_depth > 8 {
            return Err(ConfigError::InvalidParameter {
                name: "brain.memory_depth",
                reason: "must not exceed 8",
            });
        }

        positive(self.movement.max_speed, "movement.max_speed")?;
        positive(self.movement.agent_radius, "movement.agent_radius")?;
        positive(self.energy.max_energy, "energy.max_energy")?;
        positive(self.hydration.max_hydration, "hydration.max_hydration")?;
        positive(self.combat.max_health, "combat.max_health")?;
        probability(self.combat.armor_factor, "combat.armor_factor")?;
        probability(
            self.reproduction.energy_threshold,
            "reproduction.energy_threshold",
        )?;
        probability(
            self.reproduction.hydration_threshold,
            "reproduction.hydration_threshold",
        )?;
        if self.reproduction.max_simultaneous_offspring == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "reproduction.max_simultaneous_offspring",
                reason: "must be at least 1",
            });
        }
        positive(self.aging.max_age, "aging.max_age")?;
        positive(self.disease.recovery_time, "disease.recovery_time")?;
        probability(
            self.events.epidemic_infect_fraction,
            "events.epidemic_infect_fraction",
        )?;
        positive(
            self.environment.temperature_cell_size,
            "environment.temperature_cell_size",
        )?;
        positive(
            self.environment.region_cell_size,
            "environment.region_cell_size",
        )?;
        probability(
            self.species.similarity_threshold,
            "species.similarity_threshold",
        )?;
        Ok(())
    }
}
