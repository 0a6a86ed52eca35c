//! The world: every entity, the spatial grids and the tick pipeline.
//!
//! [`World::tick`] is the only entry point that advances time. It rebuilds the
//! spatial grids and runs each [`Phase`] in [`Phase::ORDER`]. Phases mark
//! agents dead and food consumed; only the cleanup phase removes anything.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::agent::Agent;
use super::environment::{Environment, random_point};
use super::error::{ConfigError, SimError};
use super::event_log::EventLog;
use super::food::Food;
use super::genetics::{GeneLayout, Genome, TraitTable, genetic_similarity};
use super::geometric_utils::{Vec2, distance};
use super::params::Params;
use super::random::{self, SimRng};
use super::sensing::Perception;
use super::spatial::SpatialIndex;
use super::species::SpeciesTracker;
use super::stats::Statistics;
use super::systems;
use super::terrain::{Obstacle, WaterSource};
use super::views::{self, AgentView};

pub use super::systems::Phase;

/// Attempts to place a founder outside every obstacle before giving up.
const PLACEMENT_ATTEMPTS: usize = 16;

/// State of the population-wide events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventState {
    /// Whether an epidemic is running.
    pub epidemic_active: bool,
    /// Disease spread by the running epidemic.
    pub epidemic_disease: u32,
    /// Seconds left in the running epidemic.
    pub epidemic_timer: f32,
    /// Id handed to the next disease.
    pub next_disease_id: u32,
    /// Seconds until another bloom is allowed.
    pub bloom_timer: f32,
    /// Whether the collapse of the population has been reported.
    pub collapsed: bool,
}

fn default_rng() -> SimRng {
    random::seeded(0)
}

/// The simulated world.
#[derive(Debug, Serialize, Deserialize)]
pub struct World {
    pub(crate) params: Params,
    pub(crate) layout: GeneLayout,
    pub(crate) traits: TraitTable,
    pub(crate) agents: Vec<Agent>,
    pub(crate) food: Vec<Food>,
    pub(crate) water: Vec<WaterSource>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) environment: Environment,
    pub(crate) events: EventState,
    pub(crate) stats: Statistics,
    pub(crate) species: SpeciesTracker,
    pub(crate) event_log: EventLog,
    pub(crate) time: f32,
    pub(crate) tick_count: u64,
    pub(crate) next_agent_id: u64,
    pub(crate) next_food_id: u64,
    #[serde(skip)]
    pub(crate) grids: SpatialIndex,
    #[serde(skip)]
    pub(crate) perception: Perception,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: SimRng,
}

impl World {
    /// Creates a new world with random terrain, food and founders.
    ///
    /// # Arguments
    ///
    /// * `params` - Validated before anything is generated
    ///
    /// # Returns
    ///
    /// The world, or the first configuration error found.
    pub fn new(params: Params) -> Result<Self, SimError> {
        params.validate()?;
        let traits = params.trait_table()?;
        let weight_count = params.brain.kind.weight_count(params.brain.memory_depth);
        let layout = GeneLayout::new(&traits, weight_count)?;
        let mut rng = random::seeded(params.seed);
        let environment = Environment::generate(&params, &mut rng);

        let (width, height) = (params.world.width, params.world.height);
        let water = (0..params.world.water_source_count)
            .map(|i| WaterSource {
                id: i as u64,
                pos: random_point(width, height, &mut rng),
                radius: rng.random_range(params.world.water_radius_min..=params.world.water_radius_max),
            })
            .collect();
        let obstacles = if params.features.obstacles {
            (0..params.world.obstacle_count)
                .map(|i| Obstacle {
                    id: i as u64,
                    pos: random_point(width, height, &mut rng),
                    radius: rng.random_range(
                        params.world.obstacle_radius_min..=params.world.obstacle_radius_max,
                    ),
                })
                .collect()
        } else {
            Vec::new()
        };

        let grids = SpatialIndex::new(width, height, params.world.cell_size);
        let event_log = EventLog::new(params.events.log_capacity);
        let mut world = Self {
            params,
            layout,
            traits,
            agents: Vec::new(),
            food: Vec::new(),
            water,
            obstacles,
            environment,
            events: EventState::default(),
            stats: Statistics::default(),
            species: SpeciesTracker::new(),
            event_log,
            time: 0.0,
            tick_count: 0,
            next_agent_id: 0,
            next_food_id: 0,
            grids,
            perception: Perception::default(),
            rng,
        };

        for _ in 0..world.params.world.initial_food {
            world.spawn_food();
        }
        for _ in 0..world.params.world.initial_population {
            let pos = world.free_position();
            world.spawn_agent(pos)?;
        }

        world.stats.species_count = world.species.classify(
            &mut world.agents,
            &world.layout,
            &world.traits,
            world.params.species.similarity_threshold,
        );
        world.stats.refresh(&world.agents, world.food.len());
        world.rebuild_grids();

        info!(
            agents = world.agents.len(),
            food = world.food.len(),
            water = world.water.len(),
            obstacles = world.obstacles.len(),
            genes = world.layout.locus_count() * 2,
            "world created"
        );
        Ok(world)
    }

    /// Advances the simulation by one timestep.
    ///
    /// Rebuilds the spatial grids, then runs every phase in fixed order.
    /// An empty population ticks as a no-op apart from food regrowth.
    pub fn tick(&mut self, dt: f32) -> Result<(), SimError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "dt",
                reason: "must be a non-negative finite number",
            }
            .into());
        }
        self.rebuild_grids();
        for phase in Phase::ORDER {
            self.run_phase(phase, dt)?;
        }
        self.time += dt;
        self.tick_count += 1;
        debug!(
            tick = self.tick_count,
            population = self.stats.population,
            food = self.stats.food_count,
            births = self.stats.births,
            deaths = self.stats.deaths.total(),
            "tick"
        );
        Ok(())
    }

    /// Runs a single phase against the current grids.
    pub fn run_phase(&mut self, phase: Phase, dt: f32) -> Result<(), SimError> {
        trace!(phase = phase.name(), tick = self.tick_count, "phase");
        systems::run(self, phase, dt)
    }

    /// Rebuilds all four spatial grids from current positions.
    pub fn rebuild_grids(&mut self) {
        self.grids.agents.rebuild(&self.agents);
        self.grids.food.rebuild(&self.food);
        self.grids.water.rebuild(&self.water);
        self.grids.obstacles.rebuild(&self.obstacles);
    }

    /// Adds a founder with a random genome at `pos`.
    ///
    /// # Returns
    ///
    /// The id of the new agent.
    pub fn spawn_agent(&mut self, pos: Vec2) -> Result<u64, SimError> {
        let genome = Genome::random(
            &self.layout,
            &self.traits,
            self.params.genetics.initial_spread,
            self.params.genetics.brain_init_stddev,
            &mut self.rng,
        );
        self.insert_agent(pos, genome, 0)
    }

    /// Adds an agent with the given genome at `pos`.
    ///
    /// # Returns
    ///
    /// The id of the new agent, or an error if the genome does not fit the
    /// world's locus table.
    pub fn insert_agent(&mut self, pos: Vec2, genome: Genome, generation: u32) -> Result<u64, SimError> {
        let id = self.next_agent_id;
        let agent = Agent::new(
            id,
            pos,
            genome,
            generation,
            &self.layout,
            &self.traits,
            &self.params,
            &mut self.rng,
        )?;
        self.next_agent_id += 1;
        self.agents.push(agent);
        Ok(id)
    }

    /// Places one food item around a random cluster centre.
    ///
    /// # Returns
    ///
    /// `false` if there are no clusters to grow food around.
    pub fn spawn_food(&mut self) -> bool {
        let (width, height) = (self.params.world.width, self.params.world.height);
        let Some((pos, cluster)) = self
            .environment
            .food_clusters
            .sample(width, height, &mut self.rng)
        else {
            return false;
        };
        self.food.push(Food::new(
            self.next_food_id,
            pos,
            self.params.world.food_energy,
            cluster,
        ));
        self.next_food_id += 1;
        true
    }

    fn free_position(&mut self) -> Vec2 {
        let (width, height) = (self.params.world.width, self.params.world.height);
        let clearance = self.params.movement.agent_radius * 2.0;
        let mut pos = random_point(width, height, &mut self.rng);
        for _ in 0..PLACEMENT_ATTEMPTS {
            let inside = self.obstacles.iter().any(|rock| {
                distance(rock.pos, pos) < rock.radius + clearance
            });
            if !inside {
                break;
            }
            pos = random_point(width, height, &mut self.rng);
        }
        pos
    }

    /// Genetic similarity of two agents, if both exist.
    pub fn genetic_similarity(&self, a: u64, b: u64) -> Option<f32> {
        let a = self.agent(a)?;
        let b = self.agent(b)?;
        Some(genetic_similarity(&a.genome, &b.genome, &self.layout, &self.traits))
    }

    /// Looks an agent up by id.
    pub fn agent(&self, id: u64) -> Option<&Agent> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|index| &self.agents[index])
    }

    /// Mutable lookup by id.
    pub fn agent_mut(&mut self, id: u64) -> Option<&mut Agent> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|index| &mut self.agents[index])
    }

    /// All agents in ascending id order, including the dead awaiting cleanup.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access to the agents for tools and tests.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Number of living agents.
    pub fn population(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Render-facing snapshots of the living agents.
    pub fn agent_views(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| AgentView::of(a, &self.params))
            .collect()
    }

    /// Top speed of an agent at its current position.
    pub fn effective_max_speed(&self, agent: &Agent) -> f32 {
        views::effective_max_speed(agent, &self.params, &self.environment)
    }

    /// Food items.
    pub fn food(&self) -> &[Food] {
        &self.food
    }

    /// Water sources.
    pub fn water(&self) -> &[WaterSource] {
        &self.water
    }

    /// Obstacles.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Environmental grids and food clusters.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Spatial grids as of the last rebuild.
    pub fn grids(&self) -> &SpatialIndex {
        &self.grids
    }

    /// Immutable parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Locus table shared by every genome.
    pub fn layout(&self) -> &GeneLayout {
        &self.layout
    }

    /// Validated trait table.
    pub fn traits(&self) -> &TraitTable {
        &self.traits
    }

    /// Aggregate statistics.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Recent world events.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Epidemic and bloom state.
    pub fn event_state(&self) -> &EventState {
        &self.events
    }

    /// Total simulation time elapsed.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Ticks completed.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Saves the world state to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a world state from a JSON file.
    ///
    /// Grids are rebuilt and the random stream resumes from `(seed, tick)`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let mut world: World = serde_json::from_str(&json)?;
        world.params.validate()?;
        let traits = world.params.trait_table()?;
        let weight_count = world
            .params
            .brain
            .kind
            .weight_count(world.params.brain.memory_depth);
        let layout = GeneLayout::new(&traits, weight_count)?;
        if traits != world.traits || layout != world.layout {
            return Err(ConfigError::InvalidParameter {
                name: "genetics.traits",
                reason: "saved trait table or gene layout does not match the parameters",
            }
            .into());
        }
        for agent in &world.agents {
            agent.genome.validate(&world.layout)?;
        }
        world.rng = random::resume(world.params.seed, world.tick_count);
        world.grids = SpatialIndex::new(
            world.params.world.width,
            world.params.world.height,
            world.params.world.cell_size,
        );
        world.rebuild_grids();
        Ok(world)
    }
}
