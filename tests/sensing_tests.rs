#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evosphere::simulation::agent::Agent;
use evosphere::simulation::brain::SENSORY_INPUTS;
use evosphere::simulation::food::Food;
use evosphere::simulation::genetics::Trait;
use evosphere::simulation::geometric_utils::{Vec2, vec2};
use evosphere::simulation::params::Params;
use evosphere::simulation::sensing::{
    InternalSense, Perception, SECTOR_COUNT, SectorSense, Sense, SenseContext, sector_of,
};
use evosphere::simulation::spatial::SpatialIndex;
use evosphere::simulation::terrain::{Obstacle, WaterSource};
use evosphere::simulation::world::World;

fn create_test_params() -> Params {
    let mut params = Params::default();
    params.world.width = 300.0;
    params.world.height = 300.0;
    params.world.initial_population = 0;
    params.world.initial_food = 0;
    params.features.obstacles = false;
    params
}

struct Scene {
    food: Vec<Food>,
    water: Vec<WaterSource>,
    obstacles: Vec<Obstacle>,
    positions: Vec<Vec2>,
    grids: SpatialIndex,
}

impl Scene {
    fn new(params: &Params, agents: &[Agent]) -> Self {
        let grids = SpatialIndex::new(params.world.width, params.world.height, params.world.cell_size);
        Self {
            food: Vec::new(),
            water: Vec::new(),
            obstacles: Vec::new(),
            positions: agents.iter().map(|a| a.pos).collect(),
            grids,
        }
    }

    fn index(&mut self, agents: &[Agent]) {
        self.grids.agents.rebuild(agents);
        self.grids.food.rebuild(&self.food);
        self.grids.water.rebuild(&self.water);
        self.grids.obstacles.rebuild(&self.obstacles);
    }

    fn context<'a>(&'a self, world: &'a World) -> SenseContext<'a> {
        SenseContext {
            params: world.params(),
            environment: world.environment(),
            grids: &self.grids,
            agent_positions: &self.positions,
            food: &self.food,
            water: &self.water,
            obstacles: &self.obstacles,
        }
    }
}

fn spawn(world: &mut World, pos: Vec2) -> Agent {
    let id = world.spawn_agent(pos).unwrap();
    world.agent(id).unwrap().clone()
}

#[test]
fn test_sector_of() {
    let heading = vec2(1.0, 0.0);
    assert_eq!(sector_of(heading, vec2(5.0, 0.0)), 0);
    assert_eq!(sector_of(heading, vec2(0.0, 5.0)), 1);
    assert_eq!(sector_of(heading, vec2(-5.0, 0.0)), 2);
    assert_eq!(sector_of(heading, vec2(0.0, -5.0)), 3);

    // Sectors turn with the heading.
    let north = vec2(0.0, 1.0);
    assert_eq!(sector_of(north, vec2(0.0, 5.0)), 0);
    assert_eq!(sector_of(north, vec2(-5.0, 0.0)), 1);
}

#[test]
fn test_default_perception_size() {
    let perception = Perception::default();
    assert_eq!(perception.total_input_size(), SENSORY_INPUTS);
    assert_eq!(perception.senses().len(), 2);
    assert_eq!(SectorSense::new().input_size(), 4 * SECTOR_COUNT);
    assert_eq!(InternalSense::new().input_size(), 8);
}

#[test]
fn test_food_ahead_is_seen_in_front_sector() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let agent = spawn(&mut world, vec2(100.0, 100.0));
    let agents = vec![agent];

    let mut scene = Scene::new(&params, &agents);
    scene.food.push(Food::new(0, vec2(110.0, 100.0), 10.0, 0));
    scene.index(&agents);
    let ctx = scene.context(&world);

    let out = SectorSense::new().sense(&agents[0], 0, &ctx);
    let range = agents[0].trait_value(Trait::VisionRange);
    assert!((out[0] - (1.0 - 10.0 / range)).abs() < 1e-5);
    assert!(out.iter().skip(1).all(|&v| v == 0.0));
}

#[test]
fn test_agent_does_not_see_itself() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let first = spawn(&mut world, vec2(100.0, 100.0));
    let second = spawn(&mut world, vec2(90.0, 100.0));
    let agents = vec![first, second];

    let mut scene = Scene::new(&params, &agents);
    scene.index(&agents);
    let ctx = scene.context(&world);

    let out = SectorSense::new().sense(&agents[0], 0, &ctx);
    let agent_channel = 2 * SECTOR_COUNT;
    // The other agent stands behind.
    assert!(out[agent_channel + 2] > 0.0);
    assert_eq!(out[agent_channel], 0.0);
    assert_eq!(out[agent_channel + 1], 0.0);
    assert_eq!(out[agent_channel + 3], 0.0);
}

#[test]
fn test_water_is_measured_to_its_edge() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let agent = spawn(&mut world, vec2(100.0, 100.0));
    let agents = vec![agent];

    let mut scene = Scene::new(&params, &agents);
    scene.water.push(WaterSource {
        id: 0,
        pos: vec2(100.0, 80.0),
        radius: 25.0,
    });
    scene.index(&agents);
    let ctx = scene.context(&world);

    let out = SectorSense::new().sense(&agents[0], 0, &ctx);
    // Standing inside the water: full proximity, to the right of +x.
    assert_eq!(out[SECTOR_COUNT + 3], 1.0);
}

#[test]
fn test_internal_sense_reports_state() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let mut agent = spawn(&mut world, vec2(100.0, 100.0));
    agent.energy = params.energy.max_energy * 0.5;
    agent.stress = 0.25;
    agent.infect(3, 10.0);
    let agents = vec![agent];

    let mut scene = Scene::new(&params, &agents);
    scene.index(&agents);
    let ctx = scene.context(&world);

    let out = InternalSense::new().sense(&agents[0], 0, &ctx);
    assert_eq!(out.len(), 8);
    assert!((out[0] - 0.5).abs() < 1e-6);
    assert_eq!(out[4], 0.0);
    assert_eq!(out[5], 0.25);
    assert_eq!(out[6], 1.0);
    assert_eq!(out[7], 1.0);
}

#[test]
fn test_perception_concatenates_senses() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let agent = spawn(&mut world, vec2(100.0, 100.0));
    let agents = vec![agent];

    let mut scene = Scene::new(&params, &agents);
    scene.food.push(Food::new(0, vec2(100.0, 110.0), 10.0, 0));
    scene.index(&agents);
    let ctx = scene.context(&world);

    let perception = Perception::default();
    let inputs = perception.perceive(&agents[0], 0, &ctx);
    let sectors = SectorSense::new().sense(&agents[0], 0, &ctx);
    let internal = InternalSense::new().sense(&agents[0], 0, &ctx);

    assert_eq!(inputs.len(), SENSORY_INPUTS);
    assert_eq!(inputs.slice(ndarray::s![..16]), sectors);
    assert_eq!(inputs.slice(ndarray::s![16..]), internal);
}
