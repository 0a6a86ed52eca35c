#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evosphere::simulation::agent::{Agent, DeathCause};
use evosphere::simulation::brain::{Brain, OUTPUT_SIZE, Output};
use evosphere::simulation::error::{ConfigError, SimError};
use evosphere::simulation::event_log::EventKind;
use evosphere::simulation::genetics::{Phenotype, Sex, Trait};
use evosphere::simulation::geometric_utils::vec2;
use evosphere::simulation::params::Params;
use evosphere::simulation::random;
use evosphere::simulation::views::body_radius;
use evosphere::simulation::world::{Phase, World};

const DT: f32 = 0.1;

/// A quiet world: no founders, no food and every optional system off, so a
/// test controls exactly which agents exist and what they do.
fn create_test_params() -> Params {
    let mut params = Params::default();
    params.seed = 7;
    params.world.width = 300.0;
    params.world.height = 300.0;
    params.world.initial_population = 0;
    params.world.initial_food = 0;
    params.world.target_food = 0;
    params.features.combat = false;
    params.features.disease = false;
    params.features.events = false;
    params.features.somatic_mutation = false;
    params.features.obstacles = false;
    params
}

fn set_trait(agent: &mut Agent, name: Trait, value: f32) {
    let mut values = [0.0; Trait::COUNT];
    for (t, v) in agent.phenotype.iter() {
        values[t.index()] = v;
    }
    values[name.index()] = value;
    agent.phenotype = Phenotype::from_values(values);
}

/// Replaces the agent's brain with one that ignores its inputs and always
/// emits `tanh(bias)`.
fn fixed_brain(world: &mut World, id: u64, bias: [f32; OUTPUT_SIZE]) {
    let params = world.params().brain.clone();
    let mut weights = vec![0.0; params.kind.weight_count(params.memory_depth)];
    let start = weights.len() - OUTPUT_SIZE;
    weights[start..].copy_from_slice(&bias);
    let mut rng = random::seeded(99);
    let brain = Brain::from_weights(&params, &weights, &mut rng).unwrap();
    world.agent_mut(id).unwrap().brain = brain;
}

fn ready_to_mate(agent: &mut Agent, sex: Sex, params: &Params) {
    agent.genome.sex = sex;
    agent.age = 100.0;
    agent.energy = params.energy.max_energy;
    agent.hydration = params.hydration.max_hydration;
    agent.last_outputs[Output::Mate as usize] = 1.0;
}

#[test]
fn test_world_creation() {
    let mut params = Params::default();
    params.world.initial_population = 30;
    let world = World::new(params).unwrap();

    assert_eq!(world.population(), 30);
    assert_eq!(world.food().len(), world.params().world.initial_food);
    assert_eq!(world.water().len(), world.params().world.water_source_count);
    assert_eq!(world.statistics().population, 30);
    assert!(world.statistics().species_count >= 1);
    assert_eq!(world.grids().agents.len(), 30);
    assert!(world.agents().windows(2).all(|w| w[0].id < w[1].id));
    for agent in world.agents() {
        assert_eq!(agent.generation, 0);
        assert!(agent.pos.x >= 0.0 && agent.pos.x <= world.params().world.width);
        assert!(agent.pos.y >= 0.0 && agent.pos.y <= world.params().world.height);
    }
}

#[test]
fn test_invalid_trait_table_is_rejected() {
    let mut params = create_test_params();
    params.genetics.traits[2].genes = 0;
    let name = params.genetics.traits[2].name;

    let result = World::new(params);
    assert!(matches!(
        result,
        Err(SimError::Config(ConfigError::EmptyTraitMapping(t))) if t == name
    ));
}

#[test]
fn test_invalid_dt_is_rejected() {
    let mut world = World::new(create_test_params()).unwrap();
    assert!(world.tick(f32::NAN).is_err());
    assert!(world.tick(-0.5).is_err());
    assert!(world.tick(f32::INFINITY).is_err());
    assert_eq!(world.tick_count(), 0);
    assert!(world.tick(0.0).is_ok());
    assert_eq!(world.tick_count(), 1);
}

#[test]
fn test_empty_world_ticks() {
    let mut world = World::new(create_test_params()).unwrap();
    for _ in 0..20 {
        world.tick(DT).unwrap();
    }
    assert_eq!(world.population(), 0);
    assert_eq!(world.tick_count(), 20);
    assert!((world.time() - 2.0).abs() < 1e-4);
    assert!(!world.event_log().contains(EventKind::PopulationCollapse));
}

#[test]
fn test_phase_order() {
    assert_eq!(Phase::ORDER.first(), Some(&Phase::Movement));
    assert_eq!(Phase::ORDER.last(), Some(&Phase::Cleanup));
    let reproduction = Phase::ORDER.iter().position(|&p| p == Phase::Reproduction);
    let energy = Phase::ORDER.iter().position(|&p| p == Phase::Energy);
    assert!(energy < reproduction);
    let names = Phase::ORDER.map(Phase::name);
    assert_eq!(names[0], "movement");
    assert_eq!(names[7], "somatic_mutation");
}

#[test]
fn test_starved_agent_is_removed_in_the_same_tick() {
    let mut world = World::new(create_test_params()).unwrap();
    let id = world.spawn_agent(vec2(150.0, 150.0)).unwrap();
    world.agent_mut(id).unwrap().energy = 1e-6;

    world.tick(DT).unwrap();

    assert!(world.agent(id).is_none());
    assert_eq!(world.population(), 0);
    assert_eq!(world.statistics().deaths.starvation, 1);
    assert_eq!(world.statistics().deaths.total(), 1);
    assert!(world.event_log().contains(EventKind::PopulationCollapse));
}

#[test]
fn test_huge_drain_starves_agent() {
    let mut params = create_test_params();
    params.energy.drain_base = 1.0e6;
    let mut world = World::new(params).unwrap();
    world.spawn_agent(vec2(100.0, 100.0)).unwrap();

    world.tick(DT).unwrap();

    assert_eq!(world.population(), 0);
    assert_eq!(world.statistics().deaths.starvation, 1);
}

#[test]
fn test_dead_agent_stays_until_cleanup() {
    let mut world = World::new(create_test_params()).unwrap();
    let id = world.spawn_agent(vec2(150.0, 150.0)).unwrap();
    world.agent_mut(id).unwrap().energy = 1e-6;
    world.rebuild_grids();

    world.run_phase(Phase::Energy, DT).unwrap();
    let agent = world.agent(id).unwrap();
    assert_eq!(agent.death, Some(DeathCause::Starvation));
    assert_eq!(world.population(), 0);
    assert_eq!(world.agents().len(), 1);

    world.run_phase(Phase::Cleanup, DT).unwrap();
    assert!(world.agents().is_empty());
}

#[test]
fn test_old_agent_dies_of_age() {
    let mut world = World::new(create_test_params()).unwrap();
    let id = world.spawn_agent(vec2(150.0, 150.0)).unwrap();
    world.agent_mut(id).unwrap().age = 1.0e6;

    world.run_phase(Phase::Aging, DT).unwrap();
    assert_eq!(world.agent(id).unwrap().death, Some(DeathCause::OldAge));
    world.run_phase(Phase::Cleanup, DT).unwrap();
    assert_eq!(world.statistics().deaths.old_age, 1);
}

#[test]
fn test_two_agents_mate() {
    let mut params = create_test_params();
    params.reproduction.max_simultaneous_offspring = 1;
    let mut world = World::new(params.clone()).unwrap();
    let mother = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let father = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    ready_to_mate(world.agent_mut(mother).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(father).unwrap(), Sex::Male, &params);
    world.agent_mut(mother).unwrap().species = 4;
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();

    assert_eq!(world.population(), 3);
    assert_eq!(world.statistics().births, 1);
    for parent in [mother, father] {
        let parent = world.agent(parent).unwrap();
        assert_eq!(parent.reproduction_cooldown, params.reproduction.cooldown);
        assert_eq!(
            parent.energy,
            params.energy.max_energy - params.reproduction.energy_cost
        );
    }

    let child = &world.agents()[2];
    assert_eq!(child.id, 2);
    assert_eq!(child.generation, 1);
    assert_eq!(child.species, 4);
    assert_eq!(child.energy, params.reproduction.offspring_energy);
    assert_eq!(child.hydration, params.reproduction.offspring_hydration);
    assert!(child.genome.validate(world.layout()).is_ok());
    let from_mother = child.pos.x - 100.0;
    let from_mother_y = child.pos.y - 100.0;
    assert!(from_mother.hypot(from_mother_y) <= params.reproduction.spawn_radius + 1e-3);
}

#[test]
fn test_cooldown_prevents_second_mating() {
    let mut params = create_test_params();
    params.reproduction.max_simultaneous_offspring = 1;
    let mut world = World::new(params.clone()).unwrap();
    let mother = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let father = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    ready_to_mate(world.agent_mut(mother).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(father).unwrap(), Sex::Male, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    for id in [mother, father] {
        let agent = world.agent_mut(id).unwrap();
        agent.energy = params.energy.max_energy;
    }
    world.run_phase(Phase::Reproduction, DT).unwrap();

    assert_eq!(world.statistics().births, 1);
    let mother = world.agent(mother).unwrap();
    assert!((mother.reproduction_cooldown - (params.reproduction.cooldown - DT)).abs() < 1e-5);
}

#[test]
fn test_same_sex_agents_do_not_mate() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let a = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let b = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    ready_to_mate(world.agent_mut(a).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(b).unwrap(), Sex::Female, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    assert_eq!(world.population(), 2);
    assert_eq!(world.statistics().births, 0);
}

#[test]
fn test_distant_agents_do_not_mate() {
    let params = create_test_params();
    let mut world = World::new(params.clone()).unwrap();
    let a = world.spawn_agent(vec2(50.0, 50.0)).unwrap();
    let b = world.spawn_agent(vec2(250.0, 250.0)).unwrap();
    ready_to_mate(world.agent_mut(a).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(b).unwrap(), Sex::Male, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    assert_eq!(world.population(), 2);
}

#[test]
fn test_population_cap_limits_births() {
    let mut params = create_test_params();
    params.world.max_population = 2;
    let mut world = World::new(params.clone()).unwrap();
    let a = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let b = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    ready_to_mate(world.agent_mut(a).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(b).unwrap(), Sex::Male, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    assert_eq!(world.population(), 2);
}

#[test]
fn test_combat_kill() {
    let mut params = create_test_params();
    params.features.combat = true;
    params.combat.damage_variance = 0.0;
    let mut world = World::new(params.clone()).unwrap();
    let attacker = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let victim = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    {
        let agent = world.agent_mut(attacker).unwrap();
        set_trait(agent, Trait::Aggression, 1.0);
        agent.last_outputs[Output::Attack as usize] = 1.0;
        agent.last_outputs[Output::Effort as usize] = 1.0;
        agent.energy = 50.0;
    }
    world.agent_mut(victim).unwrap().health = 1e-3;
    world.rebuild_grids();

    world.run_phase(Phase::Combat, DT).unwrap();

    assert_eq!(world.agent(victim).unwrap().death, Some(DeathCause::Combat));
    let expected = 50.0 - params.combat.attack_energy_cost * DT + params.combat.kill_energy_gain;
    assert!((world.agent(attacker).unwrap().energy - expected).abs() < 1e-4);

    world.run_phase(Phase::Cleanup, DT).unwrap();
    assert_eq!(world.statistics().deaths.combat, 1);
    assert_eq!(world.population(), 1);
}

#[test]
fn test_combat_disabled_does_nothing() {
    let params = create_test_params();
    let mut world = World::new(params).unwrap();
    let attacker = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let victim = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    world.agent_mut(attacker).unwrap().last_outputs[Output::Attack as usize] = 1.0;
    world.agent_mut(victim).unwrap().health = 1e-3;
    world.rebuild_grids();

    world.run_phase(Phase::Combat, DT).unwrap();
    assert!(world.agent(victim).unwrap().is_alive());
}

#[test]
fn test_disease_spreads_to_neighbours() {
    let mut params = create_test_params();
    params.features.disease = true;
    params.disease.transmission_rate = 1000.0;
    let mut world = World::new(params.clone()).unwrap();
    let carrier = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let near = world.spawn_agent(vec2(105.0, 100.0)).unwrap();
    let far = world.spawn_agent(vec2(250.0, 250.0)).unwrap();
    world
        .agent_mut(carrier)
        .unwrap()
        .infect(7, params.disease.recovery_time);
    set_trait(world.agent_mut(near).unwrap(), Trait::DiseaseResistance, 0.0);
    set_trait(world.agent_mut(far).unwrap(), Trait::DiseaseResistance, 0.0);
    world.rebuild_grids();

    world.run_phase(Phase::Disease, DT).unwrap();

    let near = world.agent(near).unwrap();
    assert!(near.disease.infected);
    assert_eq!(near.disease.disease_id, 7);
    assert!(!world.agent(far).unwrap().disease.infected);
    assert!(world.agent(carrier).unwrap().disease.infected);
}

#[test]
fn test_infection_recovers() {
    let mut params = create_test_params();
    params.features.disease = true;
    params.disease.recovery_time = 0.25;
    let mut world = World::new(params).unwrap();
    let id = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    world.agent_mut(id).unwrap().infect(1, 0.25);
    world.rebuild_grids();

    for _ in 0..3 {
        world.run_phase(Phase::Disease, DT).unwrap();
    }
    assert!(!world.agent(id).unwrap().disease.infected);
}

#[test]
fn test_feeding_consumes_food() {
    let mut params = create_test_params();
    params.world.initial_food = 1;
    let mut world = World::new(params.clone()).unwrap();
    let food_pos = world.food()[0].pos;
    let id = world.spawn_agent(food_pos).unwrap();
    world.agent_mut(id).unwrap().energy = 10.0;
    world.rebuild_grids();

    world.run_phase(Phase::Feeding, DT).unwrap();

    assert!(world.food()[0].is_consumed());
    let efficiency = world.agent(id).unwrap().trait_value(Trait::Efficiency);
    let expected = 10.0 + params.world.food_energy * efficiency;
    assert!((world.agent(id).unwrap().energy - expected).abs() < 1e-4);

    world.run_phase(Phase::Cleanup, DT).unwrap();
    assert!(world.food().is_empty());
}

#[test]
fn test_food_regrows_towards_target() {
    let mut params = create_test_params();
    params.world.target_food = 40;
    params.world.food_respawn_rate = 100.0;
    let mut world = World::new(params).unwrap();

    for _ in 0..10 {
        world.tick(DT).unwrap();
    }
    assert_eq!(world.food().len(), 40);
}

#[test]
fn test_same_seed_same_outcome() {
    let mut params = Params::default();
    params.world.width = 400.0;
    params.world.height = 400.0;
    params.world.initial_population = 40;
    params.world.initial_food = 80;
    params.world.target_food = 80;

    let mut first = World::new(params.clone()).unwrap();
    let mut second = World::new(params).unwrap();
    for _ in 0..30 {
        first.tick(DT).unwrap();
        second.tick(DT).unwrap();
    }

    assert_eq!(first.population(), second.population());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_different_seeds_diverge() {
    let mut params = Params::default();
    params.world.initial_population = 20;
    let first = World::new(params.clone()).unwrap();
    params.seed += 1;
    let second = World::new(params).unwrap();

    let a: Vec<_> = first.agents().iter().map(|a| a.pos).collect();
    let b: Vec<_> = second.agents().iter().map(|a| a.pos).collect();
    assert_ne!(a, b);
}

#[test]
fn test_agent_views_cover_living_agents() {
    let mut params = Params::default();
    params.world.initial_population = 10;
    let mut world = World::new(params).unwrap();
    world.tick(DT).unwrap();

    let views = world.agent_views();
    assert_eq!(views.len(), world.population());
    for view in &views {
        assert!((0.0..=1.0).contains(&view.energy_ratio));
        assert!(view.radius > 0.0);
    }
}

#[test]
fn test_genetic_similarity_lookup() {
    let mut world = World::new(create_test_params()).unwrap();
    let a = world.spawn_agent(vec2(10.0, 10.0)).unwrap();
    let b = world.spawn_agent(vec2(20.0, 20.0)).unwrap();

    assert_eq!(world.genetic_similarity(a, a), Some(1.0));
    let ab = world.genetic_similarity(a, b).unwrap();
    assert!((0.0..=1.0).contains(&ab));
    assert_eq!(world.genetic_similarity(a, 99), None);
}

#[test]
fn test_long_run_stays_consistent() {
    let mut params = Params::default();
    params.world.initial_population = 60;
    let max_population = params.world.max_population;
    let mut world = World::new(params).unwrap();

    for _ in 0..200 {
        world.tick(DT).unwrap();
        let stats = world.statistics();
        assert!(stats.population <= max_population);
        assert_eq!(stats.population, world.agents().len());
        assert!(world.agents().iter().all(Agent::is_alive));
        assert!(world.agents().windows(2).all(|w| w[0].id < w[1].id));
        for agent in world.agents() {
            assert!(agent.energy > 0.0 && agent.energy <= world.params().energy.max_energy);
            assert!(agent.hydration > 0.0);
        }
    }
}

#[test]
fn test_epidemic_starts_and_ends() {
    let mut params = create_test_params();
    params.features.events = true;
    params.events.epidemic_population_threshold = 1;
    params.events.epidemic_chance = 100.0;
    params.events.epidemic_infect_fraction = 1.0;
    params.events.epidemic_duration = 0.15;
    params.events.bloom_population_threshold = 0;
    let mut world = World::new(params).unwrap();
    for x in [100.0, 150.0, 200.0] {
        world.spawn_agent(vec2(x, 100.0)).unwrap();
    }

    world.run_phase(Phase::Events, DT).unwrap();
    assert!(world.event_state().epidemic_active);
    assert!(world.agents().iter().all(|a| a.disease.infected));
    assert!(world.event_log().contains(EventKind::EpidemicStart));

    world.run_phase(Phase::Events, DT).unwrap();
    assert!(world.event_state().epidemic_active);
    world.run_phase(Phase::Events, DT).unwrap();
    assert!(!world.event_state().epidemic_active);
    assert!(world.event_log().contains(EventKind::EpidemicEnd));
}

#[test]
fn test_food_bloom_rescues_small_population() {
    let mut params = create_test_params();
    params.features.events = true;
    params.events.epidemic_population_threshold = 1000;
    params.events.bloom_population_threshold = 10;
    params.events.bloom_food_amount = 5;
    params.events.bloom_cooldown = 30.0;
    let mut world = World::new(params).unwrap();
    world.spawn_agent(vec2(100.0, 100.0)).unwrap();

    world.run_phase(Phase::Events, DT).unwrap();
    assert_eq!(world.food().len(), 5);
    assert!(world.event_log().contains(EventKind::FoodBloom));

    // Still cooling down.
    world.run_phase(Phase::Events, DT).unwrap();
    assert_eq!(world.food().len(), 5);
}

#[test]
fn test_mating_at_zero_distance() {
    let mut params = create_test_params();
    params.reproduction.max_simultaneous_offspring = 1;
    let mut world = World::new(params.clone()).unwrap();
    let mother = world.spawn_agent(vec2(120.0, 120.0)).unwrap();
    let father = world.spawn_agent(vec2(120.0, 120.0)).unwrap();
    ready_to_mate(world.agent_mut(mother).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(father).unwrap(), Sex::Male, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    assert_eq!(world.population(), 3);
    assert_eq!(world.statistics().births, 1);
}

#[test]
fn test_mating_cost_can_starve_parents() {
    let mut params = create_test_params();
    params.reproduction.max_simultaneous_offspring = 1;
    params.reproduction.energy_cost = params.energy.max_energy;
    let mut world = World::new(params.clone()).unwrap();
    let mother = world.spawn_agent(vec2(120.0, 120.0)).unwrap();
    let father = world.spawn_agent(vec2(120.0, 120.0)).unwrap();
    ready_to_mate(world.agent_mut(mother).unwrap(), Sex::Female, &params);
    ready_to_mate(world.agent_mut(father).unwrap(), Sex::Male, &params);
    world.rebuild_grids();

    world.run_phase(Phase::Reproduction, DT).unwrap();
    for parent in [mother, father] {
        let parent = world.agent(parent).unwrap();
        assert_eq!(parent.energy, 0.0);
        assert_eq!(parent.death, Some(DeathCause::Starvation));
    }

    for phase in [Phase::Aging, Phase::SomaticMutation, Phase::Disease, Phase::Events, Phase::Cleanup] {
        world.run_phase(phase, DT).unwrap();
    }
    assert!(world.agent(mother).is_none());
    assert!(world.agent(father).is_none());
    assert_eq!(world.population(), 1);
    assert_eq!(world.statistics().deaths.starvation, 2);
}

#[test]
fn test_movement_follows_brain_outputs() {
    let mut params = create_test_params();
    params.movement.steering_rate = 1000.0;
    let mut world = World::new(params).unwrap();
    let runner = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    let stroller = world.spawn_agent(vec2(100.0, 200.0)).unwrap();
    let sleeper = world.spawn_agent(vec2(200.0, 150.0)).unwrap();
    // Full effort towards +x, half effort towards +x, resting.
    fixed_brain(&mut world, runner, [10.0, 0.0, 10.0, -10.0, -10.0, -10.0]);
    fixed_brain(&mut world, stroller, [10.0, 0.0, 0.0, -10.0, -10.0, -10.0]);
    fixed_brain(&mut world, sleeper, [10.0, 0.0, 10.0, -10.0, -10.0, 10.0]);
    world.agent_mut(sleeper).unwrap().vel = vec2(5.0, 5.0);
    world.rebuild_grids();

    let runner_top = world.effective_max_speed(world.agent(runner).unwrap());
    let stroller_top = world.effective_max_speed(world.agent(stroller).unwrap());
    world.run_phase(Phase::Movement, DT).unwrap();

    let agent = world.agent(runner).unwrap();
    assert!((agent.vel.x - runner_top).abs() < 1e-3);
    assert!(agent.vel.y.abs() < 1e-5);
    assert!((agent.pos.x - (100.0 + runner_top * DT)).abs() < 1e-3);
    assert!(agent.effort() > 0.999);

    let agent = world.agent(stroller).unwrap();
    assert!((agent.effort() - 0.5).abs() < 1e-6);
    assert!((agent.vel.x - 0.5 * stroller_top).abs() < 1e-3);

    let agent = world.agent(sleeper).unwrap();
    assert!(agent.is_resting());
    assert_eq!(agent.vel, vec2(0.0, 0.0));
    assert_eq!(agent.pos, vec2(200.0, 150.0));
}

#[test]
fn test_movement_speed_is_clamped() {
    let mut params = create_test_params();
    params.movement.steering_rate = 1.0;
    let mut world = World::new(params).unwrap();
    let id = world.spawn_agent(vec2(100.0, 100.0)).unwrap();
    fixed_brain(&mut world, id, [10.0, 0.0, 10.0, -10.0, -10.0, -10.0]);
    world.agent_mut(id).unwrap().vel = vec2(1000.0, 0.0);
    world.rebuild_grids();

    let top = world.effective_max_speed(world.agent(id).unwrap());
    world.run_phase(Phase::Movement, DT).unwrap();

    let agent = world.agent(id).unwrap();
    assert!((agent.vel.x.hypot(agent.vel.y) - top).abs() < 1e-3);
    assert!(agent.pos.x <= 100.0 + top * DT + 1e-3);
}

#[test]
fn test_obstacle_stops_agent() {
    let mut params = create_test_params();
    params.features.obstacles = true;
    params.world.obstacle_count = 1;
    params.movement.steering_rate = 1000.0;
    let mut world = World::new(params.clone()).unwrap();
    let rock = world.obstacles()[0].clone();

    // Walk straight at the rock from the side with more room.
    let heading = if rock.pos.x >= params.world.width / 2.0 { 1.0 } else { -1.0 };
    let id = world.spawn_agent(vec2(0.0, rock.pos.y)).unwrap();
    fixed_brain(&mut world, id, [10.0 * heading, 0.0, 10.0, -10.0, -10.0, -10.0]);
    let radius = body_radius(&world.agent(id).unwrap().phenotype, world.params());
    let step = world.effective_max_speed(world.agent(id).unwrap()) * DT;
    let start = vec2(rock.pos.x - heading * (rock.radius + radius + 0.5 * step), rock.pos.y);
    world.agent_mut(id).unwrap().pos = start;
    world.rebuild_grids();

    world.run_phase(Phase::Movement, DT).unwrap();

    let agent = world.agent(id).unwrap();
    assert_eq!(agent.vel, vec2(0.0, 0.0));
    assert_eq!(agent.pos, start);
}

#[test]
fn test_hydration_inside_and_outside_water() {
    let mut params = create_test_params();
    params.world.water_source_count = 1;
    let mut world = World::new(params.clone()).unwrap();
    let water = world.water()[0].clone();
    let corner = vec2(
        if water.pos.x < 150.0 { 290.0 } else { 10.0 },
        if water.pos.y < 150.0 { 290.0 } else { 10.0 },
    );

    let drinker = world.spawn_agent(water.pos).unwrap();
    let stranded = world.spawn_agent(corner).unwrap();
    world.agent_mut(drinker).unwrap().hydration = 50.0;
    world.agent_mut(stranded).unwrap().hydration = 1e-3;
    world.rebuild_grids();

    world.run_phase(Phase::Hydration, DT).unwrap();

    let rules = &params.hydration;
    let expected = 50.0 + (rules.drink_rate - rules.drain_rate) * DT;
    let agent = world.agent(drinker).unwrap();
    assert!((agent.hydration - expected).abs() < 1e-4);
    assert!(agent.is_alive());

    let agent = world.agent(stranded).unwrap();
    assert_eq!(agent.hydration, 0.0);
    assert_eq!(agent.death, Some(DeathCause::Dehydration));

    world.run_phase(Phase::Cleanup, DT).unwrap();
    assert_eq!(world.statistics().deaths.dehydration, 1);
}
