use rand::Rng;
use tracing::{info, trace, warn};

use super::super::agent::Agent;
use super::super::event_log::EventKind;
use super::super::world::World;

/// Removes dead agents and eaten food, regrows food, and refreshes
/// statistics and species.
///
/// Food regrows at `food_respawn_rate` items per second while below
/// `target_food`; the fractional part of `rate * dt` is spawned with matching
/// probability. Species are reclassified every `species.interval` ticks.
pub(super) fn run(world: &mut World, dt: f32) {
    for agent in &world.agents {
        if let Some(cause) = agent.death {
            trace!(id = agent.id, ?cause, age = agent.age, "died");
            world.stats.record_death(cause);
        }
    }
    let before = world.stats.population;
    let had_agents = !world.agents.is_empty();
    world.agents.retain(Agent::is_alive);
    world.food.retain(|item| !item.is_consumed());

    let missing = world
        .params
        .world
        .target_food
        .saturating_sub(world.food.len());
    if missing > 0 {
        let spawn_f = world.params.world.food_respawn_rate * dt;
        let base = spawn_f.floor() as usize;
        let extra = usize::from(spawn_f.fract() > 0.0 && world.rng.random::<f32>() < spawn_f.fract());
        for _ in 0..(base + extra).min(missing) {
            if !world.spawn_food() {
                break;
            }
        }
    }

    let interval = world.params.species.interval;
    if interval > 0 && world.tick_count % interval == 0 {
        world.stats.species_count = world.species.classify(
            &mut world.agents,
            &world.layout,
            &world.traits,
            world.params.species.similarity_threshold,
        );
    }
    world.stats.refresh(&world.agents, world.food.len());

    if world.agents.is_empty() {
        if had_agents && !world.events.collapsed {
            world.events.collapsed = true;
            warn!(tick = world.tick_count, "population collapsed");
            world.event_log.log(
                world.time,
                world.tick_count,
                EventKind::PopulationCollapse,
                "No agents left alive".to_string(),
            );
        }
    } else {
        world.events.collapsed = false;
        let population = world.agents.len();
        // Log every time the population crosses a multiple of 100.
        if population / 100 != before / 100 {
            info!(population, "population milestone");
        }
    }
}
