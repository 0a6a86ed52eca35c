use rand::Rng;
use rand::seq::index::sample;
use tracing::info;

use super::super::event_log::EventKind;
use super::super::world::World;

/// Threshold-triggered population events.
///
/// - Epidemic: above `epidemic_population_threshold` living agents, an
///   outbreak starts with probability `epidemic_chance * dt` and infects a
///   random `epidemic_infect_fraction` of the population with a new disease.
///   It ends after `epidemic_duration` seconds.
/// - Food bloom: below `bloom_population_threshold` (but above zero),
///   `bloom_food_amount` extra food items grow, at most once per
///   `bloom_cooldown` seconds.
pub(super) fn run(world: &mut World, dt: f32) {
    if !world.params.features.events {
        return;
    }
    let rules = world.params.events.clone();
    let recovery_time = world.params.disease.recovery_time;
    let alive: Vec<usize> = world
        .agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_alive())
        .map(|(index, _)| index)
        .collect();
    let (time, tick) = (world.time, world.tick_count);

    if world.events.epidemic_active {
        world.events.epidemic_timer -= dt;
        if world.events.epidemic_timer <= 0.0 {
            world.events.epidemic_active = false;
            let disease_id = world.events.epidemic_disease;
            info!(disease_id, "epidemic ended");
            world.event_log.log(
                time,
                tick,
                EventKind::EpidemicEnd,
                format!("Epidemic of disease {disease_id} ended"),
            );
        }
    } else if alive.len() > rules.epidemic_population_threshold
        && world.rng.random::<f32>() < rules.epidemic_chance * dt
    {
        let disease_id = world.events.next_disease_id;
        world.events.next_disease_id += 1;
        world.events.epidemic_active = true;
        world.events.epidemic_disease = disease_id;
        world.events.epidemic_timer = rules.epidemic_duration;

        let amount = ((alive.len() as f32 * rules.epidemic_infect_fraction).ceil() as usize)
            .clamp(1, alive.len());
        let mut infected = 0;
        for pick in sample(&mut world.rng, alive.len(), amount).iter() {
            if world.agents[alive[pick]].infect(disease_id, recovery_time) {
                infected += 1;
            }
        }
        info!(disease_id, infected, "epidemic started");
        world.event_log.log(
            time,
            tick,
            EventKind::EpidemicStart,
            format!("Epidemic of disease {disease_id} infected {infected} agents"),
        );
    }

    world.events.bloom_timer = (world.events.bloom_timer - dt).max(0.0);
    if !alive.is_empty()
        && alive.len() < rules.bloom_population_threshold
        && world.events.bloom_timer <= 0.0
    {
        let grown = (0..rules.bloom_food_amount)
            .filter(|_| world.spawn_food())
            .count();
        world.events.bloom_timer = rules.bloom_cooldown;
        info!(food = grown, population = alive.len(), "food bloom");
        world.event_log.log(
            time,
            tick,
            EventKind::FoodBloom,
            format!("Food bloom grew {grown} items"),
        );
    }
}
