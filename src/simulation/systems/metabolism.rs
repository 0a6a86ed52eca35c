//! Feeding, hydration and energy drain.

use super::super::agent::DeathCause;
use super::super::genetics::Trait;
use super::super::geometric_utils::length;
use super::super::world::World;

/// Each hungry agent eats the nearest uneaten food within `eating_distance`.
///
/// Agents go in ascending id order, so the lower id wins a contested item.
pub(super) fn feed(world: &mut World) {
    let reach = world.params.energy.eating_distance;
    let max_energy = world.params.energy.max_energy;

    for agent in &mut world.agents {
        if !agent.is_alive() || agent.energy >= max_energy {
            continue;
        }
        let food = &world.food;
        let nearest = world
            .grids
            .food
            .query_nearest_within(agent.pos, reach, |k| food.get(k).is_some_and(|f| !f.is_consumed()));
        if let Some((_, k)) = nearest {
            let value = world.food[k].consume();
            agent.gain_energy(value * agent.trait_value(Trait::Efficiency), max_energy);
        }
    }
}

/// Drains hydration, refills it inside water and kills dehydrated agents.
pub(super) fn hydrate(world: &mut World, dt: f32) {
    let params = &world.params;
    let hydration = &params.hydration;

    for agent in &mut world.agents {
        if !agent.is_alive() {
            continue;
        }
        let water = &world.water;
        let pos = agent.pos;
        let mut drinking = false;
        world
            .grids
            .water
            .for_each_within(pos, params.world.water_radius_max, |_, k| {
                if water.get(k).is_some_and(|w| w.contains(pos)) {
                    drinking = true;
                }
            });

        let thirst = world.environment.thirst_factor(&params.environment, pos);
        let mut delta = -hydration.drain_rate * thirst;
        if drinking {
            delta += hydration.drink_rate;
        }
        agent.change_hydration(delta * dt, hydration.max_hydration);
        if agent.hydration <= 0.0 {
            agent.kill(DeathCause::Dehydration);
        }
    }
}

/// Applies metabolic drain and updates stress.
///
/// Basal drain grows with size, locomotion drain with the current speed and
/// the speed trait; both are divided by efficiency. Stress, resting and
/// temperature scale the total.
pub(super) fn drain(world: &mut World, dt: f32) {
    let params = &world.params;
    let energy = &params.energy;

    for agent in &mut world.agents {
        if !agent.is_alive() {
            continue;
        }
        let size = agent.trait_value(Trait::Size);
        let speed_trait = agent.trait_value(Trait::Speed);
        let efficiency = agent.trait_value(Trait::Efficiency).max(f32::EPSILON);
        let speed_ratio = length(agent.vel) / params.movement.max_speed;

        let basal = energy.drain_base * size;
        let locomotion = params.movement.move_energy_cost * speed_ratio * speed_trait;
        let mut rate = (basal + locomotion) / efficiency;
        rate *= 1.0 + energy.stress_drain_factor * agent.stress;
        if agent.is_resting() {
            rate *= energy.rest_drain_factor;
        }
        rate *= world
            .environment
            .temperature_factor(&params.environment, agent.pos);

        agent.consume_energy(rate * dt);
        agent.update_stress(energy.damage_decay_rate, energy.stress_damage_scale, dt);
        if agent.energy <= 0.0 {
            agent.kill(DeathCause::Starvation);
        }
    }
}
