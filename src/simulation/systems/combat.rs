use rand::Rng;
use tracing::trace;

use super::super::agent::DeathCause;
use super::super::genetics::Trait;
use super::super::world::World;

/// Agents with an active attack drive strike their nearest living neighbour
/// within `attack_distance`, in ascending id order.
///
/// Damage scales with the attacker's size, aggression and effort, is reduced
/// by the target's armor and jittered by `damage_variance`. A kill transfers
/// `kill_energy_gain` to the attacker.
pub(super) fn run(world: &mut World, dt: f32) {
    if !world.params.features.combat {
        return;
    }
    let combat = &world.params.combat;
    let max_energy = world.params.energy.max_energy;

    for i in 0..world.agents.len() {
        let attacker = &world.agents[i];
        if !attacker.is_alive() || !attacker.wants_attack() {
            continue;
        }
        let agents = &world.agents;
        let target = world
            .grids
            .agents
            .query_nearest_within(attacker.pos, combat.attack_distance, |j| {
                j != i && agents.get(j).is_some_and(|a| a.is_alive())
            });
        let Some((_, j)) = target else {
            continue;
        };

        let effort = attacker.effort();
        let strength = attacker.trait_value(Trait::Size) * attacker.trait_value(Trait::Aggression);
        let armor = world.agents[j].trait_value(Trait::Armor);
        let jitter = if combat.damage_variance > 0.0 {
            1.0 + world
                .rng
                .random_range(-combat.damage_variance..=combat.damage_variance)
        } else {
            1.0
        };
        let damage = (combat.base_damage
            * strength
            * effort
            * (1.0 - combat.armor_factor * armor)
            * jitter
            * dt)
            .max(0.0);

        world.agents[i].consume_energy(combat.attack_energy_cost * effort * dt);
        if world.agents[j].take_damage(damage) {
            world.agents[j].kill(DeathCause::Combat);
            world.agents[i].gain_energy(combat.kill_energy_gain, max_energy);
            trace!(
                attacker = world.agents[i].id,
                victim = world.agents[j].id,
                "killed in combat"
            );
        }
    }
}
