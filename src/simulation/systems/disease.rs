use rand::Rng;

use super::super::agent::DeathCause;
use super::super::genetics::Trait;
use super::super::world::World;

/// Advances infections, then spreads them.
///
/// Infected agents lose energy scaled down by their resistance and recover
/// once their timer runs out. Every agent still infected afterwards exposes
/// its uninfected neighbours within `transmission_radius`; each exposure
/// infects with probability `transmission_rate * (1 - resistance) * dt`.
/// Agents infected during this phase do not transmit until the next tick.
pub(super) fn run(world: &mut World, dt: f32) {
    let params = &world.params;
    if !params.features.disease {
        return;
    }
    let disease = &params.disease;

    for agent in &mut world.agents {
        if !agent.is_alive() || !agent.disease.infected {
            continue;
        }
        let resistance = agent.trait_value(Trait::DiseaseResistance).clamp(0.0, 1.0);
        agent.consume_energy(disease.energy_drain * (1.0 - resistance) * dt);
        agent.update_disease(dt);
        if agent.energy <= 0.0 {
            agent.kill(DeathCause::Disease);
        }
    }

    let carriers: Vec<usize> = world
        .agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_alive() && a.disease.infected)
        .map(|(index, _)| index)
        .collect();

    for carrier in carriers {
        let pos = world.agents[carrier].pos;
        let disease_id = world.agents[carrier].disease.disease_id;
        let mut exposed: Vec<usize> = world
            .grids
            .agents
            .query_radius(pos, disease.transmission_radius)
            .into_iter()
            .map(|(_, index)| index)
            .filter(|&index| index != carrier)
            .collect();
        exposed.sort_unstable();

        for index in exposed {
            let Some(target) = world.agents.get_mut(index) else {
                continue;
            };
            if !target.is_alive() || target.disease.infected {
                continue;
            }
            let resistance = target.trait_value(Trait::DiseaseResistance).clamp(0.0, 1.0);
            let chance = disease.transmission_rate * (1.0 - resistance) * dt;
            if world.rng.random::<f32>() < chance {
                target.infect(disease_id, disease.recovery_time);
            }
        }
    }
}
