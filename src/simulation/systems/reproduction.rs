use rand::Rng;
use tracing::trace;

use super::super::agent::{Agent, DeathCause};
use super::super::environment::random_point_near;
use super::super::error::SimError;
use super::super::genetics::{
    GeneLayout, MutationRates, Sex, Trait, TraitTable, crossover_genomes, mutate,
};
use super::super::geometric_utils::{confine_mut, vec2};
use super::super::params::Params;
use super::super::random::SimRng;
use super::super::world::World;

/// Whether an agent can mate right now.
fn is_fertile(agent: &Agent, params: &Params) -> bool {
    let rules = &params.reproduction;
    agent.is_alive()
        && agent.is_mature()
        && agent.wants_mate()
        && agent.reproduction_cooldown <= 0.0
        && agent.energy >= rules.energy_threshold * params.energy.max_energy
        && agent.hydration >= rules.hydration_threshold * params.hydration.max_hydration
}

/// Pairs fertile agents of opposite sex and creates their offspring.
///
/// Cooldowns count down first. Agents are visited in ascending id order and
/// each pairs with its nearest eligible partner within `mating_distance`;
/// an agent mates at most once per tick. A mating yields one offspring plus
/// up to `max_simultaneous_offspring - 1` extra ones, each with probability
/// equal to the mother's fertility, never exceeding `max_population`.
/// Newborns join the population after every pair has been handled. A parent
/// left without energy by the mating cost starves.
pub(super) fn run(world: &mut World, dt: f32) -> Result<(), SimError> {
    for agent in &mut world.agents {
        agent.update_cooldown(dt);
    }

    let params = &world.params;
    let rules = &params.reproduction;
    let alive = world.agents.iter().filter(|a| a.is_alive()).count();
    let mut mated = vec![false; world.agents.len()];
    let mut newborns: Vec<Agent> = Vec::new();

    for i in 0..world.agents.len() {
        if mated[i] || !is_fertile(&world.agents[i], params) {
            continue;
        }
        let room = params
            .world
            .max_population
            .saturating_sub(alive + newborns.len());
        if room == 0 {
            break;
        }

        let pos = world.agents[i].pos;
        let sex = world.agents[i].genome.sex;
        let agents = &world.agents;
        let taken = &mated;
        let partner = world
            .grids
            .agents
            .query_nearest_within(pos, rules.mating_distance, |j| {
                j != i
                    && !taken.get(j).copied().unwrap_or(true)
                    && agents
                        .get(j)
                        .is_some_and(|b| b.genome.sex != sex && is_fertile(b, params))
            });
        let Some((_, j)) = partner else {
            continue;
        };
        mated[i] = true;
        mated[j] = true;

        let (mother, father) = if sex == Sex::Female { (i, j) } else { (j, i) };
        let fertility = world.agents[mother].trait_value(Trait::Fertility);
        let extra = (1..rules.max_simultaneous_offspring)
            .filter(|_| world.rng.random::<f32>() < fertility)
            .count();
        let litter = (1 + extra).min(room);

        for _ in 0..litter {
            let id = world.next_agent_id;
            world.next_agent_id += 1;
            let child = conceive(
                id,
                &world.agents[mother],
                &world.agents[father],
                &world.layout,
                &world.traits,
                params,
                &mut world.rng,
            )?;
            newborns.push(child);
        }

        for parent in [mother, father] {
            let parent = &mut world.agents[parent];
            parent.consume_energy(rules.energy_cost);
            parent.reproduction_cooldown = rules.cooldown;
            if parent.energy <= 0.0 {
                parent.kill(DeathCause::Starvation);
            }
        }
    }

    for child in newborns {
        trace!(id = child.id, generation = child.generation, "born");
        world.stats.record_birth(child.mutation_count);
        world.agents.push(child);
    }
    Ok(())
}

/// Builds one offspring by crossover and mutation, placed near the mother.
fn conceive(
    id: u64,
    mother: &Agent,
    father: &Agent,
    layout: &GeneLayout,
    traits: &TraitTable,
    params: &Params,
    rng: &mut SimRng,
) -> Result<Agent, SimError> {
    let mut genome = crossover_genomes(
        &mother.genome,
        &father.genome,
        params.genetics.crossover_rate,
        rng,
    );
    let report = mutate(&mut genome, &MutationRates::from(&params.genetics), 1.0, rng);

    let mut pos = random_point_near(mother.pos, params.reproduction.spawn_radius, rng);
    let mut vel = vec2(0.0, 0.0);
    confine_mut(&mut pos, &mut vel, params.world.width, params.world.height);

    let generation = mother.generation.max(father.generation) + 1;
    let mut child = Agent::new(id, pos, genome, generation, layout, traits, params, rng)?;
    child.energy = params
        .reproduction
        .offspring_energy
        .min(params.energy.max_energy);
    child.hydration = params
        .reproduction
        .offspring_hydration
        .min(params.hydration.max_hydration);
    child.mutation_count = report.total();
    child.species = mother.species;
    Ok(child)
}
