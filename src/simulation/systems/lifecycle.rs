//! Aging and somatic mutation.

use rand::Rng;
use tracing::trace;

use super::super::agent::DeathCause;
use super::super::error::SimError;
use super::super::genetics::{MutationRates, derive_phenotype, mutate};
use super::super::views;
use super::super::world::World;

/// Ages every living agent; those past their lifespan die of old age.
pub(super) fn age(world: &mut World, dt: f32) {
    let params = &world.params;
    for agent in &mut world.agents {
        if !agent.is_alive() {
            continue;
        }
        agent.age_by(dt);
        if agent.age >= views::lifespan(&agent.phenotype, params) {
            agent.kill(DeathCause::OldAge);
        }
    }
}

/// Applies rare in-life mutations at reduced scale.
///
/// A mutated agent gets a fresh phenotype and a rebuilt brain that keeps its
/// hidden state; health is clamped to the new cap.
pub(super) fn somatic_mutation(world: &mut World) -> Result<(), SimError> {
    let params = &world.params;
    if !params.features.somatic_mutation {
        return Ok(());
    }
    let rates = MutationRates::from(&params.genetics);
    let chance = params.genetics.somatic_mutation_chance;

    for agent in &mut world.agents {
        if !agent.is_alive() || world.rng.random::<f32>() >= chance {
            continue;
        }
        let report = mutate(
            &mut agent.genome,
            &rates,
            params.genetics.somatic_scale,
            &mut world.rng,
        );
        let total = report.total();
        if total == 0 {
            continue;
        }
        agent.phenotype = derive_phenotype(&agent.genome, &world.layout, &world.traits);
        let weights = agent.genome.brain_weights(&world.layout);
        agent.brain = agent.brain.rebuild(&params.brain, &weights, &mut world.rng)?;
        agent.health = agent
            .health
            .min(views::max_health(&agent.phenotype, params));
        agent.mutation_count += total;
        world.stats.record_mutations(total);
        trace!(id = agent.id, mutations = total, "somatic mutation");
    }
    Ok(())
}
