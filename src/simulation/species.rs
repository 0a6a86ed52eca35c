//! Species classification by genetic similarity.
//!
//! Each species keeps a representative genome. Agents join the first
//! species (by id) whose representative is similar enough; agents that match
//! none found a new species and become its representative. Species without
//! members are dropped, so ids of surviving species never change.

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::genetics::{GeneLayout, Genome, TraitTable, genetic_similarity};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Representative {
    species: u32,
    genome: Genome,
}

/// Greedy representative clustering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesTracker {
    representatives: Vec<Representative>,
    next_id: u32,
}

impl SpeciesTracker {
    /// Creates a tracker with no species.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of species with at least one member after the last run.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    /// Whether no species exist.
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Assigns a species id to every living agent.
    ///
    /// # Arguments
    ///
    /// * `agents` - Population in ascending id order
    /// * `layout` - Locus table
    /// * `traits` - Trait ranges used to normalise distances
    /// * `threshold` - Minimum similarity to join a species
    ///
    /// # Returns
    ///
    /// The number of species.
    pub fn classify(
        &mut self,
        agents: &mut [Agent],
        layout: &GeneLayout,
        traits: &TraitTable,
        threshold: f32,
    ) -> usize {
        let mut members = vec![0usize; self.representatives.len()];

        for agent in agents.iter_mut().filter(|a| a.is_alive()) {
            let found = self.representatives.iter().position(|rep| {
                genetic_similarity(&agent.genome, &rep.genome, layout, traits) >= threshold
            });
            let slot = match found {
                Some(slot) => slot,
                None => {
                    self.representatives.push(Representative {
                        species: self.next_id,
                        genome: agent.genome.clone(),
                    });
                    self.next_id += 1;
                    members.push(0);
                    self.representatives.len() - 1
                }
            };
            members[slot] += 1;
            agent.species = self.representatives[slot].species;
        }

        let mut counts = members.into_iter();
        self.representatives
            .retain(|_| counts.next().is_some_and(|count| count > 0));
        self.representatives.len()
    }
}
