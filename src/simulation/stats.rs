//! Aggregate population statistics, refreshed during cleanup.

use serde::{Deserialize, Serialize};

use super::agent::{Agent, DeathCause};

/// Deaths recorded per cause since the world was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathCounts {
    /// Energy ran out.
    pub starvation: u64,
    /// Hydration ran out.
    pub dehydration: u64,
    /// Lifespan reached.
    pub old_age: u64,
    /// Killed in combat.
    pub combat: u64,
    /// Drained by disease.
    pub disease: u64,
}

impl DeathCounts {
    /// Records one death.
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::Dehydration => self.dehydration += 1,
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::Combat => self.combat += 1,
            DeathCause::Disease => self.disease += 1,
        }
    }

    /// Deaths of any cause.
    pub fn total(&self) -> u64 {
        self.starvation + self.dehydration + self.old_age + self.combat + self.disease
    }
}

/// Statistics tracking population dynamics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Living agents after the last cleanup.
    pub population: usize,
    /// Highest population seen.
    pub peak_population: usize,
    /// Agents born through reproduction.
    pub births: u64,
    /// Deaths by cause.
    pub deaths: DeathCounts,
    /// Highest generation alive.
    pub max_generation: u32,
    /// Mean generation of the living population.
    pub mean_generation: f32,
    /// Mutations applied, inherited and somatic.
    pub total_mutations: u64,
    /// Food items after the last cleanup.
    pub food_count: usize,
    /// Species after the last classification.
    pub species_count: usize,
    /// Agents currently infected.
    pub infected: usize,
}

impl Statistics {
    /// Records a birth and the mutations the newborn carries.
    pub fn record_birth(&mut self, mutations: u32) {
        self.births += 1;
        self.total_mutations += u64::from(mutations);
    }

    /// Records a death.
    pub fn record_death(&mut self, cause: DeathCause) {
        self.deaths.record(cause);
    }

    /// Records in-life mutations.
    pub fn record_mutations(&mut self, mutations: u32) {
        self.total_mutations += u64::from(mutations);
    }

    /// Recomputes the population aggregates from the surviving agents.
    pub fn refresh(&mut self, agents: &[Agent], food_count: usize) {
        self.population = agents.len();
        self.peak_population = self.peak_population.max(self.population);
        self.food_count = food_count;
        self.infected = agents.iter().filter(|a| a.disease.infected).count();
        self.max_generation = agents.iter().map(|a| a.generation).max().unwrap_or(0);
        self.mean_generation = if agents.is_empty() {
            0.0
        } else {
            agents.iter().map(|a| a.generation as f32).sum::<f32>() / agents.len() as f32
        };
    }
}
