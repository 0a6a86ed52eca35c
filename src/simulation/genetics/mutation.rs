//! Germline and somatic mutation operators.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gene::{Allele, Gene};
use super::genome::Genome;
use crate::simulation::params::GeneticsParams;
use crate::simulation::random::gaussian;

/// Cumulative category weights: point 70%, dominance 15%, swap 10%, large 5%.
const POINT_WEIGHT: f32 = 0.70;
const DOMINANCE_WEIGHT: f32 = 0.85;
const SWAP_WEIGHT: f32 = 0.95;

/// Mutation category applied to a single gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Small Gaussian shift of one allele value.
    Point,
    /// Gaussian shift of one allele's dominance, clamped to `[0, 1]`.
    Dominance,
    /// Maternal and paternal alleles trade places.
    AlleleSwap,
    /// Large Gaussian shift of one allele value.
    LargeEffect,
}

/// Per-gene rates and magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRates {
    /// Probability that a gene mutates.
    pub rate: f32,
    /// Standard deviation of point mutations.
    pub point_stddev: f32,
    /// Standard deviation of dominance mutations.
    pub dominance_stddev: f32,
    /// Standard deviation of large-effect mutations.
    pub large_stddev: f32,
}

impl From<&GeneticsParams> for MutationRates {
    fn from(params: &GeneticsParams) -> Self {
        Self {
            rate: params.mutation_rate,
            point_stddev: params.point_stddev,
            dominance_stddev: params.dominance_stddev,
            large_stddev: params.large_stddev,
        }
    }
}

/// Counts of applied mutations by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Point mutations.
    pub point: u32,
    /// Dominance mutations.
    pub dominance: u32,
    /// Allele swaps.
    pub swap: u32,
    /// Large-effect mutations.
    pub large: u32,
}

impl MutationReport {
    /// Total number of mutated genes.
    pub fn total(&self) -> u32 {
        self.point + self.dominance + self.swap + self.large
    }

    fn record(&mut self, kind: MutationKind) {
        match kind {
            MutationKind::Point => self.point += 1,
            MutationKind::Dominance => self.dominance += 1,
            MutationKind::AlleleSwap => self.swap += 1,
            MutationKind::LargeEffect => self.large += 1,
        }
    }
}

/// Draws a mutation category with the fixed 70/15/10/5 weights.
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R) -> MutationKind {
    let roll = rng.random::<f32>();
    if roll < POINT_WEIGHT {
        MutationKind::Point
    } else if roll < DOMINANCE_WEIGHT {
        MutationKind::Dominance
    } else if roll < SWAP_WEIGHT {
        MutationKind::AlleleSwap
    } else {
        MutationKind::LargeEffect
    }
}

/// Applies one mutation of `kind` to a gene.
pub fn apply<R: Rng + ?Sized>(
    gene: &mut Gene,
    kind: MutationKind,
    rates: &MutationRates,
    scale: f32,
    rng: &mut R,
) {
    if kind == MutationKind::AlleleSwap {
        gene.swap_alleles();
        return;
    }

    let allele: &mut Allele = if rng.random::<bool>() {
        &mut gene.allele_a
    } else {
        &mut gene.allele_b
    };
    match kind {
        MutationKind::Point => allele.value += gaussian(rng, rates.point_stddev * scale),
        MutationKind::LargeEffect => allele.value += gaussian(rng, rates.large_stddev * scale),
        MutationKind::Dominance => {
            allele.dominance =
                (allele.dominance + gaussian(rng, rates.dominance_stddev * scale)).clamp(0.0, 1.0);
        }
        MutationKind::AlleleSwap => {}
    }
}

/// Mutates a genome in place.
///
/// Each gene mutates with probability `rates.rate`, receiving exactly one
/// category. `scale` multiplies every standard deviation; somatic mutation
/// uses a reduced scale.
///
/// # Returns
///
/// The number of mutations applied per category.
pub fn mutate<R: Rng + ?Sized>(
    genome: &mut Genome,
    rates: &MutationRates,
    scale: f32,
    rng: &mut R,
) -> MutationReport {
    let mut report = MutationReport::default();
    if rates.rate <= 0.0 {
        return report;
    }
    for gene in genome.genes_mut() {
        if rng.random::<f32>() < rates.rate {
            let kind = choose_kind(rng);
            apply(gene, kind, rates, scale, rng);
            report.record(kind);
        }
    }
    report
}
