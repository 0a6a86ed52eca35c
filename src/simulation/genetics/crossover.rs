//! Sexual recombination of chromosome pairs.

use rand::Rng;

use super::gene::{Allele, Gene};
use super::genome::{Chromosome, ChromosomePair, Genome, Sex};

/// Picks one of a gene's two alleles 50/50.
#[inline]
fn pick_allele<R: Rng + ?Sized>(gene: &Gene, rng: &mut R) -> Allele {
    if rng.random::<bool>() {
        gene.allele_a
    } else {
        gene.allele_b
    }
}

/// Recombines one chromosome pair from each parent.
///
/// With probability `rate` each child homolog draws a crossover point: loci
/// before it come from the parents' same homolog, loci after it from the
/// parents' other homolog. Every child gene then receives one allele picked
/// 50/50 from the mother's gene (maternal slot) and one from the father's
/// gene (paternal slot). Otherwise the child pair is an unmodified copy of one
/// parent's pair.
///
/// # Arguments
///
/// * `mother` - Maternal chromosome pair
/// * `father` - Paternal chromosome pair (same layout)
/// * `rate` - Crossover probability in `[0, 1]`
/// * `rng` - Random stream
///
/// # Returns
///
/// The child chromosome pair.
pub fn crossover<R: Rng + ?Sized>(
    mother: &ChromosomePair,
    father: &ChromosomePair,
    rate: f32,
    rng: &mut R,
) -> ChromosomePair {
    if rng.random::<f32>() >= rate {
        return if rng.random::<bool>() {
            mother.clone()
        } else {
            father.clone()
        };
    }

    let mut splice = |slot: usize| {
        let len = mother.homologs[slot].len();
        let point = if len > 1 { rng.random_range(1..len) } else { 0 };
        let genes = (0..len)
            .map(|index| {
                let source = if index < point { slot } else { 1 - slot };
                let maternal = pick_allele(&mother.homologs[source].genes[index], rng);
                let paternal = pick_allele(&father.homologs[source].genes[index], rng);
                Gene::new(maternal, paternal)
            })
            .collect();
        Chromosome::new(genes)
    };

    let first = splice(0);
    let second = splice(1);
    ChromosomePair::new(first, second)
}

/// Builds an offspring genome pair by pair; the child's sex is drawn 50/50.
pub fn crossover_genomes<R: Rng + ?Sized>(
    mother: &Genome,
    father: &Genome,
    rate: f32,
    rng: &mut R,
) -> Genome {
    let pairs = mother
        .pairs
        .iter()
        .zip(&father.pairs)
        .map(|(m, f)| crossover(m, f, rate, rng))
        .collect();
    Genome {
        pairs,
        sex: Sex::random(rng),
    }
}
