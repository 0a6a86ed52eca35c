//! Chromosomes, homologous pairs and the diploid genome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gene::{Allele, Gene};
use super::layout::{GeneLayout, Locus, PAIR_COUNT};
use super::phenotype::TraitTable;
use crate::simulation::error::GenomeError;
use crate::simulation::random::gaussian;

/// Biological sex of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Sex {
    /// Draws a sex 50/50.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random::<bool>() {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

/// An ordered sequence of genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Genes in locus order; names come from the [`GeneLayout`].
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Wraps a gene list.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome carries no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Two homologous chromosomes (`2i` and `2i + 1`) carrying the same loci.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomePair {
    /// The two homologs.
    pub homologs: [Chromosome; 2],
}

impl ChromosomePair {
    /// Creates a pair from its homologs.
    pub fn new(first: Chromosome, second: Chromosome) -> Self {
        Self {
            homologs: [first, second],
        }
    }
}

/// Eight homologous chromosome pairs plus a sex tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Chromosome pairs; pair `i` holds chromosomes `2i` and `2i + 1`.
    pub pairs: Vec<ChromosomePair>,
    /// Sex of the carrier.
    pub sex: Sex,
}

impl Genome {
    /// Creates a founder genome.
    ///
    /// Trait alleles scatter around each trait's default by `initial_spread`
    /// of its range; brain alleles are drawn from `N(0, brain_init_stddev)`.
    /// Dominance is uniform in `[0, 1]`.
    ///
    /// # Arguments
    ///
    /// * `layout` - Locus table
    /// * `traits` - Trait defaults and ranges
    /// * `initial_spread` - Trait allele spread as a fraction of the range
    /// * `brain_init_stddev` - Spread of brain-weight alleles
    /// * `rng` - Random stream
    pub fn random<R: Rng + ?Sized>(
        layout: &GeneLayout,
        traits: &TraitTable,
        initial_spread: f32,
        brain_init_stddev: f32,
        rng: &mut R,
    ) -> Self {
        let random_allele = |locus: Locus, rng: &mut R| {
            let value = match locus {
                Locus::Trait(name) => {
                    let spec = traits.get(name);
                    spec.default + gaussian(rng, initial_spread * spec.span())
                }
                Locus::Weight(_) => gaussian(rng, brain_init_stddev),
            };
            Allele::new(value, rng.random::<f32>())
        };

        let pairs = (0..PAIR_COUNT)
            .map(|pair| {
                let mut homolog = || {
                    Chromosome::new(
                        layout
                            .pair_loci(pair)
                            .iter()
                            .map(|&locus| {
                                let a = random_allele(locus, rng);
                                let b = random_allele(locus, rng);
                                Gene::new(a, b)
                            })
                            .collect(),
                    )
                };
                let first = homolog();
                let second = homolog();
                ChromosomePair::new(first, second)
            })
            .collect();

        Self {
            pairs,
            sex: Sex::random(rng),
        }
    }

    /// Checks the genome against a layout.
    pub fn validate(&self, layout: &GeneLayout) -> Result<(), GenomeError> {
        if self.pairs.len() != PAIR_COUNT {
            return Err(GenomeError::PairCount(self.pairs.len()));
        }
        for (pair_index, pair) in self.pairs.iter().enumerate() {
            let expected = layout.pair_len(pair_index);
            for (slot, homolog) in pair.homologs.iter().enumerate() {
                if homolog.len() != expected {
                    return Err(GenomeError::ChromosomeLength {
                        chromosome: pair_index * 2 + slot,
                        expected,
                        actual: homolog.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Iterates all genes in chromosome order (chromosome 0, 1, ..., 15).
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.pairs
            .iter()
            .flat_map(|pair| pair.homologs.iter())
            .flat_map(|homolog| homolog.genes.iter())
    }

    /// Iterates all genes mutably in chromosome order.
    pub fn genes_mut(&mut self) -> impl Iterator<Item = &mut Gene> {
        self.pairs
            .iter_mut()
            .flat_map(|pair| pair.homologs.iter_mut())
            .flat_map(|homolog| homolog.genes.iter_mut())
    }

    /// Total number of genes (both homologs).
    pub fn gene_count(&self) -> usize {
        self.pairs
            .iter()
            .flat_map(|pair| pair.homologs.iter())
            .map(Chromosome::len)
            .sum()
    }

    /// Rebuilds the flat brain weight vector.
    ///
    /// Weight `k` is the mean expression of its two homologous genes, read in
    /// chromosome order.
    pub fn brain_weights(&self, layout: &GeneLayout) -> Vec<f32> {
        layout
            .weight_loci()
            .iter()
            .map(|&(pair, index)| {
                let [first, second] = &self.pairs[pair].homologs;
                (first.genes[index].express() + second.genes[index].express()) * 0.5
            })
            .collect()
    }

    /// Exports every allele as `(value, dominance)` in chromosome/gene order,
    /// maternal allele before paternal.
    pub fn to_flat(&self) -> Vec<(f32, f32)> {
        self.genes()
            .flat_map(|gene| {
                [
                    (gene.allele_a.value, gene.allele_a.dominance),
                    (gene.allele_b.value, gene.allele_b.dominance),
                ]
            })
            .collect()
    }

    /// Rebuilds a genome from [`Genome::to_flat`] output.
    ///
    /// Values are taken verbatim so the round trip is lossless.
    pub fn from_flat(layout: &GeneLayout, sex: Sex, flat: &[(f32, f32)]) -> Result<Self, GenomeError> {
        if flat.len() != layout.allele_count() {
            return Err(GenomeError::FlatLength {
                expected: layout.allele_count(),
                actual: flat.len(),
            });
        }

        let mut alleles = flat.iter().map(|&(value, dominance)| Allele { value, dominance });
        let mut next_chromosome = |len: usize| {
            Chromosome::new(
                (0..len)
                    .map(|_| {
                        // Length was checked above.
                        let a = alleles.next().unwrap_or(Allele::new(0.0, 0.0));
                        let b = alleles.next().unwrap_or(Allele::new(0.0, 0.0));
                        Gene::new(a, b)
                    })
                    .collect(),
            )
        };

        let pairs = (0..PAIR_COUNT)
            .map(|pair| {
                let len = layout.pair_len(pair);
                let first = next_chromosome(len);
                let second = next_chromosome(len);
                ChromosomePair::new(first, second)
            })
            .collect();

        Ok(Self { pairs, sex })
    }
}
