//! Diploid genetics: alleles, genes, chromosomes, expression and inheritance.
//!
//! A [`Genome`] holds eight homologous [`ChromosomePair`]s whose loci are
//! described by a shared [`GeneLayout`]. Trait loci are expressed into a
//! [`Phenotype`]; brain loci are expressed into a flat weight vector.

pub mod crossover;
pub mod gene;
pub mod genome;
pub mod layout;
pub mod mutation;
pub mod phenotype;
pub mod similarity;

pub use crossover::{crossover, crossover_genomes};
pub use gene::{Allele, Gene, express};
pub use genome::{Chromosome, ChromosomePair, Genome, Sex};
pub use layout::{CHROMOSOME_COUNT, GeneLayout, Locus, PAIR_COUNT};
pub use mutation::{MutationKind, MutationRates, MutationReport, mutate};
pub use phenotype::{Phenotype, Trait, TraitSpec, TraitTable, derive_phenotype, sex_modifier};
pub use similarity::genetic_similarity;
