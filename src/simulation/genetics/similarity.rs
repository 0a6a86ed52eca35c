//! Genetic similarity over trait loci.
//!
//! Brain loci are ignored: species are grouped by body plan and life history,
//! not by network weights.

use super::genome::Genome;
use super::layout::GeneLayout;
use super::phenotype::{Trait, TraitTable};

/// Similarity of two genomes in `[0, 1]`.
///
/// Each trait locus contributes the absolute difference of its expressed
/// values divided by the trait's range (capped at 1). The similarity is one
/// minus the mean contribution; identical genomes score `1.0`.
pub fn genetic_similarity(a: &Genome, b: &Genome, layout: &GeneLayout, traits: &TraitTable) -> f32 {
    let mut total = 0.0;
    let mut count = 0usize;
    for name in Trait::ALL {
        let span = traits.get(name).span();
        for &(pair, index) in layout.trait_loci(name) {
            for slot in 0..2 {
                let ea = a.pairs[pair].homologs[slot].genes[index].express();
                let eb = b.pairs[pair].homologs[slot].genes[index].express();
                total += ((ea - eb).abs() / span).min(1.0);
                count += 1;
            }
        }
    }
    if count == 0 {
        return 1.0;
    }
    (1.0 - total / count as f32).clamp(0.0, 1.0)
}
