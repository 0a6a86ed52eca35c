//! Locus table shared by every genome of a world.
//!
//! The layout assigns each locus (trait gene or brain-weight gene) a fixed
//! position `(pair, index)`. Both homologs of a pair carry the same loci, so
//! gene names live here instead of inside every chromosome.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::phenotype::{Trait, TraitTable};
use crate::simulation::error::ConfigError;

/// Number of homologous chromosome pairs per genome.
pub const PAIR_COUNT: usize = 8;

/// Number of chromosomes per genome.
pub const CHROMOSOME_COUNT: usize = PAIR_COUNT * 2;

/// What a locus encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locus {
    /// One of the genes averaged into a trait.
    Trait(Trait),
    /// Brain weight at this position of the flat weight vector.
    Weight(usize),
}

/// Fixed mapping from loci to chromosome positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneLayout {
    loci: Vec<Locus>,
    pair_ranges: Vec<Range<usize>>,
    trait_loci: Vec<Vec<(usize, usize)>>,
    weight_loci: Vec<(usize, usize)>,
}

impl GeneLayout {
    /// Builds the layout for a trait table and a brain weight count.
    ///
    /// Trait loci come first, then brain loci in weight order; the sequence is
    /// split into [`PAIR_COUNT`] contiguous chunks of near-equal length.
    pub fn new(traits: &TraitTable, weight_count: usize) -> Result<Self, ConfigError> {
        let mut loci = Vec::new();
        for spec in traits.iter() {
            if spec.genes == 0 {
                return Err(ConfigError::EmptyTraitMapping(spec.name));
            }
            loci.extend(std::iter::repeat_n(Locus::Trait(spec.name), spec.genes));
        }
        loci.extend((0..weight_count).map(Locus::Weight));

        let base = loci.len() / PAIR_COUNT;
        let extra = loci.len() % PAIR_COUNT;
        let mut pair_ranges = Vec::with_capacity(PAIR_COUNT);
        let mut start = 0;
        for pair in 0..PAIR_COUNT {
            let len = base + usize::from(pair < extra);
            pair_ranges.push(start..start + len);
            start += len;
        }

        let mut trait_loci = vec![Vec::new(); Trait::COUNT];
        let mut weight_loci = vec![(0, 0); weight_count];
        for (pair, range) in pair_ranges.iter().enumerate() {
            for (index, locus) in loci[range.clone()].iter().enumerate() {
                match *locus {
                    Locus::Trait(name) => trait_loci[name.index()].push((pair, index)),
                    Locus::Weight(w) => weight_loci[w] = (pair, index),
                }
            }
        }

        if let Some(name) = Trait::ALL
            .iter()
            .find(|name| trait_loci[name.index()].is_empty())
        {
            return Err(ConfigError::EmptyTraitMapping(*name));
        }

        Ok(Self {
            loci,
            pair_ranges,
            trait_loci,
            weight_loci,
        })
    }

    /// Loci carried by each homolog of `pair`.
    #[inline]
    pub fn pair_loci(&self, pair: usize) -> &[Locus] {
        &self.loci[self.pair_ranges[pair].clone()]
    }

    /// Number of genes on each homolog of `pair`.
    #[inline]
    pub fn pair_len(&self, pair: usize) -> usize {
        self.pair_ranges[pair].len()
    }

    /// Positions `(pair, index)` of every locus mapped to a trait.
    #[inline]
    pub fn trait_loci(&self, name: Trait) -> &[(usize, usize)] {
        &self.trait_loci[name.index()]
    }

    /// Positions `(pair, index)` of the brain loci, in weight order.
    #[inline]
    pub fn weight_loci(&self) -> &[(usize, usize)] {
        &self.weight_loci
    }

    /// Number of brain weights encoded.
    #[inline]
    pub fn weight_count(&self) -> usize {
        self.weight_loci.len()
    }

    /// Number of loci per haploid chromosome set.
    #[inline]
    pub fn locus_count(&self) -> usize {
        self.loci.len()
    }

    /// Alleles in a full genome export (two homologs, two alleles per gene).
    #[inline]
    pub fn allele_count(&self) -> usize {
        self.loci.len() * 4
    }

    /// Human-readable name of the gene at `(pair, index)`.
    pub fn locus_name(&self, pair: usize, index: usize) -> String {
        match self.pair_loci(pair)[index] {
            Locus::Trait(name) => {
                let ordinal = self.trait_loci[name.index()]
                    .iter()
                    .position(|&pos| pos == (pair, index))
                    .unwrap_or(0);
                format!("{}_{}", name.name(), ordinal)
            }
            Locus::Weight(w) => format!("w_{w}"),
        }
    }
}
