//! Traits, trait ranges and phenotype derivation.
//!
//! A phenotype is never edited directly. It is always derived from a genome:
//! the dominance-weighted expression of every gene mapped to a trait is
//! averaged, scaled by the sex modifier and clamped to the trait's range.

use serde::{Deserialize, Serialize};

use super::genome::{Genome, Sex};
use super::layout::GeneLayout;
use crate::simulation::error::ConfigError;

/// Heritable physical, behavioral and ecological traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    /// Body size; scales health, damage and metabolism.
    Size,
    /// Multiplier on the world's maximum speed.
    Speed,
    /// Metabolic efficiency; divides energy drain, multiplies food value.
    Efficiency,
    /// Individual lifespan in seconds.
    MaxAge,
    /// Age in seconds at which the agent may reproduce.
    MaturityAge,
    /// Damage multiplier in combat.
    Aggression,
    /// Fraction of incoming damage absorbed.
    Armor,
    /// Reduces infection odds and disease drain.
    DiseaseResistance,
    /// Sensing radius.
    VisionRange,
    /// Chance of each additional offspring per mating.
    Fertility,
}

impl Trait {
    /// Number of trait variants.
    pub const COUNT: usize = 10;

    /// All traits in canonical order.
    pub const ALL: [Trait; Trait::COUNT] = [
        Trait::Size,
        Trait::Speed,
        Trait::Efficiency,
        Trait::MaxAge,
        Trait::MaturityAge,
        Trait::Aggression,
        Trait::Armor,
        Trait::DiseaseResistance,
        Trait::VisionRange,
        Trait::Fertility,
    ];

    /// Position of this trait in [`Trait::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case trait name, used for locus names.
    pub fn name(self) -> &'static str {
        match self {
            Trait::Size => "size",
            Trait::Speed => "speed",
            Trait::Efficiency => "efficiency",
            Trait::MaxAge => "max_age",
            Trait::MaturityAge => "maturity_age",
            Trait::Aggression => "aggression",
            Trait::Armor => "armor",
            Trait::DiseaseResistance => "disease_resistance",
            Trait::VisionRange => "vision_range",
            Trait::Fertility => "fertility",
        }
    }
}

/// Configured range, default and gene count for one trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitSpec {
    /// Trait this entry describes.
    #[serde(rename = "trait")]
    pub name: Trait,
    /// Lower clamp bound.
    pub lo: f32,
    /// Upper clamp bound.
    pub hi: f32,
    /// Centre of the initial allele distribution.
    pub default: f32,
    /// Number of loci per homolog mapped to this trait.
    pub genes: usize,
}

impl TraitSpec {
    /// Creates a trait entry.
    pub fn new(name: Trait, lo: f32, hi: f32, default: f32, genes: usize) -> Self {
        Self {
            name,
            lo,
            hi,
            default,
            genes,
        }
    }

    /// Width of the range, never zero.
    #[inline]
    pub fn span(&self) -> f32 {
        (self.hi - self.lo).max(f32::EPSILON)
    }
}

/// Validated trait table indexed by [`Trait::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitTable {
    specs: Vec<TraitSpec>,
}

impl TraitTable {
    /// Builds a table from an unordered list, checking that every trait is
    /// configured exactly once with a non-empty gene list and a valid range.
    pub fn new(specs: &[TraitSpec]) -> Result<Self, ConfigError> {
        let mut slots: Vec<Option<TraitSpec>> = vec![None; Trait::COUNT];
        for spec in specs {
            let slot = &mut slots[spec.name.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateTrait(spec.name));
            }
            if spec.genes == 0 {
                return Err(ConfigError::EmptyTraitMapping(spec.name));
            }
            if !(spec.lo.is_finite() && spec.hi.is_finite()) || spec.lo > spec.hi {
                return Err(ConfigError::InvalidTraitRange {
                    name: spec.name,
                    lo: spec.lo,
                    hi: spec.hi,
                });
            }
            *slot = Some(*spec);
        }

        let specs = slots
            .into_iter()
            .zip(Trait::ALL)
            .map(|(slot, name)| slot.ok_or(ConfigError::MissingTrait(name)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { specs })
    }

    /// Entry for a trait.
    #[inline]
    pub fn get(&self, name: Trait) -> &TraitSpec {
        &self.specs[name.index()]
    }

    /// All entries in canonical trait order.
    pub fn iter(&self) -> impl Iterator<Item = &TraitSpec> {
        self.specs.iter()
    }
}

/// Multiplier applied to a trait for the given sex.
///
/// Males are slightly larger and faster but less efficient and shorter-lived;
/// females carry the mirrored modifiers.
pub fn sex_modifier(sex: Sex, name: Trait) -> f32 {
    let sign = match sex {
        Sex::Male => 1.0,
        Sex::Female => -1.0,
    };
    match name {
        Trait::Speed | Trait::Size => 1.0 + sign * 0.05,
        Trait::Efficiency => 1.0 - sign * 0.03,
        Trait::MaxAge => 1.0 - sign * 0.05,
        _ => 1.0,
    }
}

/// Realised, clamped trait values of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    values: [f32; Trait::COUNT],
}

impl Phenotype {
    /// Builds a phenotype from raw values (clamping is the caller's job).
    pub fn from_values(values: [f32; Trait::COUNT]) -> Self {
        Self { values }
    }

    /// Value of a trait.
    #[inline]
    pub fn get(&self, name: Trait) -> f32 {
        self.values[name.index()]
    }

    /// `(trait, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f32)> + '_ {
        Trait::ALL.iter().map(|&t| (t, self.values[t.index()]))
    }
}

/// Derives the phenotype of a genome.
///
/// # Arguments
///
/// * `genome` - Source genome
/// * `layout` - Locus table mapping traits to gene positions
/// * `traits` - Ranges used for clamping
///
/// # Returns
///
/// The clamped phenotype.
pub fn derive_phenotype(genome: &Genome, layout: &GeneLayout, traits: &TraitTable) -> Phenotype {
    let mut values = [0.0; Trait::COUNT];
    for name in Trait::ALL {
        let loci = layout.trait_loci(name);
        let mut sum = 0.0;
        let mut count = 0usize;
        for &(pair, index) in loci {
            for homolog in &genome.pairs[pair].homologs {
                sum += homolog.genes[index].express();
                count += 1;
            }
        }
        // Layout construction guarantees at least one locus per trait.
        let mean = sum / count.max(1) as f32;
        let spec = traits.get(name);
        values[name.index()] = (mean * sex_modifier(genome.sex, name)).clamp(spec.lo, spec.hi);
    }
    Phenotype { values }
}
