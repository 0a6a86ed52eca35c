//! Alleles, diploid genes and dominance-weighted expression.

use serde::{Deserialize, Serialize};

/// Denominator below which dominance carries no signal and both alleles
/// contribute equally.
pub const DOMINANCE_EPSILON: f32 = 1e-8;

/// One inherited copy of a gene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allele {
    /// Phenotypic (or weight) value carried by this allele.
    pub value: f32,
    /// Dominance coefficient in `[0, 1]`.
    pub dominance: f32,
}

impl Allele {
    /// Creates an allele, clamping dominance into `[0, 1]`.
    pub fn new(value: f32, dominance: f32) -> Self {
        Self {
            value,
            dominance: dominance.clamp(0.0, 1.0),
        }
    }
}

/// A diploid gene: exactly one maternal and one paternal allele.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Maternal allele.
    pub allele_a: Allele,
    /// Paternal allele.
    pub allele_b: Allele,
}

impl Gene {
    /// Creates a gene from its two alleles.
    pub fn new(allele_a: Allele, allele_b: Allele) -> Self {
        Self { allele_a, allele_b }
    }

    /// Exchanges the maternal and paternal alleles.
    pub fn swap_alleles(&mut self) {
        std::mem::swap(&mut self.allele_a, &mut self.allele_b);
    }

    /// Dominance-weighted expression of this gene, see [`express`].
    #[inline]
    pub fn express(&self) -> f32 {
        express(self)
    }
}

/// Combines both alleles proportionally to their relative dominance.
///
/// Falls back to the unweighted mean when the summed dominance is below
/// [`DOMINANCE_EPSILON`].
///
/// # Arguments
///
/// * `gene` - Gene to express
///
/// # Returns
///
/// The expressed phenotypic value.
#[inline]
pub fn express(gene: &Gene) -> f32 {
    let a = gene.allele_a;
    let b = gene.allele_b;
    let total = a.dominance + b.dominance;
    if total < DOMINANCE_EPSILON {
        return (a.value + b.value) * 0.5;
    }
    a.value * (a.dominance / total) + b.value * (b.dominance / total)
}
