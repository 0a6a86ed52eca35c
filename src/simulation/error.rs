//! Error types for configuration, genetics, brains and the world.
//!
//! Configuration and shape errors are fatal: they are reported when a world is
//! built or a brain is assembled, never silently corrected.

use thiserror::Error;

use super::genetics::Trait;

/// Invalid parameter values or trait tables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A trait has no entry in the trait table.
    #[error("trait {0:?} has no configured range")]
    MissingTrait(Trait),
    /// A trait is listed more than once.
    #[error("trait {0:?} is configured more than once")]
    DuplicateTrait(Trait),
    /// A trait is mapped to zero genes.
    #[error("trait {0:?} is mapped to an empty gene list")]
    EmptyTraitMapping(Trait),
    /// A trait range with `lo > hi` or non-finite bounds.
    #[error("trait {name:?} has invalid range [{lo}, {hi}]")]
    InvalidTraitRange {
        /// Offending trait.
        name: Trait,
        /// Lower bound.
        lo: f32,
        /// Upper bound.
        hi: f32,
    },
    /// A generic out-of-range parameter.
    #[error("parameter `{name}` is invalid: {reason}")]
    InvalidParameter {
        /// Dotted parameter path, e.g. `world.width`.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}

/// Shape errors raised while building or evaluating a brain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrainError {
    /// The flat weight vector does not match the architecture.
    #[error("brain expects {expected} weights, got {actual}")]
    WeightCount {
        /// Weight count of the architecture.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
    /// The input vector does not match the architecture's input width.
    #[error("brain expects {expected} inputs, got {actual}")]
    InputLength {
        /// Input width including memory augmentation.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
}

/// Structural genome errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenomeError {
    /// A genome must have exactly eight chromosome pairs.
    #[error("genome has {0} chromosome pairs, expected 8")]
    PairCount(usize),
    /// A chromosome does not match the locus table.
    #[error("chromosome {chromosome} has {actual} genes, layout expects {expected}")]
    ChromosomeLength {
        /// Chromosome index (0..16).
        chromosome: usize,
        /// Genes required by the layout.
        expected: usize,
        /// Genes present.
        actual: usize,
    },
    /// A flat allele export has the wrong number of entries.
    #[error("flat genome has {actual} alleles, layout expects {expected}")]
    FlatLength {
        /// Allele count required by the layout.
        expected: usize,
        /// Allele count supplied.
        actual: usize,
    },
}

/// Top-level error for world construction, ticking and persistence.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Brain shape violation.
    #[error(transparent)]
    Brain(#[from] BrainError),
    /// Genome structure violation.
    #[error(transparent)]
    Genome(#[from] GenomeError),
    /// Filesystem failure while saving or loading.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
