//! Crate-wide constants.

/// Smallest weight handed out by the random graph generator.
pub(crate) const MIN_RANDOM_WEIGHT: u32 = 1;

/// Largest weight handed out by the random graph generator. Weights are
/// integer-valued so that float totals from different contraction orders
/// compare exactly.
pub(crate) const MAX_RANDOM_WEIGHT: u32 = 100;
