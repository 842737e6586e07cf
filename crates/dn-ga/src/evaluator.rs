//! Fitness evaluation seam.

use crate::genotype::Genotype;

/// Black-box fitness function: annualized total cost of the design a
/// genotype describes, lower is better.
///
/// Implementations must be pure with respect to the genotype (identical
/// genotypes return bit-identical costs) and must map their own failures to a
/// large finite penalty rather than panicking; the optimizer treats every
/// returned value as a valid cost.
pub trait FitnessEvaluator: Sync {
    fn evaluate(&self, genotype: &Genotype) -> f64;
}
