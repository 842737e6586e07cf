//! Thread-safe fitness memoization.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::evaluator::FitnessEvaluator;
use crate::genotype::Genotype;

/// Genotype-to-cost memo shared across worker threads.
///
/// Fitness is pure given fixed exogenous inputs, so the first computed value
/// for a key is final. The lock is held only around map access, never across
/// an evaluation; two workers racing on the same fresh genotype may both
/// evaluate it, but they store the identical result.
#[derive(Debug, Default)]
pub struct FitnessCache {
    inner: Mutex<HashMap<[u8; 32], f64>>,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&self, genotype: &Genotype, evaluator: &dyn FitnessEvaluator) -> f64 {
        let key = genotype.cache_key();
        if let Some(&cost) = self.inner.lock().expect("cache lock").get(&key) {
            return cost;
        }
        let cost = evaluator.evaluate(genotype);
        self.inner.lock().expect("cache lock").insert(key, cost);
        cost
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
