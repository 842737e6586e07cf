//! The generation loop.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cache::FitnessCache;
use crate::config::GaConfig;
use crate::error::{GaError, GaResult};
use crate::evaluator::FitnessEvaluator;
use crate::genotype::Genotype;
use crate::init::random_genotype;
use crate::ops::{crossover, mutate, repair};

/// A mutated child that still collides with the generation after this many
/// extra mutation attempts is accepted as a duplicate.
const DUP_RETRIES: usize = 10;

/// Snapshot of one evaluated generation.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub index: usize,
    pub best_cost: f64,
    pub mean_cost: f64,
    pub best: Genotype,
}

/// Final result of a search run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Best-ever genotype, tracked independently of the evolving population.
    pub best: Genotype,
    pub best_cost: f64,
    pub generations: Vec<GenerationRecord>,
    /// Distinct genotypes actually evaluated (memo hits excluded).
    pub evaluations: usize,
}

/// Elitist genetic optimizer over network design genotypes.
#[derive(Debug)]
pub struct Optimizer {
    config: GaConfig,
    anchor: Option<usize>,
}

impl Optimizer {
    /// Validate the configuration and fix the plant anchor.
    ///
    /// `anchor` is the index of the peak-demand building; it is only pinned
    /// when the rule-based heuristic is enabled, but it must then be an
    /// admissible site.
    pub fn new(config: GaConfig, anchor: Option<usize>) -> GaResult<Self> {
        config.validate()?;
        let anchor = if config.use_rule_based_anchor {
            let a = anchor.ok_or(GaError::AnchorNotAdmissible { index: usize::MAX })?;
            if !config.admissible_sites.contains(&a) {
                return Err(GaError::AnchorNotAdmissible { index: a });
            }
            Some(a)
        } else {
            None
        };
        Ok(Self { config, anchor })
    }

    /// Run the fixed generation budget and return the best-ever design.
    ///
    /// Breeding is sequential and seeded, so a run is reproducible; only the
    /// fitness evaluations fan out across the worker pool.
    pub fn run(&self, evaluator: &dyn FitnessEvaluator) -> GaOutcome {
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let cache = FitnessCache::new();

        let mut population: Vec<Genotype> = (0..cfg.population_size)
            .map(|_| random_genotype(&mut rng, cfg, self.anchor))
            .collect();

        let mut best: Option<(Genotype, f64)> = None;
        let mut generations = Vec::with_capacity(cfg.generation_count);

        for index in 0..cfg.generation_count {
            let costs: Vec<f64> = population
                .par_iter()
                .map(|g| cache.evaluate(g, evaluator))
                .collect();

            let mut ranked: Vec<(usize, f64)> = costs.iter().copied().enumerate().collect();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
            let (best_i, best_cost) = ranked[0];
            if best.as_ref().is_none_or(|(_, c)| best_cost < *c) {
                best = Some((population[best_i].clone(), best_cost));
            }
            let mean_cost = costs.iter().sum::<f64>() / costs.len() as f64;
            info!(generation = index, best_cost, mean_cost, "generation evaluated");
            generations.push(GenerationRecord {
                index,
                best_cost,
                mean_cost,
                best: population[best_i].clone(),
            });

            if index + 1 == cfg.generation_count {
                break;
            }

            // elitist selection plus fresh blood, then shuffle the pool
            let keep = cfg.population_size - cfg.lucky_few;
            let mut pool: Vec<Genotype> = ranked
                .iter()
                .take(keep)
                .map(|&(i, _)| population[i].clone())
                .collect();
            pool.extend((0..cfg.lucky_few).map(|_| random_genotype(&mut rng, cfg, self.anchor)));
            pool.shuffle(&mut rng);

            let mut seen: HashSet<Genotype> = HashSet::with_capacity(cfg.population_size);
            let mut next = Vec::with_capacity(cfg.population_size);
            for k in 0..cfg.population_size {
                let mut child =
                    crossover(&mut rng, &pool[k % pool.len()], &pool[(k + 1) % pool.len()]);
                repair(&mut rng, &mut child, cfg, self.anchor);
                mutate(&mut rng, &mut child, cfg, self.anchor);

                let mut tries = 0;
                while seen.contains(&child) && tries < DUP_RETRIES {
                    mutate(&mut rng, &mut child, cfg, self.anchor);
                    tries += 1;
                }
                if seen.contains(&child) {
                    debug!(generation = index, "duplicate genotype accepted after retries");
                }
                seen.insert(child.clone());
                next.push(child);
            }
            population = next;
        }

        let (best, best_cost) = best.expect("generation_count is validated non-zero");
        GaOutcome {
            best,
            best_cost,
            generations,
            evaluations: cache.len(),
        }
    }
}
