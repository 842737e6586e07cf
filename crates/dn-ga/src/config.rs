//! Optimizer configuration and feasibility validation.

use crate::error::{GaError, GaResult};

/// Immutable search configuration, validated once before the first
/// generation. Infeasible combinations fail here; they are never clamped.
#[derive(Debug, Clone)]
pub struct GaConfig {
    pub population_size: usize,
    pub generation_count: usize,
    /// Fresh random individuals injected per generation.
    pub lucky_few: usize,
    pub mutation_prob: f64,
    pub min_plants: usize,
    pub max_plants: usize,

    /// Search the loop/branch flag; otherwise it stays at `false`.
    pub optimize_loop_branch: bool,
    /// Search the served-load flags; otherwise all loads are served.
    pub optimize_network_loads: bool,
    /// Search building connections; otherwise `static_disconnected` applies.
    pub optimize_building_connections: bool,

    /// Pin one plant at the peak-demand building.
    pub use_rule_based_anchor: bool,
    /// Building indices where a plant may be placed.
    pub admissible_sites: Vec<usize>,
    /// Buildings forced disconnected when connection search is off.
    pub static_disconnected: Vec<usize>,
    /// Allow every building to end up disconnected.
    pub allow_fully_disconnected: bool,

    /// Number of served-load flags in the genotype.
    pub load_count: usize,
    /// Serving load `.0` forces load `.1` to be served as well.
    pub load_coupling: Option<(usize, usize)>,

    pub building_count: usize,
    pub seed: u64,
}

impl GaConfig {
    pub fn validate(&self) -> GaResult<()> {
        if self.building_count == 0 {
            return Err(GaError::NoBuildings);
        }
        if self.population_size < 2 {
            return Err(GaError::PopulationTooSmall {
                population_size: self.population_size,
            });
        }
        if self.generation_count == 0 {
            return Err(GaError::NoGenerations);
        }
        if self.lucky_few >= self.population_size {
            return Err(GaError::LuckyFewTooLarge {
                lucky_few: self.lucky_few,
                population_size: self.population_size,
            });
        }
        if self.min_plants > self.max_plants {
            return Err(GaError::InfeasibleBounds {
                min_plants: self.min_plants,
                max_plants: self.max_plants,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(GaError::BadProbability {
                value: self.mutation_prob,
            });
        }
        for &site in &self.admissible_sites {
            if site >= self.building_count {
                return Err(GaError::SiteOutOfRange {
                    index: site,
                    buildings: self.building_count,
                });
            }
        }
        if self.min_plants > self.admissible_sites.len() {
            return Err(GaError::NotEnoughSites {
                required: self.min_plants,
                available: self.admissible_sites.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn base_config() -> GaConfig {
        GaConfig {
            population_size: 8,
            generation_count: 5,
            lucky_few: 2,
            mutation_prob: 0.2,
            min_plants: 1,
            max_plants: 2,
            optimize_loop_branch: true,
            optimize_network_loads: true,
            optimize_building_connections: true,
            use_rule_based_anchor: false,
            admissible_sites: vec![0, 1, 2, 3],
            static_disconnected: Vec::new(),
            allow_fully_disconnected: false,
            load_count: 2,
            load_coupling: None,
            building_count: 4,
            seed: 42,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(base_config().validate(), Ok(()));
    }

    #[test]
    fn inverted_plant_bounds_fail() {
        let mut c = base_config();
        c.min_plants = 3;
        c.max_plants = 1;
        assert_eq!(
            c.validate(),
            Err(GaError::InfeasibleBounds {
                min_plants: 3,
                max_plants: 1
            })
        );
    }

    #[test]
    fn too_few_sites_fail() {
        let mut c = base_config();
        c.admissible_sites = vec![0];
        c.min_plants = 2;
        assert_eq!(
            c.validate(),
            Err(GaError::NotEnoughSites {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn probability_outside_unit_interval_fails() {
        let mut c = base_config();
        c.mutation_prob = 1.5;
        assert!(matches!(c.validate(), Err(GaError::BadProbability { .. })));
    }
}
