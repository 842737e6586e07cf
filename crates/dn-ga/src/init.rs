//! Random genotype generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GaConfig;
use crate::genotype::{BuildingState, Genotype};
use crate::ops::{apply_load_coupling, repair};

/// Generate one random genotype honoring every gene-segment gate.
///
/// Segments whose search is disabled take their fixed value: all loads
/// served, branch layout, and the static disconnected list.
pub fn random_genotype(rng: &mut impl Rng, config: &GaConfig, anchor: Option<usize>) -> Genotype {
    let n = config.building_count;
    let mut buildings = vec![BuildingState::Connected; n];

    if config.optimize_building_connections {
        let max_disconnect = if config.allow_fully_disconnected { n } else { n - 1 };
        let count = rng.random_range(0..=max_disconnect);
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        for &i in order.iter().take(count) {
            buildings[i] = BuildingState::Disconnected;
        }
    } else {
        for &i in &config.static_disconnected {
            buildings[i] = BuildingState::Disconnected;
        }
    }

    if let Some(a) = anchor {
        buildings[a] = BuildingState::Plant;
    }
    let target = rng.random_range(config.min_plants..=config.max_plants);
    let mut sites = crate::ops::promotable_sites(config, &buildings);
    sites.shuffle(rng);
    for &site in &sites {
        if buildings.iter().filter(|s| **s == BuildingState::Plant).count() >= target {
            break;
        }
        buildings[site] = BuildingState::Plant;
    }

    let looped = config.optimize_loop_branch && rng.random_bool(0.5);
    let mut load_flags = if config.optimize_network_loads {
        (0..config.load_count).map(|_| rng.random_bool(0.5)).collect()
    } else {
        vec![true; config.load_count]
    };
    apply_load_coupling(&mut load_flags, config.load_coupling);

    let mut genotype = Genotype {
        load_flags,
        looped,
        buildings,
    };
    repair(rng, &mut genotype, config, anchor);
    genotype
}
