//! Crossover, mutation, and invariant repair.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::warn;

use crate::config::GaConfig;
use crate::genotype::{BuildingState, Genotype};

/// Uniform crossover: genes both parents agree on are kept, the rest pick a
/// parent at random. The child is repaired by the caller.
pub fn crossover(rng: &mut impl Rng, a: &Genotype, b: &Genotype) -> Genotype {
    let load_flags = a
        .load_flags
        .iter()
        .zip(&b.load_flags)
        .map(|(&x, &y)| if x == y || rng.random_bool(0.5) { x } else { y })
        .collect();
    let looped = if a.looped == b.looped || rng.random_bool(0.5) {
        a.looped
    } else {
        b.looped
    };
    let buildings = a
        .buildings
        .iter()
        .zip(&b.buildings)
        .map(|(&x, &y)| if x == y || rng.random_bool(0.5) { x } else { y })
        .collect();
    Genotype {
        load_flags,
        looped,
        buildings,
    }
}

/// Apply each enabled mutation kind with the configured probability, then
/// repair. Plant relocation never moves a pinned anchor.
pub fn mutate(rng: &mut impl Rng, g: &mut Genotype, config: &GaConfig, anchor: Option<usize>) {
    let p = config.mutation_prob;

    if config.optimize_building_connections && rng.random_bool(p) {
        let candidates: Vec<usize> = (0..g.buildings.len())
            .filter(|&i| g.buildings[i] != BuildingState::Plant)
            .collect();
        if let Some(&i) = candidates.choose(rng) {
            g.buildings[i] = match g.buildings[i] {
                BuildingState::Connected => BuildingState::Disconnected,
                _ => BuildingState::Connected,
            };
        }
    }

    if rng.random_bool(p) {
        let movable: Vec<usize> = g
            .plant_indices()
            .into_iter()
            .filter(|&i| anchor != Some(i))
            .collect();
        let targets = promotable_sites(config, &g.buildings);
        if let (Some(&from), Some(&to)) = (movable.choose(rng), targets.choose(rng)) {
            g.buildings[from] = BuildingState::Connected;
            g.buildings[to] = BuildingState::Plant;
        }
    }

    if config.optimize_loop_branch && rng.random_bool(p) {
        g.looped = !g.looped;
    }

    if config.optimize_network_loads && !g.load_flags.is_empty() && rng.random_bool(p) {
        let i = rng.random_range(0..g.load_flags.len());
        g.load_flags[i] = !g.load_flags[i];
    }

    repair(rng, g, config, anchor);
}

/// Restore every genotype invariant after crossover or mutation.
///
/// Order matters: the anchor is re-pinned first, plant bounds are fixed by
/// demoting or promoting at admissible sites, and connectivity is restored
/// last.
pub fn repair(rng: &mut impl Rng, g: &mut Genotype, config: &GaConfig, anchor: Option<usize>) {
    if let Some(a) = anchor {
        g.buildings[a] = BuildingState::Plant;
    }

    while g.plant_count() > config.max_plants {
        let removable: Vec<usize> = g
            .plant_indices()
            .into_iter()
            .filter(|&i| anchor != Some(i))
            .collect();
        match removable.choose(rng) {
            Some(&i) => g.buildings[i] = BuildingState::Connected,
            None => break,
        }
    }

    while g.plant_count() < config.min_plants {
        let candidates = promotable_sites(config, &g.buildings);
        match candidates.choose(rng) {
            Some(&i) => g.buildings[i] = BuildingState::Plant,
            None => {
                warn!("no admissible site left to reach min_plants");
                break;
            }
        }
    }

    if !config.allow_fully_disconnected && g.connected_count() == 0 {
        let i = rng.random_range(0..g.buildings.len());
        g.buildings[i] = BuildingState::Connected;
    }

    apply_load_coupling(&mut g.load_flags, config.load_coupling);
}

/// Admissible sites a plant can move to: no plant there yet, and not a
/// building held disconnected by the static list when connection search is
/// off (placing a plant would silently reconnect it).
pub(crate) fn promotable_sites(config: &GaConfig, buildings: &[BuildingState]) -> Vec<usize> {
    config
        .admissible_sites
        .iter()
        .copied()
        .filter(|&i| buildings[i] != BuildingState::Plant)
        .filter(|&i| {
            config.optimize_building_connections || !config.static_disconnected.contains(&i)
        })
        .collect()
}

pub(crate) fn apply_load_coupling(load_flags: &mut [bool], coupling: Option<(usize, usize)>) {
    if let Some((src, dst)) = coupling {
        if src < load_flags.len() && dst < load_flags.len() && load_flags[src] {
            load_flags[dst] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::random_genotype;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> GaConfig {
        GaConfig {
            population_size: 8,
            generation_count: 5,
            lucky_few: 2,
            mutation_prob: 0.5,
            min_plants: 1,
            max_plants: 2,
            optimize_loop_branch: true,
            optimize_network_loads: true,
            optimize_building_connections: true,
            use_rule_based_anchor: true,
            admissible_sites: vec![0, 1, 2, 3, 4],
            static_disconnected: Vec::new(),
            allow_fully_disconnected: false,
            load_count: 3,
            load_coupling: Some((0, 1)),
            building_count: 5,
            seed: 13,
        }
    }

    #[test]
    fn hundred_breeding_trials_keep_plant_bounds() {
        let cfg = config();
        let anchor = Some(2);
        let mut rng = StdRng::seed_from_u64(99);
        let mut parents: Vec<Genotype> = (0..10)
            .map(|_| random_genotype(&mut rng, &cfg, anchor))
            .collect();

        for trial in 0..100 {
            let slot = trial % parents.len();
            let a = parents[slot].clone();
            let b = parents[(trial + 1) % parents.len()].clone();
            let mut child = crossover(&mut rng, &a, &b);
            repair(&mut rng, &mut child, &cfg, anchor);
            mutate(&mut rng, &mut child, &cfg, anchor);

            let plants = child.plant_count();
            assert!(plants >= cfg.min_plants && plants <= cfg.max_plants);
            assert_eq!(child.buildings[2], BuildingState::Plant);
            assert!(child.connected_count() >= 1);
            if child.load_flags[0] {
                assert!(child.load_flags[1]);
            }
            parents[slot] = child;
        }
    }

    #[test]
    fn crossover_keeps_agreed_genes() {
        let cfg = config();
        let mut rng = StdRng::seed_from_u64(5);
        let a = random_genotype(&mut rng, &cfg, None);
        let b = a.clone();
        let child = crossover(&mut rng, &a, &b);
        assert_eq!(child, a);
    }

    #[test]
    fn coupling_forces_dependent_load() {
        let mut flags = vec![true, false, true];
        apply_load_coupling(&mut flags, Some((0, 1)));
        assert_eq!(flags, vec![true, true, true]);

        let mut unforced = vec![false, false, true];
        apply_load_coupling(&mut unforced, Some((0, 1)));
        assert_eq!(unforced, vec![false, false, true]);
    }
}
