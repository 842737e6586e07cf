//! The design genotype and its canonical encoding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Role of one building in a design candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingState {
    /// Served by the network, no plant on site.
    Connected,
    /// Served by the network and hosting a plant.
    Plant,
    /// Not served; gets a decentralized unit instead.
    Disconnected,
}

impl BuildingState {
    pub fn is_connected(self) -> bool {
        self != BuildingState::Disconnected
    }
}

/// One design candidate.
///
/// Fitness is a pure function of this value given fixed exogenous inputs, so
/// the genotype doubles as the memoization key via [`cache_key`].
///
/// [`cache_key`]: Genotype::cache_key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genotype {
    /// Which end-use loads the network serves.
    pub load_flags: Vec<bool>,
    /// Looped layout instead of a pure branch layout.
    pub looped: bool,
    /// Per-building role, indexed like the project's building list.
    pub buildings: Vec<BuildingState>,
}

impl Genotype {
    pub fn plant_count(&self) -> usize {
        self.buildings
            .iter()
            .filter(|s| **s == BuildingState::Plant)
            .count()
    }

    pub fn plant_indices(&self) -> Vec<usize> {
        self.state_indices(BuildingState::Plant)
    }

    pub fn disconnected_indices(&self) -> Vec<usize> {
        self.state_indices(BuildingState::Disconnected)
    }

    pub fn connected_count(&self) -> usize {
        self.buildings.iter().filter(|s| s.is_connected()).count()
    }

    fn state_indices(&self, state: BuildingState) -> Vec<usize> {
        self.buildings
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == state)
            .map(|(i, _)| i)
            .collect()
    }

    /// Stable digest of the canonical serialized form, used as the fitness
    /// memo key.
    pub fn cache_key(&self) -> [u8; 32] {
        let encoded = serde_json::to_vec(self).expect("genotype serialization is infallible");
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        hasher.finalize().into()
    }
}

/// Compact gene string, e.g. `L11|B0|PCCD`: served-load flags, loop flag,
/// then one letter per building (P plant, C connected, D disconnected).
impl core::fmt::Display for Genotype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "L")?;
        for &flag in &self.load_flags {
            write!(f, "{}", if flag { '1' } else { '0' })?;
        }
        write!(f, "|B{}|", if self.looped { '1' } else { '0' })?;
        for state in &self.buildings {
            let letter = match state {
                BuildingState::Plant => 'P',
                BuildingState::Connected => 'C',
                BuildingState::Disconnected => 'D',
            };
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}
