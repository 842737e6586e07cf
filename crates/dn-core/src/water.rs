//! Temperature-dependent property fits for liquid water.
//!
//! Network water stays well inside 0..100 C, so simple single-phase fits are
//! good enough; no equation-of-state backend needed.

/// Density of network water [kg/m3].
pub const RHO_WATER_KGPERM3: f64 = 998.0;

/// Specific heat capacity of network water [J/(kg*K)].
pub const CP_WATER_JPERKGK: f64 = 4185.0;

/// Kinematic viscosity of water as a function of temperature [m2/s].
///
/// Exponential fit to engineering-toolbox data, valid for liquid water
/// between roughly 275 K and 370 K.
pub fn kinematic_viscosity_m2pers(temperature_k: f64) -> f64 {
    2.652623e-8 * (557.5447 / (temperature_k - 140.0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viscosity_decreases_with_temperature() {
        let nu_cold = kinematic_viscosity_m2pers(283.15);
        let nu_hot = kinematic_viscosity_m2pers(353.15);
        assert!(nu_cold > nu_hot);
        // order of magnitude sanity: ~1.3e-6 at 10 C, ~0.36e-6 at 80 C
        assert!(nu_cold > 1.0e-6 && nu_cold < 2.0e-6);
        assert!(nu_hot > 2.0e-7 && nu_hot < 6.0e-7);
    }
}
