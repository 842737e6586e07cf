//! Reynolds number, Darcy friction factor, and pressure loss.

use std::f64::consts::PI;

use dn_core::water::{kinematic_viscosity_m2pers, RHO_WATER_KGPERM3};

/// Reynolds number for pipe flow at the given water temperature [K].
pub fn reynolds(mdot_kgps: f64, d_int_m: f64, t_k: f64) -> f64 {
    let nu = kinematic_viscosity_m2pers(t_k);
    4.0 * mdot_kgps.abs() / (RHO_WATER_KGPERM3 * PI * nu * d_int_m)
}

/// Darcy friction factor by flow regime.
///
/// Stagnant flow carries no friction; laminar uses 64/Re, the transitional
/// band uses the Blasius correlation, and fully turbulent flow uses the
/// Swamee-Jain explicit approximation of Colebrook-White.
pub fn darcy_friction_factor(re: f64, d_int_m: f64, roughness_m: f64) -> f64 {
    if re <= 1.0 {
        0.0
    } else if re <= 2300.0 {
        64.0 / re
    } else if re <= 5000.0 {
        0.316 * re.powf(-0.25)
    } else {
        let arg = roughness_m / (3.7 * d_int_m) + 5.74 / re.powf(0.9);
        1.325 * arg.ln().powi(2).recip()
    }
}

/// Darcy-Weisbach pressure loss over a pipe [Pa], non-negative.
pub fn pressure_loss_pa(
    mdot_kgps: f64,
    d_int_m: f64,
    length_m: f64,
    t_k: f64,
    roughness_m: f64,
) -> f64 {
    let re = reynolds(mdot_kgps, d_int_m, t_k);
    let f = darcy_friction_factor(re, d_int_m, roughness_m);
    f * 8.0 * mdot_kgps.powi(2) * length_m / (PI.powi(2) * d_int_m.powi(5) * RHO_WATER_KGPERM3)
}

/// Mean flow velocity in the pipe cross-section [m/s].
pub fn velocity_mps(mdot_kgps: f64, d_int_m: f64) -> f64 {
    mdot_kgps.abs() / (RHO_WATER_KGPERM3 * PI * d_int_m.powi(2) / 4.0)
}
