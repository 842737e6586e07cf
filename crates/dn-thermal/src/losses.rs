//! Steady-state heat loss coefficients for buried insulated pipes.

use std::f64::consts::PI;

use dn_hydro::PipeAssignment;

/// Thermal conductivity of the steel carrier pipe [W/(m*K)].
const K_STEEL_WPERMK: f64 = 58.7;

/// Thermal conductivity of PUR insulation [W/(m*K)].
const K_INSULATION_WPERMK: f64 = 0.059;

/// Heat loss per metre of pipe per kelvin of water-to-ground difference,
/// from the series resistance of the pipe wall and the insulation shell:
/// 2π / (ln(d_ext/d_int)/k_steel + ln(d_ins/d_ext)/k_ins)  [W/(m*K)].
pub fn linear_loss_coefficient_wpermk(d_int_m: f64, d_ext_m: f64, d_ins_m: f64) -> f64 {
    let r_wall = (d_ext_m / d_int_m).ln() / K_STEEL_WPERMK;
    let r_ins = (d_ins_m / d_ext_m).ln() / K_INSULATION_WPERMK;
    2.0 * PI / (r_wall + r_ins)
}

/// UA value of one sized edge [W/K].
pub fn edge_ua_wperk(pipe: &PipeAssignment) -> f64 {
    linear_loss_coefficient_wpermk(pipe.d_int_m, pipe.d_ext_m, pipe.d_ins_m) * pipe.length_m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insulation_dominates_the_resistance() {
        let with_ins = linear_loss_coefficient_wpermk(0.1071, 0.1143, 0.20);
        let thin_ins = linear_loss_coefficient_wpermk(0.1071, 0.1143, 0.13);
        assert!(with_ins < thin_ins);
        // typical preinsulated DN100 is a fraction of a W/(m*K)
        assert!(with_ins > 0.1 && with_ins < 2.0);
    }

    #[test]
    fn ua_scales_with_length() {
        let pipe = |length_m: f64| PipeAssignment {
            edge: dn_core::EdgeId::from_index(0),
            label: "DN100".into(),
            d_int_m: 0.1071,
            d_ext_m: 0.1143,
            d_ins_m: 0.20,
            length_m,
            cost_per_m: 220.0,
            peak_flow_kgps: 5.0,
        };
        let short = edge_ua_wperk(&pipe(50.0));
        let long = edge_ua_wperk(&pipe(100.0));
        assert!((long / short - 2.0).abs() < 1e-12);
    }
}
