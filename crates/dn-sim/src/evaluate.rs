//! End-to-end pricing of a genotype, and the fitness adapter.

use std::time::Instant;

use tracing::warn;

use dn_core::ensure_finite;
use dn_costs::{price_design, CostBreakdown, DecentralLoad, PricingContext};
use dn_ga::{BuildingState, FitnessEvaluator, Genotype};

use crate::error::SimResult;
use crate::inputs::Model;
use crate::materialize::materialize;
use crate::simulate::{simulate, SimulationResult};

/// Fitness assigned to designs that cannot be evaluated: infeasible
/// topologies, failed solves, timeouts. Large enough that any priceable
/// design beats it, finite so ranking stays total.
pub const PENALTY_COST: f64 = 1e12;

/// A priced design.
#[derive(Debug, Clone)]
pub struct DesignEvaluation {
    pub breakdown: CostBreakdown,
    /// Simulation output, absent for designs with no network to simulate.
    pub result: Option<SimulationResult>,
}

impl DesignEvaluation {
    pub fn total_cost(&self) -> f64 {
        self.breakdown.total()
    }
}

/// Materialize, simulate and price one genotype.
///
/// Demand the network does not serve is covered decentrally: disconnected
/// buildings price their full peak, connected and plant buildings the peak
/// of their unserved loads. A genotype with no consumers skips the network
/// entirely and prices every building decentrally.
pub fn evaluate_design(model: &Model, genotype: &Genotype) -> SimResult<DesignEvaluation> {
    let deadline = model.eval_timeout.map(|budget| Instant::now() + budget);
    let ctx = PricingContext {
        pipe_econ: model.pipe_econ,
        pump_curve: &model.pump_curve,
        plant_curve: &model.plant_curve,
        disconnected_curve: &model.decentral_curve,
        electricity_price_per_kwh: model.electricity_price_per_kwh,
        energy_price_per_kwh: model.energy_price_per_kwh,
        plant_efficiency: model.plant_efficiency,
        decentral_efficiency: model.decentral_efficiency,
        plant_sizing_margin: model.plant_sizing_margin,
    };

    let consumers = genotype
        .buildings
        .iter()
        .filter(|s| **s == BuildingState::Connected)
        .count();
    if consumers == 0 {
        let loads: Vec<DecentralLoad> = model
            .buildings
            .iter()
            .map(|b| DecentralLoad {
                peak_w: b.peak_total_w(),
                energy_kwh_yr: b.annual_total_kwh(),
            })
            .collect();
        let breakdown = price_design(&ctx, &[], 0.0, 0.0, 0.0, 0.0, &loads);
        return Ok(DesignEvaluation {
            breakdown,
            result: None,
        });
    }

    let candidate = materialize(model, genotype)?;
    let result = simulate(model, &candidate, &genotype.load_flags, deadline)?;

    let decentral_loads: Vec<DecentralLoad> = genotype
        .buildings
        .iter()
        .zip(&model.buildings)
        .map(|(state, building)| match state {
            BuildingState::Disconnected => DecentralLoad {
                peak_w: building.peak_total_w(),
                energy_kwh_yr: building.annual_total_kwh(),
            },
            _ => DecentralLoad {
                peak_w: building.peak_unserved_w(&genotype.load_flags),
                energy_kwh_yr: building.annual_unserved_kwh(&genotype.load_flags),
            },
        })
        .collect();

    let breakdown = price_design(
        &ctx,
        &result.pipes,
        result.peak_pump_power_w,
        result.pump_energy_kwh_yr,
        result.peak_plant_heat_w,
        result.plant_energy_kwh_yr,
        &decentral_loads,
    );
    Ok(DesignEvaluation {
        breakdown,
        result: Some(result),
    })
}

/// [`FitnessEvaluator`] over a shared model; failures price as
/// [`PENALTY_COST`].
pub struct DesignEvaluator<'a> {
    model: &'a Model,
}

impl<'a> DesignEvaluator<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }
}

impl FitnessEvaluator for DesignEvaluator<'_> {
    fn evaluate(&self, genotype: &Genotype) -> f64 {
        match evaluate_design(self.model, genotype) {
            Ok(eval) => match ensure_finite(eval.total_cost(), "design cost") {
                Ok(cost) => cost,
                Err(err) => {
                    warn!(%err, "non-finite design cost, assigning penalty");
                    PENALTY_COST
                }
            },
            Err(err) => {
                warn!(%err, "design evaluation failed, assigning penalty");
                PENALTY_COST
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn connected_star_prices_every_component() {
        let model = testutil::model();
        let eval = evaluate_design(&model, &testutil::genotype_all_connected()).unwrap();
        let b = &eval.breakdown;
        assert!(b.capex_a_pipes > 0.0);
        assert!(b.capex_a_pump > 0.0);
        assert!(b.capex_a_plant > 0.0);
        // every load is served, nothing decentral
        assert_eq!(b.capex_a_disconnected, 0.0);
        assert!(eval.total_cost() < PENALTY_COST);
        assert!(eval.result.is_some());
    }

    #[test]
    fn disconnected_demand_is_priced_decentrally() {
        let model = testutil::model();
        let mut g = testutil::genotype_all_connected();
        g.buildings[1] = BuildingState::Disconnected;
        let eval = evaluate_design(&model, &g).unwrap();
        assert!(eval.breakdown.capex_a_disconnected > 0.0);
        // the decentralized unit also burns carrier energy over the year
        assert!(eval.breakdown.opex_decentral_energy > 0.0);
    }

    #[test]
    fn served_heat_prices_plant_energy() {
        let model = testutil::model();
        let eval = evaluate_design(&model, &testutil::genotype_all_connected()).unwrap();
        let result = eval.result.as_ref().unwrap();
        assert!(result.plant_energy_kwh_yr > 0.0);
        let expected = result.plant_energy_kwh_yr / model.plant_efficiency
            * model.energy_price_per_kwh;
        assert!((eval.breakdown.opex_plant_energy - expected).abs() < 1e-9);
        assert_eq!(eval.breakdown.opex_decentral_energy, 0.0);
    }

    #[test]
    fn cooling_design_prices_end_to_end() {
        let model = testutil::cooling_model();
        let eval = evaluate_design(&model, &testutil::genotype_all_connected()).unwrap();
        let b = &eval.breakdown;
        assert!(b.capex_a_pipes > 0.0);
        assert!(b.capex_a_plant > 0.0);
        assert!(b.opex_plant_energy > 0.0);
        assert!(eval.total_cost() > 0.0);
        assert!(eval.total_cost() < PENALTY_COST);
        // chiller duty includes the ground pickup on the cold pipes
        let result = eval.result.as_ref().unwrap();
        assert!(result.peak_plant_heat_w > 80_000.0);
    }

    #[test]
    fn no_consumers_skips_the_network() {
        let model = testutil::model();
        let g = dn_ga::Genotype {
            load_flags: vec![true],
            looped: false,
            buildings: vec![BuildingState::Disconnected; 3],
        };
        let eval = evaluate_design(&model, &g).unwrap();
        assert!(eval.result.is_none());
        assert_eq!(eval.breakdown.capex_a_pipes, 0.0);
        // the two buildings with demand get decentralized units
        assert!(eval.breakdown.capex_a_disconnected > 0.0);
    }

    #[test]
    fn infeasible_genotype_takes_the_penalty() {
        let mut model = testutil::model();
        // sever the branch towards B1, stranding a connected consumer
        model.edges.remove(1);
        let fitness = DesignEvaluator::new(&model).evaluate(&testutil::genotype_all_connected());
        assert_eq!(fitness, PENALTY_COST);
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let model = testutil::model();
        let evaluator = DesignEvaluator::new(&model);
        let genotype = testutil::genotype_all_connected();
        let first = evaluator.evaluate(&genotype);
        let second = evaluator.evaluate(&genotype);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn cheaper_designs_rank_below_the_penalty() {
        let model = testutil::model();
        let evaluator = DesignEvaluator::new(&model);
        let fitness = evaluator.evaluate(&testutil::genotype_all_connected());
        assert!(fitness > 0.0);
        assert!(fitness < PENALTY_COST);
    }
}
