//! Per-design simulation over the sampled horizon.

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use dn_core::water::CP_WATER_JPERKGK;
use dn_hydro::{
    assign_pipes, critical_path, fold_peak_flows, nodal_demand, pressure_loss_pa,
    pump_electric_power_w, pump_head_pa, solve_edge_flows, HydroError, PipeAssignment,
};
use dn_thermal::{edge_ua_wperk, solve_hour, HourThermal};

use crate::error::{SimError, SimResult};
use crate::inputs::Model;
use crate::materialize::Candidate;

/// Flows below this magnitude leave the pump idle [kg/s].
const FLOW_EPS_KGPS: f64 = 1e-9;

/// Everything one evaluation produced, consumed by the cost model and the
/// summary writer, then discarded.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Sampled hour indices into the demand series.
    pub hours: Vec<usize>,
    pub pipes: Vec<PipeAssignment>,
    /// Signed edge flows per sampled hour `[sample][edge]`.
    pub edge_flow_kgps: Vec<Vec<f64>>,
    pub edge_heat_loss_w: Vec<Vec<f64>>,
    pub node_supply_temp_k: Vec<Vec<f64>>,
    pub node_return_temp_k: Vec<Vec<f64>>,
    /// Plant heat requirement per sampled hour, network plus the plant
    /// buildings' own direct demand [W].
    pub plant_heat_w: Vec<f64>,
    pub pump_power_w: Vec<f64>,
    /// Factor scaling sampled sums to annual totals.
    pub annual_scale: f64,
    pub pump_energy_kwh_yr: f64,
    /// Annual thermal energy the plants deliver [kWh].
    pub plant_energy_kwh_yr: f64,
    pub peak_pump_power_w: f64,
    pub peak_plant_heat_w: f64,
}

/// Simulate one materialized candidate for the served loads.
///
/// Diameters are sized once from the peak flows over the sample, then every
/// hour is solved independently in parallel. A singular flow solve (demand
/// the plants cannot reach) degrades that hour to an all-zero row.
pub fn simulate(
    model: &Model,
    candidate: &Candidate,
    load_flags: &[bool],
    deadline: Option<Instant>,
) -> SimResult<SimulationResult> {
    let network = &candidate.network;
    let e = network.edge_count();
    let hours = model.sampling.sample_hours(model.hours);
    let annual_scale = model.sampling.annual_scale(model.hours);
    let flow_per_watt = 1.0 / (CP_WATER_JPERKGK * model.thermal.delta_t_k);

    let consumer_demand_w: Vec<Vec<f64>> = hours
        .iter()
        .map(|&h| {
            candidate
                .consumer_buildings
                .iter()
                .map(|&b| model.buildings[b].served_demand_w(h, load_flags))
                .collect()
        })
        .collect();

    let edge_flow_kgps: Vec<Vec<f64>> = consumer_demand_w
        .par_iter()
        .map(|demand_w| {
            let consumer_flows: Vec<f64> =
                demand_w.iter().map(|q| q * flow_per_watt).collect();
            let demand = nodal_demand(network, &consumer_flows)?;
            match solve_edge_flows(network, &demand) {
                Ok(flows) => Ok(flows.iter().copied().collect()),
                Err(HydroError::Singular) => {
                    debug!("singular flow solve, degrading hour to zero flow");
                    Ok(vec![0.0; e])
                }
                Err(err) => Err(SimError::from(err)),
            }
        })
        .collect::<SimResult<Vec<_>>>()?;

    check_deadline(deadline, model)?;

    let mut peak_flows = vec![0.0_f64; e];
    for flows in &edge_flow_kgps {
        fold_peak_flows(&mut peak_flows, flows);
    }
    let pipes = assign_pipes(network, &peak_flows, &model.catalog, &model.sizing)?;
    let ua: Vec<f64> = pipes.iter().map(edge_ua_wperk).collect();

    struct HourOut {
        pump_w: f64,
        thermal: HourThermal,
    }

    let per_hour: Vec<HourOut> = (0..hours.len())
        .into_par_iter()
        .map(|s| {
            let flows = &edge_flow_kgps[s];
            let losses_pa: Vec<f64> = flows
                .iter()
                .zip(&pipes)
                .map(|(m, pipe)| {
                    pressure_loss_pa(
                        *m,
                        pipe.d_int_m,
                        pipe.length_m,
                        model.thermal.supply_temp_k,
                        model.roughness_m,
                    )
                })
                .collect();

            let pump_w = if flows.iter().all(|m| m.abs() < FLOW_EPS_KGPS) {
                0.0
            } else {
                let critical = critical_path(network, &losses_pa)?;
                let head = pump_head_pa(critical.loss_pa, &model.pump);
                let plant_flow: f64 = consumer_demand_w[s]
                    .iter()
                    .map(|q| q * flow_per_watt)
                    .sum();
                pump_electric_power_w(head, plant_flow, &model.pump)
            };

            let thermal =
                solve_hour(network, flows, &ua, &consumer_demand_w[s], &model.thermal)?;
            Ok(HourOut { pump_w, thermal })
        })
        .collect::<SimResult<Vec<_>>>()?;

    check_deadline(deadline, model)?;

    let mut result = SimulationResult {
        hours,
        pipes,
        edge_flow_kgps,
        edge_heat_loss_w: Vec::new(),
        node_supply_temp_k: Vec::new(),
        node_return_temp_k: Vec::new(),
        plant_heat_w: Vec::new(),
        pump_power_w: Vec::new(),
        annual_scale,
        pump_energy_kwh_yr: 0.0,
        plant_energy_kwh_yr: 0.0,
        peak_pump_power_w: 0.0,
        peak_plant_heat_w: 0.0,
    };

    for (s, hour) in per_hour.into_iter().enumerate() {
        let direct_w: f64 = candidate
            .plant_buildings
            .iter()
            .map(|&b| model.buildings[b].served_demand_w(result.hours[s], load_flags))
            .sum();
        let plant_w = hour.thermal.plant_heat_w + direct_w;

        result.peak_pump_power_w = result.peak_pump_power_w.max(hour.pump_w);
        result.peak_plant_heat_w = result.peak_plant_heat_w.max(plant_w.abs());
        result.pump_energy_kwh_yr += hour.pump_w / 1000.0;
        result.plant_energy_kwh_yr += plant_w.abs() / 1000.0;
        result.edge_heat_loss_w.push(hour.thermal.heat_loss_w);
        result.node_supply_temp_k.push(hour.thermal.supply_temp_k);
        result.node_return_temp_k.push(hour.thermal.return_temp_k);
        result.plant_heat_w.push(plant_w);
        result.pump_power_w.push(hour.pump_w);
    }
    result.pump_energy_kwh_yr *= annual_scale;
    result.plant_energy_kwh_yr *= annual_scale;

    Ok(result)
}

fn check_deadline(deadline: Option<Instant>, model: &Model) -> SimResult<()> {
    if let Some(deadline) = deadline {
        if Instant::now() > deadline {
            return Err(SimError::Timeout {
                budget_s: model.eval_timeout.map_or(0.0, |d| d.as_secs_f64()),
            });
        }
    }
    Ok(())
}
