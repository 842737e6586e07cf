//! Immutable model inputs, converted once from a validated project.

use std::time::Duration;

use dn_core::units::celsius;
use dn_costs::{EquipmentCostCurve, PipeEconomics};
use dn_ga::GaConfig;
use dn_hydro::{PipeCatalog, PipeSpec, PumpParams, SizingParams};
use dn_project::{CurveDef, NetworkTypeDef, Project};
use dn_thermal::{NetworkKind, ThermalParams};

use crate::error::{SimError, SimResult};
use crate::sampling::SamplingStrategy;

/// One building with its per-load hourly demand, dense over the model's
/// hour count (missing loads are zero-filled).
#[derive(Debug, Clone)]
pub struct Building {
    pub name: String,
    pub x_m: f64,
    pub y_m: f64,
    /// Indexed `[load][hour]`, load order matching [`Model::load_names`].
    pub demand_w: Vec<Vec<f64>>,
}

impl Building {
    /// Demand the network serves this hour, summed over flagged loads.
    pub fn served_demand_w(&self, hour: usize, load_flags: &[bool]) -> f64 {
        self.demand_w
            .iter()
            .zip(load_flags)
            .filter(|(_, served)| **served)
            .map(|(series, _)| series[hour])
            .sum()
    }

    /// Peak of the served demand over all hours.
    pub fn peak_served_w(&self, load_flags: &[bool]) -> f64 {
        let hours = self.demand_w.first().map_or(0, Vec::len);
        (0..hours)
            .map(|h| self.served_demand_w(h, load_flags))
            .fold(0.0, f64::max)
    }

    /// Peak of the total demand over all loads and hours.
    pub fn peak_total_w(&self) -> f64 {
        let all = vec![true; self.demand_w.len()];
        self.peak_served_w(&all)
    }

    /// Peak of the demand the network does NOT serve; a decentralized unit
    /// has to cover it.
    pub fn peak_unserved_w(&self, load_flags: &[bool]) -> f64 {
        let inverted: Vec<bool> = load_flags.iter().map(|f| !f).collect();
        self.peak_served_w(&inverted)
    }

    /// Annual energy of the demand the network does not serve [kWh].
    pub fn annual_unserved_kwh(&self, load_flags: &[bool]) -> f64 {
        let inverted: Vec<bool> = load_flags.iter().map(|f| !f).collect();
        let hours = self.demand_w.first().map_or(0, Vec::len);
        (0..hours)
            .map(|h| self.served_demand_w(h, &inverted))
            .sum::<f64>()
            / 1000.0
    }

    /// Annual energy over all loads [kWh].
    pub fn annual_total_kwh(&self) -> f64 {
        self.annual_unserved_kwh(&vec![false; self.demand_w.len()])
    }
}

#[derive(Debug, Clone)]
pub struct Junction {
    pub name: String,
    pub x_m: f64,
    pub y_m: f64,
}

/// Endpoint of a geometry edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Building(usize),
    Junction(usize),
}

#[derive(Debug, Clone)]
pub struct GeomEdge {
    pub name: String,
    pub a: NodeRef,
    pub b: NodeRef,
    pub length_m: f64,
}

/// Everything a fitness evaluation reads, shared immutably across workers.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub network_type: NetworkKind,
    pub load_names: Vec<String>,
    pub buildings: Vec<Building>,
    pub junctions: Vec<Junction>,
    pub edges: Vec<GeomEdge>,
    /// Length of every demand series.
    pub hours: usize,

    pub catalog: PipeCatalog,
    pub sizing: SizingParams,
    pub roughness_m: f64,
    pub pump: PumpParams,
    pub thermal: ThermalParams,

    pub pipe_econ: PipeEconomics,
    pub pump_curve: EquipmentCostCurve,
    pub plant_curve: EquipmentCostCurve,
    pub decentral_curve: EquipmentCostCurve,
    pub electricity_price_per_kwh: f64,
    /// Price of the carrier feeding heat or cold production [per kWh].
    pub energy_price_per_kwh: f64,
    pub plant_efficiency: f64,
    pub decentral_efficiency: f64,
    pub plant_sizing_margin: f64,

    pub sampling: SamplingStrategy,
    pub eval_timeout: Option<Duration>,
    pub ga: GaConfig,
    /// Peak-demand building, the rule-based plant anchor.
    pub anchor: usize,
}

impl Model {
    /// Convert a validated project. Name references are resolved to indices;
    /// an unknown name here means validation was skipped.
    pub fn from_project(project: &Project) -> SimResult<Self> {
        let hours = project
            .buildings
            .iter()
            .flat_map(|b| b.demands.iter())
            .map(|d| d.hourly_w.len())
            .max()
            .unwrap_or(0);

        let buildings: Vec<Building> = project
            .buildings
            .iter()
            .map(|b| {
                let demand_w = project
                    .loads
                    .iter()
                    .map(|load| {
                        b.demands
                            .iter()
                            .find(|d| &d.load == load)
                            .map(|d| d.hourly_w.clone())
                            .unwrap_or_else(|| vec![0.0; hours])
                    })
                    .collect();
                Building {
                    name: b.name.clone(),
                    x_m: b.x_m,
                    y_m: b.y_m,
                    demand_w,
                }
            })
            .collect();

        let junctions: Vec<Junction> = project
            .junctions
            .iter()
            .map(|j| Junction {
                name: j.name.clone(),
                x_m: j.x_m,
                y_m: j.y_m,
            })
            .collect();

        let resolve = |name: &str| -> SimResult<NodeRef> {
            if let Some(i) = buildings.iter().position(|b| b.name == name) {
                return Ok(NodeRef::Building(i));
            }
            if let Some(i) = junctions.iter().position(|j| j.name == name) {
                return Ok(NodeRef::Junction(i));
            }
            Err(SimError::UnknownName { name: name.into() })
        };
        let edges = project
            .edges
            .iter()
            .map(|e| {
                Ok(GeomEdge {
                    name: e.name.clone(),
                    a: resolve(&e.start)?,
                    b: resolve(&e.end)?,
                    length_m: e.length_m,
                })
            })
            .collect::<SimResult<Vec<_>>>()?;

        let catalog = PipeCatalog::new(
            project
                .pipes
                .catalog
                .iter()
                .map(|row| PipeSpec {
                    label: row.label.clone(),
                    d_int_m: row.d_int_m,
                    d_ext_m: row.d_ext_m,
                    d_ins_m: row.d_ins_m,
                    cost_per_m: row.cost_per_m,
                })
                .collect(),
        )?;

        let building_index = |name: &str| -> SimResult<usize> {
            buildings
                .iter()
                .position(|b| b.name == name)
                .ok_or_else(|| SimError::UnknownName { name: name.into() })
        };
        let admissible_sites = if project.optimizer.admissible_sites.is_empty() {
            (0..buildings.len()).collect()
        } else {
            project
                .optimizer
                .admissible_sites
                .iter()
                .map(|n| building_index(n))
                .collect::<SimResult<Vec<_>>>()?
        };
        let static_disconnected = project
            .optimizer
            .static_disconnected
            .iter()
            .map(|n| building_index(n))
            .collect::<SimResult<Vec<_>>>()?;
        let load_index = |name: &str| -> SimResult<usize> {
            project
                .loads
                .iter()
                .position(|l| l == name)
                .ok_or_else(|| SimError::UnknownName { name: name.into() })
        };
        let load_coupling = match &project.load_coupling {
            Some(c) => Some((load_index(&c.when_served)?, load_index(&c.also_serve)?)),
            None => None,
        };

        let ga = GaConfig {
            population_size: project.optimizer.population_size,
            generation_count: project.optimizer.generation_count,
            lucky_few: project.optimizer.lucky_few,
            mutation_prob: project.optimizer.mutation_prob,
            min_plants: project.optimizer.min_plants,
            max_plants: project.optimizer.max_plants,
            optimize_loop_branch: project.optimizer.optimize_loop_branch,
            optimize_network_loads: project.optimizer.optimize_network_loads,
            optimize_building_connections: project.optimizer.optimize_building_connections,
            use_rule_based_anchor: project.optimizer.use_rule_based_anchor,
            admissible_sites,
            static_disconnected,
            allow_fully_disconnected: project.optimizer.allow_fully_disconnected,
            load_count: project.loads.len(),
            load_coupling,
            building_count: buildings.len(),
            seed: project.optimizer.seed,
        };

        let anchor = buildings
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.peak_total_w().total_cmp(&b.peak_total_w()))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let network_type = match project.network_type {
            NetworkTypeDef::Heating => NetworkKind::Heating,
            NetworkTypeDef::Cooling => NetworkKind::Cooling,
        };

        Ok(Self {
            name: project.name.clone(),
            network_type,
            load_names: project.loads.clone(),
            buildings,
            junctions,
            edges,
            hours,
            catalog,
            sizing: SizingParams {
                design_velocity_mps: project.pipes.design_velocity_mps,
                peak_load_factor: project.pipes.peak_load_factor,
            },
            roughness_m: project.pipes.roughness_m,
            pump: PumpParams {
                efficiency: project.pumping.efficiency,
                substation_dp_pa: project.pumping.substation_dp_pa,
            },
            thermal: ThermalParams {
                kind: network_type,
                supply_temp_k: celsius(project.thermal.supply_temp_c).value,
                ground_temp_k: celsius(project.thermal.ground_temp_c).value,
                delta_t_k: project.thermal.delta_t_k,
            },
            pipe_econ: PipeEconomics {
                interest_rate: project.pipes.economics.interest_rate,
                lifetime_yr: project.pipes.economics.lifetime_yr,
                om_fraction: project.pipes.economics.om_fraction,
            },
            pump_curve: build_curve(&project.costs.pump)?,
            plant_curve: build_curve(&project.costs.plant)?,
            decentral_curve: build_curve(&project.costs.decentral)?,
            electricity_price_per_kwh: project.costs.electricity_price_per_kwh,
            energy_price_per_kwh: project.costs.energy_price_per_kwh,
            plant_efficiency: project.costs.plant_efficiency,
            decentral_efficiency: project.costs.decentral_efficiency,
            plant_sizing_margin: project.costs.plant_sizing_margin,
            sampling: project.optimizer.sampling.into(),
            eval_timeout: project.optimizer.eval_timeout_s.map(Duration::from_secs_f64),
            ga,
            anchor,
        })
    }
}

fn build_curve(def: &CurveDef) -> SimResult<EquipmentCostCurve> {
    let brackets = def
        .brackets
        .iter()
        .map(|b| dn_costs::CostBracket {
            cap_min: b.cap_min,
            cap_max: b.cap_max,
            a: b.a,
            b: b.b,
            c: b.c,
            d: b.d,
            e: b.e,
        })
        .collect();
    Ok(EquipmentCostCurve::new(
        def.name.clone(),
        brackets,
        def.financing.interest_rate,
        def.financing.lifetime_yr,
        def.financing.om_fraction,
    )?)
}

#[cfg(test)]
mod tests {
    use crate::testutil;

    #[test]
    fn model_resolves_names_and_anchor() {
        let model = testutil::model();
        assert_eq!(model.buildings.len(), 3);
        assert_eq!(model.junctions.len(), 1);
        assert_eq!(model.edges.len(), 3);
        assert_eq!(model.hours, 24);
        // B0 carries the largest peak
        assert_eq!(model.anchor, 0);
        assert_eq!(model.ga.building_count, 3);
        assert_eq!(model.ga.load_count, 1);
    }

    #[test]
    fn missing_load_series_are_zero_filled() {
        let model = testutil::model();
        // B2 has no demand entry for the load; dense zeros instead
        assert_eq!(model.buildings[2].demand_w[0].len(), 24);
        assert_eq!(model.buildings[2].peak_total_w(), 0.0);
    }
}
