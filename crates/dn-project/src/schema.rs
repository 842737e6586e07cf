//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub network_type: NetworkTypeDef,
    /// Served end-use loads; order defines the genotype's load-flag order.
    pub loads: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_coupling: Option<LoadCouplingDef>,
    pub buildings: Vec<BuildingDef>,
    #[serde(default)]
    pub junctions: Vec<JunctionDef>,
    pub edges: Vec<EdgeDef>,
    pub pipes: PipesDef,
    pub thermal: ThermalDef,
    pub pumping: PumpingDef,
    pub costs: CostsDef,
    pub optimizer: OptimizerDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkTypeDef {
    Heating,
    Cooling,
}

/// Serving `when_served` forces `also_serve` to be served too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadCouplingDef {
    pub when_served: String,
    pub also_serve: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingDef {
    pub name: String,
    pub x_m: f64,
    pub y_m: f64,
    /// Supply temperature this building's substation needs [C]; the network
    /// setpoint must dominate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_supply_c: Option<f64>,
    /// Return temperature of the building's secondary side [C].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_return_c: Option<f64>,
    /// One hourly series per served load.
    pub demands: Vec<DemandSeriesDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemandSeriesDef {
    pub load: String,
    pub hourly_w: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JunctionDef {
    pub name: String,
    pub x_m: f64,
    pub y_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub name: String,
    /// Node name: a building or a junction.
    pub start: String,
    pub end: String,
    pub length_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipesDef {
    pub catalog: Vec<PipeSizeDef>,
    pub roughness_m: f64,
    pub design_velocity_mps: f64,
    /// Multiplier on peak flow when sizing diameters.
    pub peak_load_factor: f64,
    pub economics: FinancingDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeSizeDef {
    pub label: String,
    pub d_int_m: f64,
    pub d_ext_m: f64,
    pub d_ins_m: f64,
    pub cost_per_m: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FinancingDef {
    pub interest_rate: f64,
    pub lifetime_yr: f64,
    pub om_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalDef {
    pub supply_temp_c: f64,
    pub ground_temp_c: f64,
    pub delta_t_k: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PumpingDef {
    pub efficiency: f64,
    pub substation_dp_pa: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostsDef {
    /// Pump equipment curve, capacity in W electric.
    pub pump: CurveDef,
    /// Plant equipment curve, capacity in W thermal.
    pub plant: CurveDef,
    /// Decentralized unit curve for disconnected buildings, W thermal.
    pub decentral: CurveDef,
    pub electricity_price_per_kwh: f64,
    /// Price of the carrier feeding heat or cold production [per kWh].
    #[serde(default)]
    pub energy_price_per_kwh: f64,
    /// Carrier-to-thermal conversion of the central plant (boiler efficiency
    /// or COP).
    #[serde(default = "default_efficiency")]
    pub plant_efficiency: f64,
    /// Carrier-to-thermal conversion of a decentralized unit.
    #[serde(default = "default_efficiency")]
    pub decentral_efficiency: f64,
    pub plant_sizing_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveDef {
    pub name: String,
    pub brackets: Vec<BracketDef>,
    pub financing: FinancingDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BracketDef {
    pub cap_min: f64,
    pub cap_max: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerDef {
    pub population_size: usize,
    pub generation_count: usize,
    pub lucky_few: usize,
    pub mutation_prob: f64,
    pub min_plants: usize,
    pub max_plants: usize,
    #[serde(default = "default_true")]
    pub optimize_loop_branch: bool,
    #[serde(default = "default_true")]
    pub optimize_network_loads: bool,
    #[serde(default = "default_true")]
    pub optimize_building_connections: bool,
    #[serde(default)]
    pub use_rule_based_anchor: bool,
    /// Building names where a plant may sit; empty means every building.
    #[serde(default)]
    pub admissible_sites: Vec<String>,
    /// Buildings forced disconnected when connection search is off.
    #[serde(default)]
    pub static_disconnected: Vec<String>,
    #[serde(default)]
    pub allow_fully_disconnected: bool,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub sampling: SamplingDef,
    /// Wall-clock budget for one fitness evaluation [s]; exceeding it books
    /// the penalty cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_timeout_s: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplingDef {
    /// Simulate all 8760 hours.
    #[default]
    FullYear,
    /// Simulate the first week of each month, scale annual totals.
    RepresentativeWeeks,
}

fn default_true() -> bool {
    true
}

fn default_efficiency() -> f64 {
    1.0
}
