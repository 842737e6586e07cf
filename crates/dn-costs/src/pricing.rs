//! Pricing a complete sized design.

use dn_hydro::PipeAssignment;

use crate::annuity::annualized;
use crate::curve::EquipmentCostCurve;

/// Financing parameters for the trench piping.
#[derive(Debug, Clone, Copy)]
pub struct PipeEconomics {
    pub interest_rate: f64,
    pub lifetime_yr: f64,
    /// Fixed yearly O&M as a fraction of investment.
    pub om_fraction: f64,
}

/// Static cost inputs, shared read-only across evaluations.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub pipe_econ: PipeEconomics,
    /// Pump curve, capacity in W electric.
    pub pump_curve: &'a EquipmentCostCurve,
    /// Plant equipment curve, capacity in W thermal.
    pub plant_curve: &'a EquipmentCostCurve,
    /// Decentralized unit curve for disconnected buildings, W thermal.
    pub disconnected_curve: &'a EquipmentCostCurve,
    pub electricity_price_per_kwh: f64,
    /// Price of the carrier feeding heat or cold production [per kWh].
    pub energy_price_per_kwh: f64,
    /// Carrier-to-thermal conversion of the plant (boiler efficiency or COP).
    pub plant_efficiency: f64,
    /// Carrier-to-thermal conversion of a decentralized unit.
    pub decentral_efficiency: f64,
    /// Multiplier on peak plant heat when sizing plant equipment.
    pub plant_sizing_margin: f64,
}

/// One building's demand covered outside the network.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecentralLoad {
    /// Sizing capacity of the unit [W].
    pub peak_w: f64,
    /// Annual thermal energy the unit delivers [kWh].
    pub energy_kwh_yr: f64,
}

/// Annualized cost breakdown of one design. Fitness is [`total`].
///
/// [`total`]: CostBreakdown::total
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    pub capex_a_pipes: f64,
    pub capex_a_pump: f64,
    pub capex_a_plant: f64,
    pub capex_a_disconnected: f64,
    pub opex_fixed: f64,
    /// Pump electricity.
    pub opex_electricity: f64,
    /// Carrier energy feeding the plant.
    pub opex_plant_energy: f64,
    /// Carrier energy feeding the decentralized units.
    pub opex_decentral_energy: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.capex_a_pipes
            + self.capex_a_pump
            + self.capex_a_plant
            + self.capex_a_disconnected
            + self.opex_fixed
            + self.opex_electricity
            + self.opex_plant_energy
            + self.opex_decentral_energy
    }
}

/// Total trench investment: both supply and return pipes lie in each trench.
pub fn pipe_investment(pipes: &[PipeAssignment]) -> f64 {
    pipes.iter().map(|p| p.cost_per_m * p.length_m * 2.0).sum()
}

/// Price a sized design.
///
/// `decentral_loads` holds one entry per building with demand the network
/// does not cover, priced as a decentralized unit at that building's own
/// peak plus the carrier energy it burns over the year.
pub fn price_design(
    ctx: &PricingContext<'_>,
    pipes: &[PipeAssignment],
    peak_pump_power_w: f64,
    pump_energy_kwh_yr: f64,
    peak_plant_heat_w: f64,
    plant_energy_kwh_yr: f64,
    decentral_loads: &[DecentralLoad],
) -> CostBreakdown {
    let pipe_capex = pipe_investment(pipes);
    let plant_capacity = peak_plant_heat_w * ctx.plant_sizing_margin;

    let mut opex_fixed = pipe_capex * ctx.pipe_econ.om_fraction
        + ctx.pump_curve.fixed_opex(peak_pump_power_w)
        + ctx.plant_curve.fixed_opex(plant_capacity);
    let mut capex_a_disconnected = 0.0;
    let mut decentral_energy_kwh = 0.0;
    for load in decentral_loads {
        capex_a_disconnected += ctx.disconnected_curve.annualized_capex(load.peak_w);
        opex_fixed += ctx.disconnected_curve.fixed_opex(load.peak_w);
        decentral_energy_kwh += load.energy_kwh_yr;
    }

    CostBreakdown {
        capex_a_pipes: annualized(
            pipe_capex,
            ctx.pipe_econ.interest_rate,
            ctx.pipe_econ.lifetime_yr,
        ),
        capex_a_pump: ctx.pump_curve.annualized_capex(peak_pump_power_w),
        capex_a_plant: ctx.plant_curve.annualized_capex(plant_capacity),
        capex_a_disconnected,
        opex_fixed,
        opex_electricity: pump_energy_kwh_yr * ctx.electricity_price_per_kwh,
        opex_plant_energy: plant_energy_kwh_yr / ctx.plant_efficiency
            * ctx.energy_price_per_kwh,
        opex_decentral_energy: decentral_energy_kwh / ctx.decentral_efficiency
            * ctx.energy_price_per_kwh,
    }
}
