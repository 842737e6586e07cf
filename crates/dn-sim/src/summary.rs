//! Human-readable digest of a priced design.

use dn_costs::CostBreakdown;
use dn_ga::Genotype;

use crate::evaluate::DesignEvaluation;
use crate::inputs::Model;

#[derive(Debug, Clone)]
pub struct DesignSummary {
    pub project: String,
    /// Trench length of the built network [m].
    pub total_length_m: f64,
    /// Length-weighted mean internal diameter [m].
    pub avg_diameter_m: f64,
    pub plant_buildings: Vec<String>,
    pub disconnected_buildings: Vec<String>,
    pub served_loads: Vec<String>,
    pub looped: bool,
    pub peak_plant_heat_w: f64,
    pub peak_pump_power_w: f64,
    pub breakdown: CostBreakdown,
    pub total_cost: f64,
}

/// Condense an evaluation into the fields the report writers print.
pub fn summarize(model: &Model, genotype: &Genotype, eval: &DesignEvaluation) -> DesignSummary {
    let name_of = |i: &usize| model.buildings[*i].name.clone();
    let (total_length_m, avg_diameter_m, peak_plant_heat_w, peak_pump_power_w) = eval
        .result
        .as_ref()
        .map(|r| {
            let length: f64 = r.pipes.iter().map(|p| p.length_m).sum();
            let weighted: f64 = r.pipes.iter().map(|p| p.d_int_m * p.length_m).sum();
            let avg = if length > 0.0 { weighted / length } else { 0.0 };
            (length, avg, r.peak_plant_heat_w, r.peak_pump_power_w)
        })
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    DesignSummary {
        project: model.name.clone(),
        total_length_m,
        avg_diameter_m,
        plant_buildings: genotype.plant_indices().iter().map(name_of).collect(),
        disconnected_buildings: genotype
            .disconnected_indices()
            .iter()
            .map(name_of)
            .collect(),
        served_loads: model
            .load_names
            .iter()
            .zip(&genotype.load_flags)
            .filter(|(_, served)| **served)
            .map(|(name, _)| name.clone())
            .collect(),
        looped: genotype.looped,
        peak_plant_heat_w,
        peak_pump_power_w,
        breakdown: eval.breakdown,
        total_cost: eval.breakdown.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::evaluate_design;
    use crate::testutil;

    #[test]
    fn summary_names_the_design() {
        let model = testutil::model();
        let genotype = testutil::genotype_all_connected();
        let eval = evaluate_design(&model, &genotype).unwrap();
        let summary = summarize(&model, &genotype, &eval);

        assert_eq!(summary.project, "fixture");
        assert_eq!(summary.plant_buildings, vec!["B0"]);
        assert!(summary.disconnected_buildings.is_empty());
        assert_eq!(summary.served_loads, vec!["heat"]);
        // three star edges, 180 m of trench
        assert!((summary.total_length_m - 180.0).abs() < 1e-9);
        assert!(summary.avg_diameter_m > 0.0);
        assert_eq!(summary.total_cost, eval.breakdown.total());
    }
}
