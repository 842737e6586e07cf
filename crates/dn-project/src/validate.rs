//! Project validation logic.
//!
//! Everything here is fatal before any simulation or search runs; per-design
//! failures (unreachable subgraphs and the like) are handled downstream.

use std::collections::HashSet;

use crate::schema::{CurveDef, NetworkTypeDef, Project};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Demand series for building {building} load {load} has {got} hours, expected {expected}")]
    SeriesLength {
        building: String,
        load: String,
        expected: usize,
        got: usize,
    },

    #[error("Supply temperature {supply_c} C is infeasible for a {kind} network with ground at {ground_c} C")]
    InfeasibleSupplyTemp {
        kind: String,
        supply_c: f64,
        ground_c: f64,
    },

    #[error("Supply setpoint {supply_c} C cannot serve building {building} targeting {target_c} C")]
    UnreachableTarget {
        building: String,
        target_c: f64,
        supply_c: f64,
    },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    validate_loads(project)?;
    let node_names = validate_nodes(project)?;
    validate_edges(project, &node_names)?;
    validate_pipes(project)?;
    validate_thermal(project)?;
    validate_costs(project)?;
    validate_optimizer(project)?;
    Ok(())
}

fn validate_loads(project: &Project) -> Result<(), ValidationError> {
    if project.loads.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "loads".into(),
            value: "[]".into(),
            reason: "at least one served load is required".into(),
        });
    }
    let mut seen = HashSet::new();
    for load in &project.loads {
        if !seen.insert(load) {
            return Err(ValidationError::DuplicateName {
                name: load.clone(),
                context: "loads".into(),
            });
        }
    }
    if let Some(coupling) = &project.load_coupling {
        for name in [&coupling.when_served, &coupling.also_serve] {
            if !project.loads.contains(name) {
                return Err(ValidationError::MissingReference {
                    name: name.clone(),
                    context: "load_coupling".into(),
                });
            }
        }
        if coupling.when_served == coupling.also_serve {
            return Err(ValidationError::InvalidValue {
                field: "load_coupling".into(),
                value: coupling.when_served.clone(),
                reason: "a load cannot couple to itself".into(),
            });
        }
    }
    Ok(())
}

fn validate_nodes(project: &Project) -> Result<HashSet<String>, ValidationError> {
    if project.buildings.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "buildings".into(),
            value: "[]".into(),
            reason: "at least one building is required".into(),
        });
    }

    let mut names = HashSet::new();
    let expected_hours = project
        .buildings
        .first()
        .and_then(|b| b.demands.first())
        .map(|d| d.hourly_w.len());

    for building in &project.buildings {
        if !names.insert(building.name.clone()) {
            return Err(ValidationError::DuplicateName {
                name: building.name.clone(),
                context: "buildings".into(),
            });
        }
        for series in &building.demands {
            if !project.loads.contains(&series.load) {
                return Err(ValidationError::MissingReference {
                    name: series.load.clone(),
                    context: format!("demands of building {}", building.name),
                });
            }
            let expected = expected_hours.unwrap_or(series.hourly_w.len());
            if series.hourly_w.is_empty() || series.hourly_w.len() != expected {
                return Err(ValidationError::SeriesLength {
                    building: building.name.clone(),
                    load: series.load.clone(),
                    expected,
                    got: series.hourly_w.len(),
                });
            }
        }
    }

    for junction in &project.junctions {
        if !names.insert(junction.name.clone()) {
            return Err(ValidationError::DuplicateName {
                name: junction.name.clone(),
                context: "junctions".into(),
            });
        }
    }
    Ok(names)
}

fn validate_edges(project: &Project, node_names: &HashSet<String>) -> Result<(), ValidationError> {
    if project.edges.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "edges".into(),
            value: "[]".into(),
            reason: "at least one edge is required".into(),
        });
    }
    let mut seen = HashSet::new();
    for edge in &project.edges {
        if !seen.insert(&edge.name) {
            return Err(ValidationError::DuplicateName {
                name: edge.name.clone(),
                context: "edges".into(),
            });
        }
        for endpoint in [&edge.start, &edge.end] {
            if !node_names.contains(endpoint) {
                return Err(ValidationError::MissingReference {
                    name: endpoint.clone(),
                    context: format!("edge {}", edge.name),
                });
            }
        }
        if edge.start == edge.end {
            return Err(ValidationError::InvalidValue {
                field: format!("edge {}", edge.name),
                value: edge.start.clone(),
                reason: "edge connects a node to itself".into(),
            });
        }
        if !(edge.length_m > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("edge {}", edge.name),
                value: edge.length_m.to_string(),
                reason: "length must be positive".into(),
            });
        }
    }
    Ok(())
}

fn validate_pipes(project: &Project) -> Result<(), ValidationError> {
    let pipes = &project.pipes;
    if pipes.catalog.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pipes.catalog".into(),
            value: "[]".into(),
            reason: "at least one pipe size is required".into(),
        });
    }
    for row in &pipes.catalog {
        if !(row.d_int_m > 0.0) || row.d_ext_m < row.d_int_m || row.d_ins_m < row.d_ext_m {
            return Err(ValidationError::InvalidValue {
                field: format!("pipes.catalog {}", row.label),
                value: format!("{}/{}/{}", row.d_int_m, row.d_ext_m, row.d_ins_m),
                reason: "diameters must satisfy 0 < d_int <= d_ext <= d_ins".into(),
            });
        }
    }
    for (field, value) in [
        ("pipes.design_velocity_mps", pipes.design_velocity_mps),
        ("pipes.peak_load_factor", pipes.peak_load_factor),
        ("pipes.roughness_m", pipes.roughness_m),
    ] {
        if !(value > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: field.into(),
                value: value.to_string(),
                reason: "must be positive".into(),
            });
        }
    }
    Ok(())
}

fn validate_thermal(project: &Project) -> Result<(), ValidationError> {
    let t = &project.thermal;
    if !(t.delta_t_k > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "thermal.delta_t_k".into(),
            value: t.delta_t_k.to_string(),
            reason: "must be positive".into(),
        });
    }
    let feasible = match project.network_type {
        NetworkTypeDef::Heating => t.supply_temp_c > t.ground_temp_c,
        NetworkTypeDef::Cooling => t.supply_temp_c < t.ground_temp_c,
    };
    if !feasible {
        let kind = match project.network_type {
            NetworkTypeDef::Heating => "heating",
            NetworkTypeDef::Cooling => "cooling",
        };
        return Err(ValidationError::InfeasibleSupplyTemp {
            kind: kind.into(),
            supply_c: t.supply_temp_c,
            ground_c: t.ground_temp_c,
        });
    }
    // the setpoint has to dominate every substation target
    for building in &project.buildings {
        if let Some(target_c) = building.target_supply_c {
            let reachable = match project.network_type {
                NetworkTypeDef::Heating => t.supply_temp_c >= target_c,
                NetworkTypeDef::Cooling => t.supply_temp_c <= target_c,
            };
            if !reachable {
                return Err(ValidationError::UnreachableTarget {
                    building: building.name.clone(),
                    target_c,
                    supply_c: t.supply_temp_c,
                });
            }
        }
        if let (Some(sup_c), Some(ret_c)) = (building.target_supply_c, building.target_return_c) {
            let consistent = match project.network_type {
                NetworkTypeDef::Heating => ret_c < sup_c,
                NetworkTypeDef::Cooling => ret_c > sup_c,
            };
            if !consistent {
                return Err(ValidationError::InvalidValue {
                    field: format!("building {} target temperatures", building.name),
                    value: format!("{sup_c}/{ret_c}"),
                    reason: "return target must lie on the load side of the supply target".into(),
                });
            }
        }
    }
    if !(project.pumping.efficiency > 0.0 && project.pumping.efficiency <= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "pumping.efficiency".into(),
            value: project.pumping.efficiency.to_string(),
            reason: "must lie in (0, 1]".into(),
        });
    }
    Ok(())
}

fn validate_costs(project: &Project) -> Result<(), ValidationError> {
    for curve in [
        &project.costs.pump,
        &project.costs.plant,
        &project.costs.decentral,
    ] {
        validate_curve(curve)?;
    }
    for (field, value) in [
        ("costs.plant_efficiency", project.costs.plant_efficiency),
        ("costs.decentral_efficiency", project.costs.decentral_efficiency),
    ] {
        if !(value > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: field.into(),
                value: value.to_string(),
                reason: "must be positive".into(),
            });
        }
    }
    if project.costs.energy_price_per_kwh < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "costs.energy_price_per_kwh".into(),
            value: project.costs.energy_price_per_kwh.to_string(),
            reason: "must not be negative".into(),
        });
    }
    if !(project.costs.plant_sizing_margin >= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "costs.plant_sizing_margin".into(),
            value: project.costs.plant_sizing_margin.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}

fn validate_curve(curve: &CurveDef) -> Result<(), ValidationError> {
    if curve.brackets.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("cost curve {}", curve.name),
            value: "[]".into(),
            reason: "at least one capacity bracket is required".into(),
        });
    }
    for b in &curve.brackets {
        if !(b.cap_min < b.cap_max) {
            return Err(ValidationError::InvalidValue {
                field: format!("cost curve {}", curve.name),
                value: format!("{}..{}", b.cap_min, b.cap_max),
                reason: "cap_min must be below cap_max".into(),
            });
        }
    }
    if !(curve.financing.lifetime_yr > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("cost curve {}", curve.name),
            value: curve.financing.lifetime_yr.to_string(),
            reason: "lifetime must be positive".into(),
        });
    }
    Ok(())
}

fn validate_optimizer(project: &Project) -> Result<(), ValidationError> {
    let building_names: HashSet<&String> = project.buildings.iter().map(|b| &b.name).collect();
    for (list, context) in [
        (&project.optimizer.admissible_sites, "admissible_sites"),
        (&project.optimizer.static_disconnected, "static_disconnected"),
    ] {
        let mut seen = HashSet::new();
        for name in list {
            if !building_names.contains(name) {
                return Err(ValidationError::MissingReference {
                    name: name.clone(),
                    context: context.into(),
                });
            }
            if !seen.insert(name) {
                return Err(ValidationError::DuplicateName {
                    name: name.clone(),
                    context: context.into(),
                });
            }
        }
    }
    if let Some(timeout) = project.optimizer.eval_timeout_s {
        if !(timeout > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "optimizer.eval_timeout_s".into(),
                value: timeout.to_string(),
                reason: "must be positive".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn financing() -> FinancingDef {
        FinancingDef {
            interest_rate: 0.05,
            lifetime_yr: 20.0,
            om_fraction: 0.02,
        }
    }

    fn curve(name: &str) -> CurveDef {
        CurveDef {
            name: name.into(),
            brackets: vec![BracketDef {
                cap_min: 1.0,
                cap_max: 1e9,
                a: 1000.0,
                b: 0.05,
                c: 1.0,
                d: 0.0,
                e: 0.0,
            }],
            financing: financing(),
        }
    }

    fn building(name: &str, x: f64, peak_w: f64) -> BuildingDef {
        BuildingDef {
            name: name.into(),
            x_m: x,
            y_m: 0.0,
            target_supply_c: None,
            target_return_c: None,
            demands: vec![DemandSeriesDef {
                load: "space_heating".into(),
                hourly_w: vec![peak_w; 24],
            }],
        }
    }

    fn sample() -> Project {
        Project {
            name: "demo".into(),
            network_type: NetworkTypeDef::Heating,
            loads: vec!["space_heating".into(), "hot_water".into()],
            load_coupling: Some(LoadCouplingDef {
                when_served: "hot_water".into(),
                also_serve: "space_heating".into(),
            }),
            buildings: vec![
                building("B0", 0.0, 50_000.0),
                building("B1", 100.0, 30_000.0),
            ],
            junctions: vec![],
            edges: vec![EdgeDef {
                name: "E0".into(),
                start: "B0".into(),
                end: "B1".into(),
                length_m: 100.0,
            }],
            pipes: PipesDef {
                catalog: vec![PipeSizeDef {
                    label: "DN100".into(),
                    d_int_m: 0.1071,
                    d_ext_m: 0.1143,
                    d_ins_m: 0.20,
                    cost_per_m: 220.0,
                }],
                roughness_m: 2e-5,
                design_velocity_mps: 2.0,
                peak_load_factor: 1.4,
                economics: financing(),
            },
            thermal: ThermalDef {
                supply_temp_c: 60.0,
                ground_temp_c: 10.0,
                delta_t_k: 20.0,
            },
            pumping: PumpingDef {
                efficiency: 0.8,
                substation_dp_pa: 30_000.0,
            },
            costs: CostsDef {
                pump: curve("PU1"),
                plant: curve("BO1"),
                decentral: curve("DEC"),
                electricity_price_per_kwh: 0.2,
                energy_price_per_kwh: 0.08,
                plant_efficiency: 0.9,
                decentral_efficiency: 0.85,
                plant_sizing_margin: 1.2,
            },
            optimizer: OptimizerDef {
                population_size: 8,
                generation_count: 4,
                lucky_few: 2,
                mutation_prob: 0.2,
                min_plants: 1,
                max_plants: 1,
                optimize_loop_branch: true,
                optimize_network_loads: true,
                optimize_building_connections: true,
                use_rule_based_anchor: false,
                admissible_sites: vec!["B0".into()],
                static_disconnected: vec![],
                allow_fully_disconnected: false,
                seed: 42,
                sampling: SamplingDef::FullYear,
                eval_timeout_s: None,
            },
        }
    }

    #[test]
    fn sample_project_validates() {
        assert!(validate_project(&sample()).is_ok());
    }

    #[test]
    fn duplicate_building_name_is_rejected() {
        let mut p = sample();
        p.buildings.push(building("B0", 50.0, 1000.0));
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::DuplicateName { .. })
        ));
    }

    #[test]
    fn edge_with_unknown_endpoint_is_rejected() {
        let mut p = sample();
        p.edges[0].end = "B9".into();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn ragged_demand_series_is_rejected() {
        let mut p = sample();
        p.buildings[1].demands[0].hourly_w.truncate(12);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::SeriesLength { .. })
        ));
    }

    #[test]
    fn heating_supply_below_ground_is_rejected() {
        let mut p = sample();
        p.thermal.supply_temp_c = 5.0;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InfeasibleSupplyTemp { .. })
        ));
    }

    #[test]
    fn cooling_inverts_the_feasibility_rule() {
        let mut p = sample();
        p.network_type = NetworkTypeDef::Cooling;
        p.thermal.supply_temp_c = 6.0;
        assert!(validate_project(&p).is_ok());
        p.thermal.supply_temp_c = 15.0;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InfeasibleSupplyTemp { .. })
        ));
    }

    #[test]
    fn setpoint_must_dominate_building_targets() {
        let mut p = sample();
        p.buildings[0].target_supply_c = Some(55.0);
        p.buildings[0].target_return_c = Some(35.0);
        assert!(validate_project(&p).is_ok());

        p.buildings[0].target_supply_c = Some(65.0);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnreachableTarget { .. })
        ));
    }

    #[test]
    fn cooling_building_targets_invert() {
        let mut p = sample();
        p.network_type = NetworkTypeDef::Cooling;
        p.thermal.supply_temp_c = 6.0;
        p.buildings[1].target_supply_c = Some(8.0);
        p.buildings[1].target_return_c = Some(14.0);
        assert!(validate_project(&p).is_ok());

        // a building asking for colder water than the loop carries
        p.buildings[1].target_supply_c = Some(4.0);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnreachableTarget { .. })
        ));
    }

    #[test]
    fn inverted_target_spread_is_rejected() {
        let mut p = sample();
        p.buildings[0].target_supply_c = Some(45.0);
        p.buildings[0].target_return_c = Some(50.0);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_positive_efficiency_is_rejected() {
        let mut p = sample();
        p.costs.plant_efficiency = 0.0;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_admissible_site_is_rejected() {
        let mut p = sample();
        p.optimizer.admissible_sites = vec!["B7".into()];
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let p = sample();
        let text = serde_yaml::to_string(&p).unwrap();
        let back: Project = serde_yaml::from_str(&text).unwrap();
        assert_eq!(p, back);
    }
}
