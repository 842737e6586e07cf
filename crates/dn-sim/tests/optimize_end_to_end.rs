//! Full pipeline: project file -> model -> genetic search -> priced design.

use dn_ga::{BuildingState, Optimizer};
use dn_project::*;
use dn_sim::{evaluate_design, DesignEvaluator, Model, PENALTY_COST};

fn financing() -> FinancingDef {
    FinancingDef {
        interest_rate: 0.05,
        lifetime_yr: 20.0,
        om_fraction: 0.02,
    }
}

fn curve(name: &str, base: f64) -> CurveDef {
    CurveDef {
        name: name.to_string(),
        brackets: vec![BracketDef {
            cap_min: 1.0,
            cap_max: 1e9,
            a: base,
            b: 0.05,
            c: 1.0,
            d: 0.0,
            e: 0.0,
        }],
        financing: financing(),
    }
}

/// Four buildings on a line, the first carrying the dominant load.
fn project() -> Project {
    let building = |name: &str, x: f64, w: f64| BuildingDef {
        name: name.to_string(),
        x_m: x,
        y_m: 0.0,
        target_supply_c: None,
        target_return_c: None,
        demands: vec![DemandSeriesDef {
            load: "heat".to_string(),
            hourly_w: vec![w; 48],
        }],
    };
    let edge = |name: &str, start: &str, end: &str, length_m: f64| EdgeDef {
        name: name.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        length_m,
    };

    Project {
        name: "line".to_string(),
        network_type: NetworkTypeDef::Heating,
        loads: vec!["heat".to_string()],
        load_coupling: None,
        buildings: vec![
            building("B0", 0.0, 80_000.0),
            building("B1", 100.0, 30_000.0),
            building("B2", 200.0, 20_000.0),
            building("B3", 300.0, 10_000.0),
        ],
        junctions: vec![],
        edges: vec![
            edge("E0", "B0", "B1", 100.0),
            edge("E1", "B1", "B2", 100.0),
            edge("E2", "B2", "B3", 100.0),
        ],
        pipes: PipesDef {
            catalog: vec![
                PipeSizeDef {
                    label: "DN50".to_string(),
                    d_int_m: 0.0545,
                    d_ext_m: 0.0603,
                    d_ins_m: 0.125,
                    cost_per_m: 120.0,
                },
                PipeSizeDef {
                    label: "DN100".to_string(),
                    d_int_m: 0.1071,
                    d_ext_m: 0.1143,
                    d_ins_m: 0.20,
                    cost_per_m: 220.0,
                },
            ],
            roughness_m: 2e-5,
            design_velocity_mps: 2.0,
            peak_load_factor: 1.4,
            economics: financing(),
        },
        thermal: ThermalDef {
            supply_temp_c: 70.0,
            ground_temp_c: 10.0,
            delta_t_k: 25.0,
        },
        pumping: PumpingDef {
            efficiency: 0.8,
            substation_dp_pa: 30_000.0,
        },
        costs: CostsDef {
            pump: curve("PU1", 2_000.0),
            plant: curve("BO1", 20_000.0),
            decentral: curve("DEC", 50_000.0),
            electricity_price_per_kwh: 0.2,
            energy_price_per_kwh: 0.08,
            plant_efficiency: 0.9,
            decentral_efficiency: 0.85,
            plant_sizing_margin: 1.2,
        },
        optimizer: OptimizerDef {
            population_size: 8,
            generation_count: 5,
            lucky_few: 2,
            mutation_prob: 0.3,
            min_plants: 1,
            max_plants: 1,
            optimize_loop_branch: false,
            optimize_network_loads: false,
            optimize_building_connections: true,
            use_rule_based_anchor: true,
            admissible_sites: vec![],
            static_disconnected: vec![],
            allow_fully_disconnected: false,
            seed: 11,
            sampling: SamplingDef::FullYear,
            eval_timeout_s: None,
        },
    }
}

#[test]
fn search_finds_a_priceable_design() {
    let project = project();
    validate_project(&project).unwrap();
    let model = Model::from_project(&project).unwrap();
    assert_eq!(model.anchor, 0);

    let optimizer = Optimizer::new(model.ga.clone(), Some(model.anchor)).unwrap();
    let outcome = optimizer.run(&DesignEvaluator::new(&model));

    assert!(outcome.best_cost < PENALTY_COST);
    assert!(outcome.best_cost > 0.0);
    assert_eq!(outcome.generations.len(), 5);
    // anchor heuristic pins the plant at the dominant building
    assert_eq!(outcome.best.buildings[0], BuildingState::Plant);
    assert_eq!(outcome.best.plant_count(), 1);

    // the winner re-prices to the same figure
    let eval = evaluate_design(&model, &outcome.best).unwrap();
    assert_eq!(eval.breakdown.total().to_bits(), outcome.best_cost.to_bits());
}

#[test]
fn expensive_decentral_units_favor_full_connection() {
    let project = project();
    validate_project(&project).unwrap();
    let model = Model::from_project(&project).unwrap();

    let connected = dn_ga::Genotype {
        load_flags: vec![true],
        looped: false,
        buildings: vec![
            BuildingState::Plant,
            BuildingState::Connected,
            BuildingState::Connected,
            BuildingState::Connected,
        ],
    };
    let mut partial = connected.clone();
    partial.buildings[3] = BuildingState::Disconnected;

    // with decentral units priced far above a 100 m trench, serving the
    // tail building over the network is the cheaper design
    let full = evaluate_design(&model, &connected).unwrap();
    let cut = evaluate_design(&model, &partial).unwrap();
    assert!(full.total_cost() < cut.total_cost());
    assert!(cut.breakdown.capex_a_disconnected > 0.0);
}
