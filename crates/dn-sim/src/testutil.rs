//! Shared fixtures for the crate's tests.

use dn_ga::{BuildingState, Genotype};
use dn_project::*;

use crate::inputs::Model;

fn financing() -> FinancingDef {
    FinancingDef {
        interest_rate: 0.05,
        lifetime_yr: 20.0,
        om_fraction: 0.02,
    }
}

fn curve(name: &str, base: f64) -> CurveDef {
    CurveDef {
        name: name.into(),
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

/// Three buildings on a star around one junction, 24 demand hours.
/// B0 carries the dominant load, B2 has no demand at all.
pub(crate) fn project() -> Project {
    let building = |name: &str, x: f64, demand_w: Option<f64>| BuildingDef {
        name: name.into(),
        x_m: x,
        y_m: 0.0,
        target_supply_c: None,
        target_return_c: None,
        demands: demand_w
            .map(|w| {
                vec![DemandSeriesDef {
                    load: "heat".into(),
                    hourly_w: vec![w; 24],
                }]
            })
            .unwrap_or_default(),
    };

    Project {
        name: "fixture".into(),
        network_type: NetworkTypeDef::Heating,
        loads: vec!["heat".into()],
        load_coupling: None,
        buildings: vec![
            building("B0", 0.0, Some(50_000.0)),
            building("B1", 100.0, Some(30_000.0)),
            building("B2", 200.0, None),
        ],
        junctions: vec![JunctionDef {
            name: "J".into(),
            x_m: 50.0,
            y_m: 50.0,
        }],
        edges: vec![
            EdgeDef {
                name: "E0".into(),
                start: "B0".into(),
                end: "J".into(),
                length_m: 50.0,
            },
            EdgeDef {
                name: "E1".into(),
                start: "J".into(),
                end: "B1".into(),
                length_m: 60.0,
            },
            EdgeDef {
                name: "E2".into(),
                start: "J".into(),
                end: "B2".into(),
                length_m: 70.0,
            },
        ],
        pipes: PipesDef {
            catalog: vec![
                PipeSizeDef {
                    label: "DN50".into(),
                    d_int_m: 0.0545,
                    d_ext_m: 0.0603,
                    d_ins_m: 0.125,
                    cost_per_m: 120.0,
                },
                PipeSizeDef {
                    label: "DN100".into(),
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
            supply_temp_c: 60.0,
            ground_temp_c: 10.0,
            delta_t_k: 20.0,
        },
        pumping: PumpingDef {
            efficiency: 0.8,
            substation_dp_pa: 30_000.0,
        },
        costs: CostsDef {
            pump: curve("PU1", 2_000.0),
            plant: curve("BO1", 20_000.0),
            decentral: curve("DEC", 8_000.0),
            electricity_price_per_kwh: 0.2,
            energy_price_per_kwh: 0.08,
            plant_efficiency: 0.9,
            decentral_efficiency: 0.85,
            plant_sizing_margin: 1.2,
        },
        optimizer: OptimizerDef {
            population_size: 6,
            generation_count: 3,
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
            seed: 7,
            sampling: SamplingDef::FullYear,
            eval_timeout_s: None,
        },
    }
}

pub(crate) fn model() -> Model {
    let p = project();
    validate_project(&p).expect("fixture validates");
    Model::from_project(&p).expect("fixture converts")
}

/// Same geometry run cold: 6 C supply under 12 C ground, 6 K spread.
pub(crate) fn cooling_model() -> Model {
    let mut p = project();
    p.network_type = NetworkTypeDef::Cooling;
    p.thermal = ThermalDef {
        supply_temp_c: 6.0,
        ground_temp_c: 12.0,
        delta_t_k: 6.0,
    };
    validate_project(&p).expect("cooling fixture validates");
    Model::from_project(&p).expect("cooling fixture converts")
}

/// Plant at B0, everything else connected, the single load served.
pub(crate) fn genotype_all_connected() -> Genotype {
    Genotype {
        load_flags: vec![true],
        looped: false,
        buildings: vec![
            BuildingState::Plant,
            BuildingState::Connected,
            BuildingState::Connected,
        ],
    }
}
