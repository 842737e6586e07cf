use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use dn_ga::{BuildingState, GaError, GaOutcome, Genotype, Optimizer};
use dn_hydro::velocity_mps;
use dn_project::{validate_project, ProjectError};
use dn_sim::{
    evaluate_design, materialize, summarize, DesignEvaluator, DesignSummary, Model, SimError,
};

#[derive(Parser)]
#[command(name = "dn-cli")]
#[command(about = "DistrictNet CLI - District energy network design tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Simulate the as-drawn design with every building connected
    Simulate {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Output CSV file for the sized edge list (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search for the cheapest design with the genetic optimizer
    Optimize {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Output CSV file for the per-generation history (optional)
        #[arg(long)]
        history: Option<PathBuf>,
        /// Output CSV file for the best design's sized edge list (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Ga(#[from] GaError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Simulate {
            project_path,
            output,
        } => cmd_simulate(&project_path, output.as_deref()),
        Commands::Optimize {
            project_path,
            history,
            output,
        } => cmd_optimize(&project_path, history.as_deref(), output.as_deref()),
    }
}

fn load_model(project_path: &Path) -> Result<Model, CliError> {
    let project = dn_project::load_yaml(project_path)?;
    validate_project(&project).map_err(ProjectError::from)?;
    Ok(Model::from_project(&project)?)
}

/// The design as drawn: plant at the peak-demand building, everything else
/// connected, every load served over a branch layout.
fn reference_genotype(model: &Model) -> Genotype {
    let buildings = (0..model.buildings.len())
        .map(|i| {
            if i == model.anchor {
                BuildingState::Plant
            } else if model.ga.static_disconnected.contains(&i) {
                BuildingState::Disconnected
            } else {
                BuildingState::Connected
            }
        })
        .collect();
    Genotype {
        load_flags: vec![true; model.ga.load_count],
        looped: false,
        buildings,
    }
}

fn cmd_validate(project_path: &Path) -> Result<(), CliError> {
    println!("Validating project: {}", project_path.display());
    let project = dn_project::load_yaml(project_path)?;
    validate_project(&project).map_err(ProjectError::from)?;
    println!("✓ Project is valid");
    println!(
        "  {} buildings, {} junctions, {} edges, {} loads",
        project.buildings.len(),
        project.junctions.len(),
        project.edges.len(),
        project.loads.len()
    );
    Ok(())
}

fn cmd_simulate(project_path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let model = load_model(project_path)?;
    let genotype = reference_genotype(&model);

    let eval = evaluate_design(&model, &genotype)?;
    let summary = summarize(&model, &genotype, &eval);
    println!("✓ Simulation completed");
    print_summary(&summary);

    if let Some(path) = output {
        export_design_csv(&model, &genotype, path)?;
        println!("✓ Exported edge list to {}", path.display());
    }
    Ok(())
}

fn cmd_optimize(
    project_path: &Path,
    history: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let model = load_model(project_path)?;
    println!(
        "Optimizing '{}': {} individuals over {} generations",
        model.name, model.ga.population_size, model.ga.generation_count
    );

    let optimizer = Optimizer::new(model.ga.clone(), Some(model.anchor))?;
    let evaluator = DesignEvaluator::new(&model);
    let outcome = optimizer.run(&evaluator);

    for record in &outcome.generations {
        println!(
            "  gen {:>3}: best = {:>14.2}, mean = {:>14.2}",
            record.index, record.best_cost, record.mean_cost
        );
    }
    println!(
        "✓ Search finished after {} distinct evaluations",
        outcome.evaluations
    );

    let eval = evaluate_design(&model, &outcome.best)?;
    let summary = summarize(&model, &outcome.best, &eval);
    print_summary(&summary);

    if let Some(path) = history {
        export_history_csv(&outcome, path)?;
        println!("✓ Exported generation history to {}", path.display());
    }
    if let Some(path) = output {
        export_design_csv(&model, &outcome.best, path)?;
        println!("✓ Exported edge list to {}", path.display());
    }
    Ok(())
}

fn print_summary(summary: &DesignSummary) {
    println!("\nDesign summary:");
    println!("  Layout: {}", if summary.looped { "looped" } else { "branch" });
    println!("  Plants: {}", summary.plant_buildings.join(", "));
    if !summary.disconnected_buildings.is_empty() {
        println!(
            "  Disconnected: {}",
            summary.disconnected_buildings.join(", ")
        );
    }
    println!("  Served loads: {}", summary.served_loads.join(", "));
    println!("  Trench length: {:.1} m", summary.total_length_m);
    println!("  Mean diameter: {:.1} mm", summary.avg_diameter_m * 1000.0);
    println!("  Peak plant heat: {:.1} kW", summary.peak_plant_heat_w / 1000.0);
    println!("  Peak pump power: {:.2} kW", summary.peak_pump_power_w / 1000.0);

    let b = &summary.breakdown;
    println!("\nAnnual costs:");
    println!("  Pipes:          {:>14.2}", b.capex_a_pipes);
    println!("  Pump:           {:>14.2}", b.capex_a_pump);
    println!("  Plant:          {:>14.2}", b.capex_a_plant);
    println!("  Decentralized:  {:>14.2}", b.capex_a_disconnected);
    println!("  Fixed O&M:      {:>14.2}", b.opex_fixed);
    println!("  Electricity:    {:>14.2}", b.opex_electricity);
    println!("  Plant energy:   {:>14.2}", b.opex_plant_energy);
    println!("  Decentral fuel: {:>14.2}", b.opex_decentral_energy);
    println!("  Total:          {:>14.2}", summary.total_cost);
}

fn export_design_csv(model: &Model, genotype: &Genotype, path: &Path) -> Result<(), CliError> {
    let candidate = materialize(model, genotype)?;
    let result = dn_sim::simulate(model, &candidate, &genotype.load_flags, None)?;

    let mut csv =
        String::from("edge,pipe,d_int_m,length_m,peak_flow_kgps,peak_velocity_mps,cost_per_m\n");
    for (edge, pipe) in candidate.network.edges().iter().zip(&result.pipes) {
        csv.push_str(&format!(
            "{},{},{},{},{},{:.3},{}\n",
            edge.name,
            pipe.label,
            pipe.d_int_m,
            pipe.length_m,
            pipe.peak_flow_kgps,
            velocity_mps(pipe.peak_flow_kgps, pipe.d_int_m),
            pipe.cost_per_m
        ));
    }
    std::fs::write(path, csv)?;
    Ok(())
}

fn export_history_csv(outcome: &GaOutcome, path: &Path) -> Result<(), CliError> {
    let mut csv = String::from("generation,best_cost,mean_cost,gene,plants,connected,looped\n");
    for record in &outcome.generations {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            record.index,
            record.best_cost,
            record.mean_cost,
            record.best,
            record.best.plant_count(),
            record.best.connected_count(),
            record.best.looped
        ));
    }
    std::fs::write(path, csv)?;
    Ok(())
}
