use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use hoc_core::{
    Battlefield, ChaChaSource, Cell, PathHelper, Scenario, Unit, decide, snapshot_hash,
};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Inspect battle scenarios from the command line", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the cells a unit can reach this turn
    Reach {
        #[command(flatten)]
        target: UnitArgs,
        /// Override the unit's step budget
        #[arg(long)]
        steps: Option<f64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Ask the AI what a unit would do
    Decide {
        #[command(flatten)]
        target: UnitArgs,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print stable hashes of a unit's reach and AI decision
    Hash {
        #[command(flatten)]
        target: UnitArgs,
    },
}

#[derive(clap::Args)]
struct UnitArgs {
    /// Scenario file (.json or .toml)
    #[arg(short, long)]
    scenario: PathBuf,
    /// Name of the unit to inspect
    #[arg(short, long)]
    unit: String,
    /// Seed for tie-breaking between equally good routes
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Serialize)]
struct ReachEntry {
    cell: Cell,
    weight: f64,
    distance: f64,
    ties: usize,
}

struct Loaded {
    scenario: Scenario,
    field: Battlefield,
    unit: Unit,
}

fn load(target: &UnitArgs) -> Result<Loaded> {
    let scenario = Scenario::load(&target.scenario)
        .with_context(|| format!("Failed to load scenario: {}", target.scenario.display()))?;
    let field = scenario.battlefield().context("Failed to build the battlefield")?;
    let unit = field
        .find_by_name(&target.unit)
        .and_then(|id| field.unit(id))
        .cloned()
        .ok_or_else(|| anyhow!("No unit named {:?} in the scenario", target.unit))?;
    Ok(Loaded { scenario, field, unit })
}

fn reach(target: &UnitArgs, steps: Option<f64>, json: bool) -> Result<()> {
    let Loaded { field, unit, .. } = load(target)?;
    let helper = PathHelper::new(*field.settings());
    let query = unit.move_query(steps.unwrap_or(unit.steps));
    let mut rng = ChaChaSource::seeded(target.seed);
    let path = helper.get_move_path(&query, field.board(), None, &mut rng);
    let entries: Vec<ReachEntry> = path
        .known_paths
        .iter()
        .filter_map(|(cell, routes)| {
            let best = routes.first()?;
            Some(ReachEntry {
                cell: *cell,
                weight: best.weight,
                distance: best.distance,
                ties: routes.len(),
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    println!(
        "{} can reach {} destinations ({} cells).",
        unit.name,
        entries.len(),
        path.cells.len()
    );
    for entry in &entries {
        println!(
            "  {:<10} weight {:>7.3}  distance {:>7.3}  ties {}",
            entry.cell.to_string(),
            entry.weight,
            entry.distance,
            entry.ties
        );
    }
    Ok(())
}

fn decide_for(target: &UnitArgs, json: bool) -> Result<()> {
    let Loaded { scenario, field, unit } = load(target)?;
    let helper = PathHelper::new(*field.settings());
    let action = decide(
        &unit,
        &field.matrix(),
        &field.unit_list(),
        &helper,
        &scenario.config.ai,
        &mut ChaChaSource::seeded(target.seed),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&action)?);
        return Ok(());
    }
    let show = |cell: Option<Cell>| cell.map_or_else(|| "-".to_owned(), |cell| cell.to_string());
    println!("Unit: {}", unit.name);
    println!("Action: {:?}", action.action_type);
    println!("Move to: {}", show(action.cell_to_move));
    println!("Attack: {}", show(action.cell_to_attack));
    if let Some(route) = action.route() {
        let cells: Vec<String> = route.route.iter().map(ToString::to_string).collect();
        println!("Route: {}", cells.join(" -> "));
    }
    Ok(())
}

fn hash(target: &UnitArgs) -> Result<()> {
    let Loaded { scenario, field, unit } = load(target)?;
    let helper = PathHelper::new(*field.settings());
    let path = helper.get_move_path(
        &unit.move_query(unit.steps),
        field.board(),
        None,
        &mut ChaChaSource::seeded(target.seed),
    );
    let action = decide(
        &unit,
        &field.matrix(),
        &field.unit_list(),
        &helper,
        &scenario.config.ai,
        &mut ChaChaSource::seeded(target.seed),
    );
    println!("Reach Hash: {}", snapshot_hash(&path));
    println!("Decision Hash: {}", action.snapshot_hash());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match &args.command {
        Command::Reach { target, steps, json } => reach(target, *steps, *json),
        Command::Decide { target, json } => decide_for(target, *json),
        Command::Hash { target } => hash(target),
    }
}
