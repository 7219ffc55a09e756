//! `hilltop` command line: route from a point to the nearest high ground.

use clap::Parser;
use hilltop_runner::{path_to_geojson, PlanError, Planner, RouteOutcome, RunnerConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Find the highest point near a location and the quickest walk to it.
#[derive(Parser, Debug)]
#[command(name = "hilltop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "High-ground walking route planner", long_about = None)]
struct Args {
    /// Runner configuration (YAML).
    #[arg(short, long)]
    config: PathBuf,

    /// Easting of the start point, in the grid's CRS.
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    x: f64,

    /// Northing of the start point, in the grid's CRS.
    #[arg(short = 'y', long, allow_negative_numbers = true)]
    y: f64,

    /// Search radius in meters (overrides the config file).
    #[arg(short, long)]
    radius: Option<f64>,

    /// Write the plan as JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the route as a GeoJSON FeatureCollection.
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), PlanError> {
    let mut config = RunnerConfig::from_file(&args.config)?;
    if let Some(radius) = args.radius {
        config.search_radius_m = radius;
        config.validate()?;
    }

    let planner = Planner::load(&config)?;
    let plan = planner.plan(args.x, args.y)?;

    let json = serde_json::to_string_pretty(&plan)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("wrote plan to {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some(path) = &args.geojson {
        match plan.path() {
            Some(route) => {
                std::fs::write(path, serde_json::to_string_pretty(&path_to_geojson(route))?)?;
                tracing::info!("wrote route geometry to {}", path.display());
            }
            None => tracing::warn!("no route to export; {} not written", path.display()),
        }
    }

    match &plan.outcome {
        RouteOutcome::Routed { path, end, .. } => {
            tracing::info!(
                "walk to {} takes {:.1} minutes over {} links",
                end.id,
                path.total_cost,
                path.steps.len()
            );
        }
        RouteOutcome::NoHighGround { reason } => tracing::warn!("no high ground: {}", reason),
        RouteOutcome::Unreachable { end, .. } => {
            tracing::warn!("high ground near {} is not reachable by road", end.id)
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    hilltop_metrics::describe_metrics();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
