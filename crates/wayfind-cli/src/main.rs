//! wayfind - building navigation solver.
//!
//! Single binary that provides:
//! - `wayfind stats` - grid and cache summary
//! - `wayfind solve` - solve every destination, optionally dumping one value field
//! - `wayfind path` - walk from a point to a destination
//! - `wayfind route` - stitch a multi-floor route through destination nodes
//! - `wayfind check` - navigability of a single point
//! - `wayfind init` - write sample space and solver files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use wayfind_core::{GraphRoute, SolverConfig, SpaceConfig, Vec2, Wayfinder};

#[derive(Parser)]
#[command(name = "wayfind")]
#[command(about = "Value-iteration wayfinding over building floor plans", version)]
struct Cli {
    /// Space description (YAML or JSON)
    #[arg(short, long, global = true, default_value = "space.yaml")]
    space: PathBuf,

    /// Solver configuration (YAML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show grid statistics
    Stats,

    /// Solve value fields for every destination
    Solve {
        /// Print the value field of this destination as rows
        #[arg(long)]
        dump: Option<String>,
    },

    /// Find a path from a point to a destination
    Path {
        /// Start position as `x,y`
        #[arg(long, value_parser = parse_point)]
        from: Vec2,

        /// Destination id
        #[arg(long)]
        to: String,

        /// Floor the start lies on; must match the destination's floor
        #[arg(long, allow_negative_numbers = true)]
        floor: Option<i32>,
    },

    /// Follow an ordered list of destination nodes across floors
    Route {
        /// Start position as `x,y`
        #[arg(long, value_parser = parse_point)]
        from: Vec2,

        /// Floor of the start position
        #[arg(long, allow_negative_numbers = true)]
        floor: i32,

        /// Destination ids in travel order
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,

        /// Edge weights between consecutive nodes
        #[arg(long, value_delimiter = ',')]
        weights: Vec<f32>,
    },

    /// Check whether a point is navigable
    Check {
        /// Position as `x,y`
        #[arg(value_parser = parse_point)]
        at: Vec2,

        /// Restrict the check to one floor
        #[arg(long, allow_negative_numbers = true)]
        floor: Option<i32>,
    },

    /// Write a sample space and solver config
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let load = || load_wayfinder(&cli.space, cli.config.as_deref());

    match cli.command {
        Commands::Init { dir } => init_files(&dir),
        Commands::Stats => print_json(&load()?.stats()?),
        Commands::Solve { dump } => solve_all(&load()?, dump.as_deref()),
        Commands::Path { from, to, floor } => find_path(&load()?, from, &to, floor),
        Commands::Route {
            from,
            floor,
            nodes,
            weights,
        } => {
            let route = GraphRoute { nodes, weights };
            print_json(&load()?.stitch_route(from, floor, &route)?)
        }
        Commands::Check { at, floor } => check_point(&load()?, at, floor),
    }
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn load_wayfinder(space_path: &Path, config_path: Option<&Path>) -> Result<Wayfinder> {
    let config = match config_path {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    let space = SpaceConfig::load(space_path)?;
    tracing::info!(
        space = %space_path.display(),
        corridors = space.corridors.len(),
        destinations = space.destinations.len(),
        "Loading space"
    );

    let mut wayfinder = Wayfinder::new(config)?;
    wayfinder.set_environment(space)?;
    Ok(wayfinder)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn solve_all(wayfinder: &Wayfinder, dump: Option<&str>) -> Result<()> {
    let summary = wayfinder.solve_all_with_progress(|fraction| {
        tracing::debug!(progress = format!("{:.0}%", fraction * 100.0), "Solving");
    })?;

    match dump {
        Some(id) => {
            let field = wayfinder
                .value_field(id)
                .with_context(|| format!("No solved value field for destination '{id}'"))?;
            print_json(&field.to_rows())
        }
        None => print_json(&summary),
    }
}

fn find_path(wayfinder: &Wayfinder, from: Vec2, to: &str, floor: Option<i32>) -> Result<()> {
    let destination = wayfinder.destination(to)?.position();
    let result = wayfinder.find_path(from, destination, to, floor)?;
    if !result.success {
        tracing::warn!(outcome = ?result.outcome, steps = result.steps, "No complete path");
    }
    print_json(&result)
}

#[derive(Serialize)]
struct PointReport {
    x: f32,
    y: f32,
    floor: Option<i32>,
    navigable: bool,
    nearest: Option<Vec2>,
}

fn check_point(wayfinder: &Wayfinder, at: Vec2, floor: Option<i32>) -> Result<()> {
    let navigable = wayfinder.is_navigable(at, floor)?;
    let nearest = if navigable {
        Some(at)
    } else {
        wayfinder.nearest_navigable(at, floor)?
    };
    print_json(&PointReport {
        x: at.x,
        y: at.y,
        floor,
        navigable,
        nearest,
    })
}

const SAMPLE_SPACE: &str = r#"# Floor plan in image coordinates (y grows downward)
image_width: 400.0
image_height: 200.0

corridors:
  - id: west-wing
    floor: 0
    polygon:
      - { x: 0.0, y: 0.0 }
      - { x: 80.0, y: 0.0 }
      - { x: 80.0, y: 200.0 }
      - { x: 0.0, y: 200.0 }
  - id: main-hall
    floor: 0
    kind: hall
    polygon:
      - { x: 40.0, y: 80.0 }
      - { x: 360.0, y: 80.0 }
      - { x: 360.0, y: 120.0 }
      - { x: 40.0, y: 120.0 }
  - id: east-wing
    floor: 0
    polygon:
      - { x: 320.0, y: 0.0 }
      - { x: 400.0, y: 0.0 }
      - { x: 400.0, y: 200.0 }
      - { x: 320.0, y: 200.0 }

destinations:
  - id: reception
    name: Reception
    floor: 0
    x: 40.0
    y: 20.0
  - id: lab
    name: Research lab
    floor: 0
    x: 360.0
    y: 180.0
"#;

const SAMPLE_SOLVER: &str = r#"# Solver configuration; omitted keys use defaults
resolution: 10.0
discount: 0.99
step_cost: 1.0
epsilon: 0.001
max_iterations: 2000
safe_distance: 3.0
penalty_factor: 0.5
snap_radius: 20
max_path_steps: 10000
"#;

fn init_files(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut created = Vec::new();
    for (name, contents) in [("space.yaml", SAMPLE_SPACE), ("solver.yaml", SAMPLE_SOLVER)] {
        let path = dir.join(name);
        if path.exists() {
            tracing::info!(path = %path.display(), "Keeping existing file");
            continue;
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        created.push(name);
    }

    println!("Initialized wayfind files in {}", dir.display());
    for name in &created {
        println!("  created {name}");
    }
    println!();
    println!("Next steps:");
    println!("  wayfind --space space.yaml --config solver.yaml stats");
    println!("  wayfind path --from 40,180 --to lab");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("12.5, 40").unwrap(), Vec2::new(12.5, 40.0));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn sample_files_load_and_solve() {
        let dir = tempfile::tempdir().unwrap();
        init_files(dir.path()).unwrap();

        let wf = load_wayfinder(
            &dir.path().join("space.yaml"),
            Some(&dir.path().join("solver.yaml")),
        )
        .unwrap();
        let summary = wf.solve_all().unwrap();
        assert_eq!(summary.solved, vec!["lab".to_string(), "reception".to_string()]);

        let result = wf.find_path_to(Vec2::new(40.0, 180.0), "lab").unwrap();
        assert!(result.success);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
