//! Path Probe
//!
//! Builds a seeded random map, drops one unit on it and reports its movement
//! range and the shortest path to a goal as JSON.

use clap::Parser;
use grid_tactics::core::error::{Result, TacticsError};
use grid_tactics::core::types::{GridPos, UnitId};
use grid_tactics::tactics::{
    path_steps, reachable_set, shortest_path, Grid, TerrainKind, TraversalPolicy, Unit,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Path Probe - movement range and shortest path on a random map
#[derive(Parser, Debug)]
#[command(name = "path_probe")]
#[command(about = "Report reachable cells and a shortest path for one unit")]
struct Args {
    /// Map width in cells
    #[arg(long, default_value_t = 20)]
    width: u32,

    /// Map height in cells
    #[arg(long, default_value_t = 20)]
    height: u32,

    /// Share of cells that are not open ground (0.0 - 1.0)
    #[arg(long, default_value_t = 0.25)]
    density: f64,

    /// Unit class: ground, stealth or flying
    #[arg(long, default_value = "ground")]
    class: TraversalPolicy,

    /// Move range of the unit
    #[arg(long, default_value_t = 4)]
    range: u32,

    /// Start cell as row,col
    #[arg(long, default_value = "0,0")]
    from: String,

    /// Goal cell as row,col (defaults to the far corner)
    #[arg(long)]
    to: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Also print the map
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct ProbeResult {
    seed: u64,
    class: String,
    start: GridPos,
    goal: GridPos,
    reachable: usize,
    path: Vec<GridPos>,
    steps: usize,
    within_range: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("grid_tactics=warn")
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = parse_pos(&args.from)?;
    let goal = match &args.to {
        Some(text) => parse_pos(text)?,
        None => GridPos::new(args.height as i32 - 1, args.width as i32 - 1),
    };

    let grid = random_grid(&mut rng, &args, &[start, goal])?;
    let unit = Unit::new(UnitId::new(0), "Probe", start, args.class).with_move_range(args.range);

    let reachable = reachable_set(&unit, &grid)?;
    let path = shortest_path(start, goal, &unit, &grid)?;
    let steps = path_steps(&path);

    if args.verbose {
        for row in 0..grid.height() as i32 {
            let line: String = (0..grid.width() as i32)
                .map(|col| {
                    let pos = GridPos::new(row, col);
                    if pos == start {
                        '@'
                    } else if pos == goal {
                        'X'
                    } else if path.contains(&pos) {
                        'o'
                    } else {
                        grid.terrain_at(pos).map(|t| t.glyph()).unwrap_or(' ')
                    }
                })
                .collect();
            eprintln!("{}", line);
        }
    }

    let result = ProbeResult {
        seed,
        class: args.class.to_string(),
        start,
        goal,
        reachable: reachable.len(),
        within_range: !path.is_empty() && steps <= args.range as usize,
        path,
        steps,
    };

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| TacticsError::Config(format!("JSON output failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Random terrain; the listed cells are kept open
fn random_grid(rng: &mut StdRng, args: &Args, keep_open: &[GridPos]) -> Result<Grid> {
    let blocked = [
        TerrainKind::Water,
        TerrainKind::Mountain,
        TerrainKind::Flyable,
        TerrainKind::Impassable,
    ];
    let density = args.density.clamp(0.0, 1.0);

    let mut terrain = Vec::with_capacity(args.width as usize * args.height as usize);
    for row in 0..args.height as i32 {
        for col in 0..args.width as i32 {
            let pos = GridPos::new(row, col);
            if keep_open.contains(&pos) || !rng.gen_bool(density) {
                terrain.push(TerrainKind::None);
            } else {
                terrain.push(blocked[rng.gen_range(0..blocked.len())]);
            }
        }
    }

    Grid::new(args.width, args.height, terrain)
}

fn parse_pos(text: &str) -> Result<GridPos> {
    let invalid = || TacticsError::Config(format!("expected row,col but got '{}'", text));
    let (row, col) = text.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse().map_err(|_| invalid())?;
    let col = col.trim().parse().map_err(|_| invalid())?;
    Ok(GridPos::new(row, col))
}
