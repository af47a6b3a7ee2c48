//! Grid Tactics - Entry Point
//!
//! Console driver for a demo level: one human side against a timer-driven
//! placeholder AI. Reads commands from stdin and prints the map with fog.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use grid_tactics::core::config::TacticsConfig;
use grid_tactics::core::error::Result;
use grid_tactics::core::types::GridPos;
use grid_tactics::tactics::{
    Grid, HumanStrategy, Level, LevelOutcome, TimerStrategy, TraversalPolicy, UnitSpec,
};

const DEMO_MAP: &str = "
    ............
    ....~~~.....
    ....~~~..^^.
    .##.....^^..
    .#*.........
    .#*....###..
    .##....#....
    .......#..~~
    ..^^......~~
    ............
";

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("grid_tactics=debug")
        .init();

    tracing::info!("Grid Tactics starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => TacticsConfig::load(Path::new(&path))?,
        None => TacticsConfig::new(),
    };

    let mut level = build_demo_level(config)?;

    println!("\n=== GRID TACTICS ===");
    println!();
    println!("Commands:");
    println!("  select <r> <c>  - Select your unit at row r, column c");
    println!("  move <r> <c>    - Move the selected unit");
    println!("  reach           - Show where the selected unit can go");
    println!("  end             - End your turn");
    println!("  tick [n]        - Advance n seconds (default 1)");
    println!("  show / s        - Redraw the map");
    println!("  quit / q        - Exit");
    println!();

    render(&level);

    loop {
        if level.outcome() != LevelOutcome::Ongoing {
            println!("Level over: {:?}", level.outcome());
            break;
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["show"] | ["s"] => render(&level),
            ["select", r, c] => match parse_pos(r, c) {
                Some(pos) => match level.select_unit(pos) {
                    Ok(Some(id)) => {
                        println!("Selected {}", id);
                        render(&level);
                    }
                    Ok(None) => println!("No unit of yours that can still move at {}", pos),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: select <row> <col>"),
            },
            ["move", r, c] => {
                let (Some(pos), Some(id)) = (parse_pos(r, c), level.selected_unit()) else {
                    println!("Select a unit first, then: move <row> <col>");
                    continue;
                };
                match level.attempt_move(id, pos) {
                    Ok(()) => render(&level),
                    Err(e) => println!("{}", e),
                }
            }
            ["reach"] => match level.selected_unit() {
                Some(id) => match level.mark_reachable(id) {
                    Ok(cells) => {
                        println!("{} can reach {} cells", id, cells.len());
                        render(&level);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("No unit selected"),
            },
            ["end"] => {
                let Some(current) = level.current_player().map(|p| p.id) else {
                    continue;
                };
                match level.end_turn(current) {
                    Ok(Some(t)) => println!("Turn passes to {} (round {})", t.started, t.round),
                    Ok(None) => {}
                    Err(e) => println!("Error: {}", e),
                }
            }
            ["tick"] => tick(&mut level, 1)?,
            ["tick", n] => match n.parse::<u32>() {
                Ok(n) => tick(&mut level, n)?,
                Err(_) => println!("Usage: tick [n]"),
            },
            _ => println!("Unknown command. Available: select, move, reach, end, tick, show, quit"),
        }
    }

    println!(
        "\nGoodbye! {} events over {} ticks, round {}.",
        level.events().len(),
        level.tick(),
        level.round()
    );
    Ok(())
}

fn build_demo_level(config: TacticsConfig) -> Result<Level> {
    let grid = Grid::from_ascii(DEMO_MAP)?;
    let ai_turn = config.ai_turn_duration();
    let mut level = Level::new(grid, config)?;

    level.add_player(
        "Blue",
        Box::new(HumanStrategy),
        vec![
            UnitSpec::new("Bladesmaster", TraversalPolicy::Ground, GridPos::new(9, 1)),
            UnitSpec::new("Assassin", TraversalPolicy::Stealth, GridPos::new(9, 3)),
            UnitSpec::new("Dragon", TraversalPolicy::Flying, GridPos::new(8, 0)),
        ],
    )?;
    level.add_player(
        "Red",
        Box::new(TimerStrategy::new(ai_turn)),
        vec![
            UnitSpec::new("Raider", TraversalPolicy::Ground, GridPos::new(0, 10)),
            UnitSpec::new("Wyvern", TraversalPolicy::Flying, GridPos::new(1, 11)),
        ],
    )?;

    Ok(level)
}

fn tick(level: &mut Level, seconds: u32) -> Result<()> {
    for _ in 0..seconds {
        if let Some(t) = level.update(Duration::from_secs(1))? {
            println!("Turn passes to {} (round {})", t.started, t.round);
        }
    }
    println!("Tick {} complete.", level.tick());
    Ok(())
}

fn parse_pos(row: &str, col: &str) -> Option<GridPos> {
    Some(GridPos::new(row.parse().ok()?, col.parse().ok()?))
}

/// Draw the map: `?` unseen, `+` move target, units by class letter
///
/// Human units are upper case, the others lower case and only shown when lit.
fn render(level: &Level) {
    let grid = level.grid();
    if let Some(player) = level.current_player() {
        println!("Round {} - {} to play", level.round(), player.name);
    }

    print!("   ");
    for col in 0..grid.width() {
        print!("{}", col % 10);
    }
    println!();

    for row in 0..grid.height() as i32 {
        print!("{:>2} ", row);
        for col in 0..grid.width() as i32 {
            let pos = GridPos::new(row, col);
            let Ok(cell) = grid.cell(pos) else {
                continue;
            };

            let owner_is_human = level
                .unit_at(pos)
                .and_then(|u| level.owner_of(u.id).ok())
                .and_then(|id| level.player(id))
                .map(|p| p.is_human());

            let glyph = match (level.unit_at(pos), owner_is_human) {
                (Some(unit), Some(true)) => class_letter(unit.policy).to_ascii_uppercase(),
                (Some(unit), _) if cell.visible => class_letter(unit.policy),
                _ if !cell.visible => '?',
                _ if level.highlighted().contains(&pos) => '+',
                _ => cell.terrain.glyph(),
            };
            print!("{}", glyph);
        }
        println!();
    }
}

fn class_letter(policy: TraversalPolicy) -> char {
    match policy {
        TraversalPolicy::Ground => 'g',
        TraversalPolicy::Stealth => 's',
        TraversalPolicy::Flying => 'f',
    }
}
