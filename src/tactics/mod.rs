//! Tactics core: grid, movement, fog of war and turn rotation
//!
//! Everything a turn-based grid battle needs below the presentation layer:
//! - Terrain and per-class traversal rules
//! - Bounded movement range and shortest paths
//! - Fog of war shared by human-controlled sides
//! - Pluggable turn strategies and the rotation between players
//!
//! `Level` ties these together and is the only entry point callers need.

pub mod grid;
pub mod level;
pub mod pathfinding;
pub mod player;
pub mod terrain;
pub mod turns;
pub mod units;
pub mod visibility;

// Re-exports for convenient access
pub use grid::{Cell, Grid};
pub use level::{Level, LevelEvent, LevelEventKind, LevelOutcome};
pub use pathfinding::{path_steps, reachable_set, shortest_path, shortest_path_bounded};
pub use player::{ControllerKind, HumanStrategy, Player, TimerStrategy, TurnStrategy};
pub use terrain::{TerrainKind, TraversalPolicy};
pub use turns::{TurnController, TurnTransition};
pub use units::{Unit, UnitSpec, UnitStatus};
pub use visibility::{footprint, FogMode, VisibilityTracker};
