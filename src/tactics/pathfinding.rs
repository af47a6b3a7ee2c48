//! Movement range and shortest paths on the tile grid
//!
//! Both searches are read-only on the grid. All bookkeeping lives in tables
//! local to one call, so concurrent searches on different levels never share
//! state.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use ahash::{AHashMap, AHashSet};

use crate::core::error::{Result, TacticsError};
use crate::core::types::GridPos;
use crate::tactics::grid::Grid;
use crate::tactics::units::Unit;

/// Retrace bound used when no level config is at hand
pub const DEFAULT_RETRACE_BOUND: usize = 500;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: GridPos,
    f_cost: u32, // g_cost + heuristic
    seq: u64,    // insertion order, breaks f ties first-in first-out
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cells the unit can end a move on this turn, including its own cell
///
/// One bounded breadth-first search: a neighbour is taken if it is in bounds,
/// unoccupied, traversable for the unit's class, within `move_range` of the
/// start by Manhattan distance, and reached in at most `move_range` steps.
pub fn reachable_set(unit: &Unit, grid: &Grid) -> Result<AHashSet<GridPos>> {
    let start = unit.position;
    // Surface OutOfBounds for a bad start
    grid.cell(start)?;

    let mut distance: AHashMap<GridPos, u32> = AHashMap::new();
    let mut frontier = VecDeque::new();
    distance.insert(start, 0);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        let steps = distance[&current];
        if steps >= unit.move_range {
            continue;
        }

        for neighbor in current.neighbors() {
            if distance.contains_key(&neighbor) || !grid.in_bounds(neighbor) {
                continue;
            }
            if start.manhattan(&neighbor) > unit.move_range {
                continue;
            }

            let cell = grid.cell(neighbor)?;
            if cell.occupied || !unit.can_traverse(cell.terrain) {
                continue;
            }

            distance.insert(neighbor, steps + 1);
            frontier.push_back(neighbor);
        }
    }

    Ok(distance.into_iter().map(|(pos, _)| pos).collect())
}

/// Shortest 4-connected path from `start` to `goal`, both inclusive
///
/// Returns `[start]` when already there and an empty vector when the goal
/// cannot be reached. Occupied cells block the search, except the goal.
/// The unit's move range is not consulted; compare `path_steps` against it.
pub fn shortest_path(start: GridPos, goal: GridPos, unit: &Unit, grid: &Grid) -> Result<Vec<GridPos>> {
    shortest_path_bounded(start, goal, unit, grid, DEFAULT_RETRACE_BOUND)
}

/// `shortest_path` with an explicit retrace bound
pub fn shortest_path_bounded(
    start: GridPos,
    goal: GridPos,
    unit: &Unit,
    grid: &Grid,
    retrace_bound: usize,
) -> Result<Vec<GridPos>> {
    grid.cell(start)?;
    grid.cell(goal)?;

    if start == goal {
        return Ok(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<GridPos, GridPos> = AHashMap::new();
    let mut g_scores: AHashMap<GridPos, u32> = AHashMap::new();
    let mut closed: AHashSet<GridPos> = AHashSet::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        pos: start,
        f_cost: start.manhattan(&goal),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return match retrace(&came_from, start, goal, retrace_bound) {
                Ok(path) => Ok(path),
                Err(err) => {
                    tracing::error!("Discarding path {} -> {}: {}", start, goal, err);
                    Ok(Vec::new())
                }
            };
        }

        // Stale heap entry
        if !closed.insert(current.pos) {
            continue;
        }

        let current_g = g_scores.get(&current.pos).copied().unwrap_or(u32::MAX);

        for neighbor in current.pos.neighbors() {
            if !grid.in_bounds(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let cell = grid.cell(neighbor)?;
            if !unit.can_traverse(cell.terrain) {
                continue;
            }
            if cell.occupied && neighbor != goal {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    pos: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(&goal),
                    seq,
                });
            }
        }
    }

    Ok(Vec::new()) // No path found
}

/// Walk `came_from` back from `goal` to `start`
///
/// Fails with `SearchInternalInconsistency` after `bound` links, which only
/// happens if the table holds a cycle or never reaches `start`.
pub(crate) fn retrace(
    came_from: &AHashMap<GridPos, GridPos>,
    start: GridPos,
    goal: GridPos,
    bound: usize,
) -> Result<Vec<GridPos>> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        if path.len() > bound {
            return Err(TacticsError::SearchInternalInconsistency { bound });
        }
        current = *came_from
            .get(&current)
            .ok_or(TacticsError::SearchInternalInconsistency { bound })?;
        path.push(current);
    }

    path.reverse();
    Ok(path)
}

/// Number of moves along a path
pub fn path_steps(path: &[GridPos]) -> usize {
    path.len().saturating_sub(1)
}
