//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid coordinate (row, col)
///
/// Signed so neighbour generation can step past the map edge; `Grid::in_bounds`
/// decides validity. Equality and hashing only ever look at row and col.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance on the 4-connected lattice
    pub fn manhattan(&self, other: &Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The 4 orthogonal neighbours: up, left, down, right
    pub fn neighbors(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.row - 1, self.col),
            GridPos::new(self.row, self.col - 1),
            GridPos::new(self.row + 1, self.col),
            GridPos::new(self.row, self.col + 1),
        ]
    }

    /// All lattice points within Manhattan `radius` (inclusive), unclipped
    pub fn diamond(&self, radius: u32) -> impl Iterator<Item = GridPos> + '_ {
        let radius = radius as i32;
        (-radius..=radius).flat_map(move |dr| {
            let span = radius - dr.abs();
            (-span..=span).map(move |dc| GridPos::new(self.row + dr, self.col + dc))
        })
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unique identifier for units within one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Unique identifier for players within one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Level tick counter (one per `Level::update` call)
pub type Tick = u64;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_manhattan_distance() {
        let a = GridPos::new(1, 1);
        let b = GridPos::new(4, 3);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
        assert_eq!(a.manhattan(&a), 0);
    }

    #[test]
    fn test_manhattan_across_negative() {
        let a = GridPos::new(-2, 0);
        let b = GridPos::new(1, -1);
        assert_eq!(a.manhattan(&b), 4);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = GridPos::new(5, 5);
        for n in center.neighbors() {
            assert_eq!(center.manhattan(&n), 1);
        }
    }

    #[test]
    fn test_diamond_sizes() {
        let center = GridPos::new(0, 0);
        assert_eq!(center.diamond(0).count(), 1);
        assert_eq!(center.diamond(1).count(), 5);
        assert_eq!(center.diamond(2).count(), 13);
        assert_eq!(center.diamond(3).count(), 25);
    }

    #[test]
    fn test_diamond_stays_within_radius() {
        let center = GridPos::new(3, -4);
        let cells: HashSet<_> = center.diamond(4).collect();
        assert!(cells.iter().all(|p| center.manhattan(p) <= 4));
        assert_eq!(cells.len(), center.diamond(4).count());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UnitId::new(3).to_string(), "unit#3");
        assert_eq!(PlayerId::new(0).to_string(), "player#0");
        assert_eq!(GridPos::new(2, 7).to_string(), "(2, 7)");
    }
}
