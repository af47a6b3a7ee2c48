//! Tile grid with per-cell occupancy and visibility
//!
//! Dimensions belong to each grid instance. Every coordinate accessor checks
//! bounds and reports `OutOfBounds` instead of indexing blindly.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};
use crate::core::types::GridPos;
use crate::tactics::terrain::TerrainKind;

/// A single cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: TerrainKind,
    pub occupied: bool,
    pub visible: bool,
}

impl Cell {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            occupied: false,
            visible: false,
        }
    }
}

/// Fixed-size grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major terrain data
    pub fn new(width: u32, height: u32, terrain: Vec<TerrainKind>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TacticsError::InvalidGrid(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize;
        if terrain.len() != expected {
            return Err(TacticsError::InvalidGrid(format!(
                "expected {} terrain entries for {}x{}, got {}",
                expected,
                width,
                height,
                terrain.len()
            )));
        }

        Ok(Self {
            width,
            height,
            cells: terrain.into_iter().map(Cell::new).collect(),
        })
    }

    /// Grid where every cell has the same terrain
    pub fn filled(width: u32, height: u32, terrain: TerrainKind) -> Result<Self> {
        Self::new(width, height, vec![terrain; width as usize * height as usize])
    }

    /// Parse a grid from glyph rows (`.` `~` `^` `*` `#`)
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let mut terrain = Vec::with_capacity(width as usize * height as usize);

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() as u32 != width {
                return Err(TacticsError::InvalidGrid(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    line.chars().count(),
                    width
                )));
            }
            for (col, glyph) in line.chars().enumerate() {
                let kind = TerrainKind::from_glyph(glyph).ok_or_else(|| {
                    TacticsError::InvalidGrid(format!(
                        "unknown terrain glyph '{}' at ({}, {})",
                        glyph, row, col
                    ))
                })?;
                terrain.push(kind);
            }
        }

        Self::new(width, height, terrain)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinate is within grid bounds
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && pos.row < self.height as i32
            && pos.col < self.width as i32
    }

    fn index(&self, pos: GridPos) -> Result<usize> {
        if !self.in_bounds(pos) {
            return Err(TacticsError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.row as usize * self.width as usize + pos.col as usize)
    }

    pub fn cell(&self, pos: GridPos) -> Result<&Cell> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    fn cell_mut(&mut self, pos: GridPos) -> Result<&mut Cell> {
        let index = self.index(pos)?;
        Ok(&mut self.cells[index])
    }

    pub fn terrain_at(&self, pos: GridPos) -> Result<TerrainKind> {
        Ok(self.cell(pos)?.terrain)
    }

    pub fn is_occupied(&self, pos: GridPos) -> Result<bool> {
        Ok(self.cell(pos)?.occupied)
    }

    pub fn set_occupied(&mut self, pos: GridPos, occupied: bool) -> Result<()> {
        self.cell_mut(pos)?.occupied = occupied;
        Ok(())
    }

    pub fn is_visible(&self, pos: GridPos) -> Result<bool> {
        Ok(self.cell(pos)?.visible)
    }

    pub fn set_visible(&mut self, pos: GridPos, visible: bool) -> Result<()> {
        self.cell_mut(pos)?.visible = visible;
        Ok(())
    }

    /// Mark every cell visible (fog disabled)
    pub fn reveal_all(&mut self) {
        for cell in &mut self.cells {
            cell.visible = true;
        }
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visible).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// All in-bounds positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height as i32)
            .flat_map(move |row| (0..self.width as i32).map(move |col| GridPos::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::filled(10, 8, TerrainKind::None).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.positions().count(), 80);
        assert_eq!(grid.visible_count(), 0);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_grid_rejects_bad_dimensions() {
        assert!(matches!(
            Grid::new(0, 5, Vec::new()),
            Err(TacticsError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::new(2, 2, vec![TerrainKind::None; 3]),
            Err(TacticsError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_in_bounds_edges() {
        let grid = Grid::filled(4, 3, TerrainKind::None).unwrap();
        assert!(grid.in_bounds(GridPos::new(0, 0)));
        assert!(grid.in_bounds(GridPos::new(2, 3)));
        assert!(!grid.in_bounds(GridPos::new(3, 0)));
        assert!(!grid.in_bounds(GridPos::new(0, 4)));
        assert!(!grid.in_bounds(GridPos::new(-1, 0)));
        assert!(!grid.in_bounds(GridPos::new(0, -1)));
    }

    #[test]
    fn test_out_of_bounds_is_reported() {
        let mut grid = Grid::filled(4, 3, TerrainKind::None).unwrap();
        let outside = GridPos::new(3, 1);

        assert!(matches!(
            grid.is_occupied(outside),
            Err(TacticsError::OutOfBounds { width: 4, height: 3, .. })
        ));
        assert!(grid.set_occupied(outside, true).is_err());
        assert!(grid.is_visible(outside).is_err());
        assert!(grid.set_visible(outside, true).is_err());
        assert!(grid.terrain_at(outside).is_err());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_occupancy_and_visibility_mutators() {
        let mut grid = Grid::filled(5, 5, TerrainKind::None).unwrap();
        let pos = GridPos::new(2, 3);

        grid.set_occupied(pos, true).unwrap();
        grid.set_visible(pos, true).unwrap();
        assert!(grid.is_occupied(pos).unwrap());
        assert!(grid.is_visible(pos).unwrap());
        assert!(!grid.is_occupied(GridPos::new(3, 2)).unwrap());

        grid.set_occupied(pos, false).unwrap();
        assert!(!grid.is_occupied(pos).unwrap());
    }

    #[test]
    fn test_terrain_stable_under_mutation() {
        let mut grid = Grid::from_ascii(
            "
            .~
            ^#
            ",
        )
        .unwrap();
        let before: Vec<_> = grid.positions().map(|p| grid.terrain_at(p).unwrap()).collect();

        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set_occupied(pos, true).unwrap();
            grid.set_visible(pos, true).unwrap();
        }

        let after: Vec<_> = grid.positions().map(|p| grid.terrain_at(p).unwrap()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_from_ascii() {
        let grid = Grid::from_ascii(
            "
            ..~
            #*^
            ",
        )
        .unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.terrain_at(GridPos::new(0, 2)).unwrap(), TerrainKind::Water);
        assert_eq!(grid.terrain_at(GridPos::new(1, 0)).unwrap(), TerrainKind::Impassable);
        assert_eq!(grid.terrain_at(GridPos::new(1, 1)).unwrap(), TerrainKind::Flyable);
        assert_eq!(grid.terrain_at(GridPos::new(1, 2)).unwrap(), TerrainKind::Mountain);
    }

    #[test]
    fn test_from_ascii_rejects_ragged_rows() {
        assert!(Grid::from_ascii("...\n..").is_err());
        assert!(Grid::from_ascii("..x").is_err());
        assert!(Grid::from_ascii("").is_err());
    }

    #[test]
    fn test_reveal_all() {
        let mut grid = Grid::filled(3, 3, TerrainKind::None).unwrap();
        grid.reveal_all();
        assert_eq!(grid.visible_count(), 9);
    }
}
