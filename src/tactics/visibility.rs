//! Fog of war
//!
//! Visibility is a flag on each grid cell, shared by every human-controlled
//! side. Units light the diamond of cells within their view range.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::GridPos;
use crate::tactics::grid::Grid;
use crate::tactics::units::Unit;

/// How revealed cells behave once no unit sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FogMode {
    /// Whole map visible from the start
    Disabled,
    /// Revealed cells stay revealed
    Permanent,
    /// Cells go dark again when their last viewer leaves
    #[default]
    Persistent,
}

/// Applies the reveal/conceal protocol for one fog mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityTracker {
    pub mode: FogMode,
}

impl VisibilityTracker {
    pub fn new(mode: FogMode) -> Self {
        Self { mode }
    }

    /// Light the unit's footprint once per processing cycle
    pub fn reveal(&self, unit: &mut Unit, grid: &mut Grid) -> Result<()> {
        if self.mode == FogMode::Disabled || unit.has_processed_visibility {
            return Ok(());
        }

        for pos in footprint(unit, grid) {
            grid.set_visible(pos, true)?;
        }
        unit.has_processed_visibility = true;
        Ok(())
    }

    /// Darken the unit's footprint (persistent fog only)
    pub fn conceal(&self, unit: &Unit, grid: &mut Grid) -> Result<()> {
        if self.mode != FogMode::Persistent {
            return Ok(());
        }

        for pos in footprint(unit, grid) {
            grid.set_visible(pos, false)?;
        }
        Ok(())
    }

    /// Update fog after `vacating` left its cell
    ///
    /// `vacating` carries the position being left. Every unit of the same
    /// side is then re-revealed, so cells still covered by a teammate stay lit.
    pub fn vacate(&self, vacating: &Unit, side_units: &mut [Unit], grid: &mut Grid) -> Result<()> {
        if self.mode == FogMode::Disabled {
            return Ok(());
        }

        self.conceal(vacating, grid)?;
        for unit in side_units.iter_mut() {
            unit.has_processed_visibility = false;
        }
        for unit in side_units.iter_mut() {
            self.reveal(unit, grid)?;
        }
        Ok(())
    }
}

/// In-bounds cells within the unit's view range
pub fn footprint(unit: &Unit, grid: &Grid) -> Vec<GridPos> {
    let center = unit.position;
    center
        .diamond(unit.view_range)
        .filter(|pos| grid.in_bounds(*pos))
        .collect()
}
