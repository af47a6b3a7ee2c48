//! Units: position, resource pools, ranges and per-turn state

use serde::{Deserialize, Serialize};

use crate::core::config::TacticsConfig;
use crate::core::types::{GridPos, UnitId};
use crate::tactics::terrain::{TerrainKind, TraversalPolicy};

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    Alive,
    Dead,
}

/// Roster entry handed to `Level::add_player`
///
/// Unset ranges and pools fall back to the level's config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub policy: TraversalPolicy,
    pub position: GridPos,
    #[serde(default)]
    pub move_range: Option<u32>,
    #[serde(default)]
    pub view_range: Option<u32>,
    #[serde(default)]
    pub max_health: Option<i32>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, policy: TraversalPolicy, position: GridPos) -> Self {
        Self {
            name: name.into(),
            policy,
            position,
            move_range: None,
            view_range: None,
            max_health: None,
        }
    }

    pub fn with_move_range(mut self, range: u32) -> Self {
        self.move_range = Some(range);
        self
    }

    pub fn with_view_range(mut self, range: u32) -> Self {
        self.view_range = Some(range);
        self
    }

    pub fn with_max_health(mut self, health: i32) -> Self {
        self.max_health = Some(health);
        self
    }
}

/// A unit on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub position: GridPos,

    // Pools
    pub current_health: i32,
    pub max_health: i32,
    pub current_mana: i32,
    pub max_mana: i32,

    // Ranges (Manhattan)
    pub move_range: u32,
    pub view_range: u32,

    pub policy: TraversalPolicy,

    // Turn state
    pub selected: bool,
    pub has_moved: bool,
    pub has_processed_visibility: bool,
}

impl Unit {
    /// Unit with baseline stats: 100 health/mana, move 4, view 3
    pub fn new(id: UnitId, name: impl Into<String>, position: GridPos, policy: TraversalPolicy) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            current_health: 100,
            max_health: 100,
            current_mana: 100,
            max_mana: 100,
            move_range: 4,
            view_range: 3,
            policy,
            selected: false,
            has_moved: false,
            has_processed_visibility: false,
        }
    }

    pub fn from_spec(id: UnitId, spec: &UnitSpec, config: &TacticsConfig) -> Self {
        let max_health = spec.max_health.unwrap_or(config.default_max_health);
        Self {
            current_health: max_health,
            max_health,
            current_mana: config.default_max_mana,
            max_mana: config.default_max_mana,
            move_range: spec.move_range.unwrap_or(config.default_move_range),
            view_range: spec.view_range.unwrap_or(config.default_view_range),
            ..Self::new(id, spec.name.clone(), spec.position, spec.policy)
        }
    }

    pub fn with_move_range(mut self, range: u32) -> Self {
        self.move_range = range;
        self
    }

    pub fn with_view_range(mut self, range: u32) -> Self {
        self.view_range = range;
        self
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Reset per-turn flags at the start of the owner's turn
    pub fn next_turn(&mut self) {
        self.has_moved = false;
        self.has_processed_visibility = false;
    }

    /// Record a completed move: spent for this turn, visibility stale, deselected
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
        self.has_processed_visibility = false;
        self.deselect();
    }

    pub fn can_traverse(&self, terrain: TerrainKind) -> bool {
        self.policy.can_traverse(terrain)
    }

    /// Manhattan pre-filter against the move budget
    pub fn within_move_range(&self, target: GridPos) -> bool {
        self.position.manhattan(&target) <= self.move_range
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Can this unit still be ordered to move this turn?
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.has_moved
    }

    pub fn take_damage(&mut self, amount: i32) -> UnitStatus {
        self.current_health = self.current_health.saturating_sub(amount.max(0));
        if self.is_alive() {
            UnitStatus::Alive
        } else {
            UnitStatus::Dead
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_health = self
            .current_health
            .saturating_add(amount.max(0))
            .min(self.max_health);
    }

    /// Spend mana if enough is available
    pub fn spend_mana(&mut self, amount: i32) -> bool {
        if amount < 0 || self.current_mana < amount {
            return false;
        }
        self.current_mana -= amount;
        true
    }
}
