//! Players and the pluggable strategy deciding when a turn is over

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};
use crate::core::types::{GridPos, PlayerId, UnitId};
use crate::tactics::units::Unit;

/// Who issues orders for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    Human,
    Computer,
}

/// Trait for turn-ending behaviour
///
/// Human players end their turn by explicit command; computer players decide
/// inside `update`.
pub trait TurnStrategy: fmt::Debug {
    fn controller(&self) -> ControllerKind;

    /// Called when the owning player's turn begins
    fn on_turn_start(&mut self) {}

    /// Advance by `dt`; return true once the turn is finished
    fn update(&mut self, dt: Duration, is_current: bool) -> bool;
}

/// Waits for an explicit end-turn command
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanStrategy;

impl TurnStrategy for HumanStrategy {
    fn controller(&self) -> ControllerKind {
        ControllerKind::Human
    }

    fn update(&mut self, _dt: Duration, _is_current: bool) -> bool {
        false
    }
}

/// Placeholder AI: ends its turn after a fixed amount of update time
#[derive(Debug, Clone)]
pub struct TimerStrategy {
    turn_length: Duration,
    elapsed: Duration,
}

impl TimerStrategy {
    pub fn new(turn_length: Duration) -> Self {
        Self {
            turn_length,
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl TurnStrategy for TimerStrategy {
    fn controller(&self) -> ControllerKind {
        ControllerKind::Computer
    }

    fn on_turn_start(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn update(&mut self, dt: Duration, is_current: bool) -> bool {
        if !is_current {
            return false;
        }
        self.elapsed += dt;
        self.elapsed >= self.turn_length
    }
}

/// A side in the level: an ordered roster plus turn flags
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    units: Vec<Unit>,
    strategy: Box<dyn TurnStrategy>,
    is_current_player: bool,
    is_turn_finished: bool,
    defeated: bool,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        units: Vec<Unit>,
        strategy: Box<dyn TurnStrategy>,
    ) -> Result<Self> {
        if units.is_empty() {
            return Err(TacticsError::EmptyRoster);
        }

        Ok(Self {
            id,
            name: name.into(),
            units,
            strategy,
            is_current_player: false,
            is_turn_finished: false,
            defeated: false,
        })
    }

    pub fn controller(&self) -> ControllerKind {
        self.strategy.controller()
    }

    pub fn is_human(&self) -> bool {
        self.controller() == ControllerKind::Human
    }

    pub fn is_current_player(&self) -> bool {
        self.is_current_player
    }

    pub fn is_turn_finished(&self) -> bool {
        self.is_turn_finished
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn unit_at(&self, pos: GridPos) -> Option<&Unit> {
        self.units.iter().find(|u| u.position == pos)
    }

    /// Begin this player's turn: fresh unit flags, strategy notified
    pub fn start_turn(&mut self) {
        self.is_current_player = true;
        self.is_turn_finished = false;
        for unit in &mut self.units {
            unit.next_turn();
        }
        self.strategy.on_turn_start();
    }

    pub fn end_turn(&mut self) {
        self.is_current_player = false;
        for unit in &mut self.units {
            unit.deselect();
        }
    }

    pub fn finish_turn(&mut self) {
        self.is_turn_finished = true;
    }

    /// Tick the strategy; returns whether the turn is finished
    pub fn update(&mut self, dt: Duration) -> bool {
        if self.strategy.update(dt, self.is_current_player) && self.is_current_player {
            self.is_turn_finished = true;
        }
        self.is_turn_finished
    }

    /// Take a unit out of the roster; an emptied roster defeats the player
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        let unit = self.units.remove(index);
        if self.units.is_empty() {
            self.defeated = true;
        }
        Some(unit)
    }
}
