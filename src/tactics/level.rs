//! Level: the composition root for one match
//!
//! Owns the grid, the turn controller (and through it every player and unit),
//! the fog tracker, the current selection and an event log. All rule checks
//! for selection, movement, turn hand-over and unit death run here.

use std::time::Duration;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::config::TacticsConfig;
use crate::core::error::{MoveRejectReason, Result, TacticsError};
use crate::core::types::{GridPos, PlayerId, Tick, UnitId};
use crate::tactics::grid::Grid;
use crate::tactics::pathfinding::{path_steps, reachable_set, shortest_path_bounded};
use crate::tactics::player::{Player, TurnStrategy};
use crate::tactics::turns::{TurnController, TurnTransition};
use crate::tactics::units::{Unit, UnitSpec, UnitStatus};
use crate::tactics::visibility::{FogMode, VisibilityTracker};

/// How the level stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelOutcome {
    #[default]
    Ongoing,
    Victory(PlayerId),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEventKind {
    PlayerJoined { player: PlayerId },
    TurnStarted { player: PlayerId, round: u32 },
    TurnEnded { player: PlayerId },
    UnitMoved { unit: UnitId, from: GridPos, to: GridPos, steps: usize },
    UnitDamaged { unit: UnitId, amount: i32, remaining: i32 },
    UnitHealed { unit: UnitId, amount: i32, remaining: i32 },
    ManaSpent { unit: UnitId, amount: i32, remaining: i32 },
    UnitDied { unit: UnitId, player: PlayerId },
    PlayerDefeated { player: PlayerId },
    LevelEnded { outcome: LevelOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEvent {
    pub tick: Tick,
    pub kind: LevelEventKind,
    pub description: String,
}

#[derive(Debug)]
pub struct Level {
    grid: Grid,
    config: TacticsConfig,
    fog: VisibilityTracker,
    turns: TurnController,
    selected: Option<UnitId>,
    highlighted: AHashSet<GridPos>,
    next_unit_id: u32,
    next_player_id: u32,
    tick: Tick,
    outcome: LevelOutcome,
    events: Vec<LevelEvent>,
}

impl Level {
    pub fn new(mut grid: Grid, config: TacticsConfig) -> Result<Self> {
        config.validate().map_err(TacticsError::Config)?;

        let fog = VisibilityTracker::new(config.fog_mode);
        if fog.mode == FogMode::Disabled {
            grid.reveal_all();
        }

        tracing::info!(
            "Level created: {}x{} grid, fog {:?}",
            grid.width(),
            grid.height(),
            fog.mode
        );

        Ok(Self {
            grid,
            config,
            fog,
            turns: TurnController::new(),
            selected: None,
            highlighted: AHashSet::new(),
            next_unit_id: 0,
            next_player_id: 0,
            tick: 0,
            outcome: LevelOutcome::Ongoing,
            events: Vec::new(),
        })
    }

    // === ACCESSORS ===

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &TacticsConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        self.turns.players()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.turns.player(id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.turns.current()
    }

    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.turns.players().iter().find_map(|p| p.unit(id))
    }

    pub fn unit_at(&self, pos: GridPos) -> Option<&Unit> {
        self.turns.players().iter().find_map(|p| p.unit_at(pos))
    }

    /// Which player fields this unit
    pub fn owner_of(&self, id: UnitId) -> Result<PlayerId> {
        self.turns
            .players()
            .iter()
            .find(|p| p.unit(id).is_some())
            .map(|p| p.id)
            .ok_or(TacticsError::UnknownUnit(id))
    }

    pub fn selected_unit(&self) -> Option<UnitId> {
        self.selected
    }

    /// Cells currently marked as valid move targets
    pub fn highlighted(&self) -> &AHashSet<GridPos> {
        &self.highlighted
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.turns
            .players_mut()
            .iter_mut()
            .find_map(|p| p.unit_mut(id))
    }

    /// Commands are refused once the outcome is settled
    fn ensure_ongoing(&self) -> Result<()> {
        if self.outcome != LevelOutcome::Ongoing {
            return Err(TacticsError::LevelDecided);
        }
        Ok(())
    }

    fn log(&mut self, kind: LevelEventKind, description: String) {
        self.events.push(LevelEvent {
            tick: self.tick,
            kind,
            description,
        });
    }

    // === SETUP ===

    /// Add a side; units are placed on their start cells in roster order
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        strategy: Box<dyn TurnStrategy>,
        roster: Vec<UnitSpec>,
    ) -> Result<PlayerId> {
        if roster.is_empty() {
            return Err(TacticsError::EmptyRoster);
        }

        let mut claimed = AHashSet::new();
        for spec in &roster {
            let cell = self.grid.cell(spec.position)?;
            if cell.occupied || !claimed.insert(spec.position) {
                return Err(TacticsError::InvalidPlacement {
                    pos: spec.position,
                    reason: "cell already occupied".into(),
                });
            }
            if !spec.policy.can_traverse(cell.terrain) {
                return Err(TacticsError::InvalidPlacement {
                    pos: spec.position,
                    reason: format!("{} units cannot stand on {:?}", spec.policy, cell.terrain),
                });
            }
        }

        let units: Vec<Unit> = roster
            .iter()
            .map(|spec| {
                let id = UnitId::new(self.next_unit_id);
                self.next_unit_id += 1;
                Unit::from_spec(id, spec, &self.config)
            })
            .collect();

        let id = PlayerId::new(self.next_player_id);
        let mut player = Player::new(id, name, units, strategy)?;
        self.next_player_id += 1;

        for unit in player.units() {
            self.grid.set_occupied(unit.position, true)?;
        }
        if player.is_human() {
            let fog = self.fog;
            for unit in player.units_mut() {
                fog.reveal(unit, &mut self.grid)?;
            }
        }

        let first = self.turns.is_empty();
        let description = format!("{} joins with {} units", player.name, player.units().len());
        tracing::info!("{} ({})", description, id);
        self.turns.add_player(player);
        self.log(LevelEventKind::PlayerJoined { player: id }, description);

        if first {
            self.log(
                LevelEventKind::TurnStarted {
                    player: id,
                    round: self.turns.round(),
                },
                format!("{} starts round {}", id, self.turns.round()),
            );
        }

        Ok(id)
    }

    // === SELECTION ===

    /// Select the current player's unit standing on `pos`
    ///
    /// Anything other than a unit that can still act clears the selection.
    pub fn select_unit(&mut self, pos: GridPos) -> Result<Option<UnitId>> {
        self.ensure_ongoing()?;
        self.grid.cell(pos)?;
        self.deselect();

        let candidate = self
            .turns
            .current()
            .and_then(|p| p.unit_at(pos))
            .filter(|u| u.can_act())
            .map(|u| u.id);

        let Some(id) = candidate else {
            return Ok(None);
        };

        self.mark_reachable(id)?;
        if let Some(unit) = self.unit_mut(id) {
            unit.select();
        }
        self.selected = Some(id);
        tracing::debug!("Selected {} at {}", id, pos);
        Ok(Some(id))
    }

    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            if let Some(unit) = self.unit_mut(id) {
                unit.deselect();
            }
        }
        self.highlighted.clear();
    }

    /// Compute and record the unit's valid move targets
    pub fn mark_reachable(&mut self, id: UnitId) -> Result<AHashSet<GridPos>> {
        let unit = self.unit(id).ok_or(TacticsError::UnknownUnit(id))?;
        let reach = reachable_set(unit, &self.grid)?;
        self.highlighted = reach.clone();
        Ok(reach)
    }

    // === MOVEMENT ===

    /// Move a unit of the current player to `target`
    ///
    /// Checks run in a fixed order and the first failure is returned. A
    /// rejected move leaves every piece of state untouched.
    pub fn attempt_move(&mut self, id: UnitId, target: GridPos) -> Result<()> {
        self.ensure_ongoing()?;
        let target_cell = *self.grid.cell(target)?;
        let owner = self.owner_of(id)?;
        if self.turns.current_id() != Some(owner) {
            return Err(TacticsError::NotCurrentPlayer(owner));
        }

        // Snapshot of the unit where it stands now
        let departed = self.unit(id).ok_or(TacticsError::UnknownUnit(id))?.clone();

        if departed.has_moved {
            return Err(reject(id, MoveRejectReason::AlreadyMoved));
        }
        if target_cell.occupied {
            return Err(reject(id, MoveRejectReason::Occupied));
        }
        if !departed.can_traverse(target_cell.terrain) {
            return Err(reject(id, MoveRejectReason::Untraversable));
        }
        if !departed.within_move_range(target) {
            return Err(reject(id, MoveRejectReason::OutOfRange));
        }

        let path = shortest_path_bounded(
            departed.position,
            target,
            &departed,
            &self.grid,
            self.config.retrace_bound,
        )?;
        if path.is_empty() {
            return Err(reject(id, MoveRejectReason::NoPath));
        }
        let steps = path_steps(&path);
        if steps > departed.move_range as usize {
            return Err(reject(id, MoveRejectReason::OutOfRange));
        }

        let from = departed.position;
        self.grid.set_occupied(from, false)?;
        self.grid.set_occupied(target, true)?;
        self.deselect();
        if let Some(unit) = self.unit_mut(id) {
            unit.position = target;
            unit.mark_moved();
        }
        self.refresh_fog(owner, &departed)?;

        tracing::info!("{} moved {} -> {} in {} steps", id, from, target, steps);
        self.log(
            LevelEventKind::UnitMoved {
                unit: id,
                from,
                to: target,
                steps,
            },
            format!("{} moved from {} to {}", departed.name, from, target),
        );
        Ok(())
    }

    /// Fog update after a unit of `owner` left its old footprint
    fn refresh_fog(&mut self, owner: PlayerId, departed: &Unit) -> Result<()> {
        let fog = self.fog;
        if fog.mode == FogMode::Disabled {
            return Ok(());
        }

        for player in self.turns.players_mut().iter_mut() {
            if player.is_human() && player.id == owner {
                fog.vacate(departed, player.units_mut(), &mut self.grid)?;
            }
        }

        // Other human sides share the cell flags; relight what they see
        for player in self.turns.players_mut().iter_mut() {
            if player.is_human() && player.id != owner {
                for unit in player.units_mut() {
                    unit.has_processed_visibility = false;
                    fog.reveal(unit, &mut self.grid)?;
                }
            }
        }
        Ok(())
    }

    // === TURNS ===

    /// Explicit end-turn command from `player`
    pub fn end_turn(&mut self, player: PlayerId) -> Result<Option<TurnTransition>> {
        self.ensure_ongoing()?;
        if self.turns.player(player).is_none() {
            return Err(TacticsError::UnknownPlayer(player));
        }
        if self.turns.current_id() != Some(player) {
            return Err(TacticsError::NotCurrentPlayer(player));
        }

        if let Some(current) = self.turns.current_mut() {
            current.finish_turn();
        }
        self.advance_turns(Duration::ZERO)
    }

    /// Advance the level clock by `dt`
    pub fn update(&mut self, dt: Duration) -> Result<Option<TurnTransition>> {
        self.tick += 1;
        if self.outcome != LevelOutcome::Ongoing {
            return Ok(None);
        }
        self.advance_turns(dt)
    }

    fn advance_turns(&mut self, dt: Duration) -> Result<Option<TurnTransition>> {
        let Some(transition) = self.turns.update(dt) else {
            return Ok(None);
        };

        self.deselect();
        self.log(
            LevelEventKind::TurnEnded {
                player: transition.ended,
            },
            format!("{} ends turn", transition.ended),
        );
        self.log(
            LevelEventKind::TurnStarted {
                player: transition.started,
                round: transition.round,
            },
            format!("{} starts round {}", transition.started, transition.round),
        );
        tracing::info!(
            "Turn {} -> {} (round {})",
            transition.ended,
            transition.started,
            transition.round
        );

        let fog = self.fog;
        if let Some(player) = self.turns.player_mut(transition.started) {
            if player.is_human() {
                for unit in player.units_mut() {
                    fog.reveal(unit, &mut self.grid)?;
                }
            }
        }

        Ok(Some(transition))
    }

    // === DAMAGE ===

    /// Apply damage; a unit at zero health leaves the level
    pub fn apply_damage(&mut self, id: UnitId, amount: i32) -> Result<UnitStatus> {
        self.ensure_ongoing()?;
        let owner = self.owner_of(id)?;
        let unit = self.unit_mut(id).ok_or(TacticsError::UnknownUnit(id))?;
        let status = unit.take_damage(amount);
        let remaining = unit.current_health;

        self.log(
            LevelEventKind::UnitDamaged {
                unit: id,
                amount,
                remaining,
            },
            format!("{} takes {} damage ({} left)", id, amount, remaining),
        );

        if status == UnitStatus::Dead {
            self.remove_dead(owner, id)?;
        }
        Ok(status)
    }

    /// Restore health up to the unit's maximum; returns the new health
    pub fn heal_unit(&mut self, id: UnitId, amount: i32) -> Result<i32> {
        self.ensure_ongoing()?;
        let unit = self.unit_mut(id).ok_or(TacticsError::UnknownUnit(id))?;
        unit.heal(amount);
        let remaining = unit.current_health;

        self.log(
            LevelEventKind::UnitHealed {
                unit: id,
                amount,
                remaining,
            },
            format!("{} heals {} ({} now)", id, amount, remaining),
        );
        Ok(remaining)
    }

    /// Spend mana if the unit has enough; nothing changes otherwise
    pub fn spend_mana(&mut self, id: UnitId, amount: i32) -> Result<bool> {
        self.ensure_ongoing()?;
        let unit = self.unit_mut(id).ok_or(TacticsError::UnknownUnit(id))?;
        if !unit.spend_mana(amount) {
            return Ok(false);
        }
        let remaining = unit.current_mana;

        self.log(
            LevelEventKind::ManaSpent {
                unit: id,
                amount,
                remaining,
            },
            format!("{} spends {} mana ({} left)", id, amount, remaining),
        );
        Ok(true)
    }

    fn remove_dead(&mut self, owner: PlayerId, id: UnitId) -> Result<()> {
        if self.selected == Some(id) {
            self.deselect();
        }

        let player = self
            .turns
            .player_mut(owner)
            .ok_or(TacticsError::UnknownPlayer(owner))?;
        let Some(dead) = player.remove_unit(id) else {
            return Err(TacticsError::UnknownUnit(id));
        };
        let defeated = player.is_defeated();

        self.grid.set_occupied(dead.position, false)?;
        self.refresh_fog(owner, &dead)?;

        tracing::info!("{} ({}) died at {}", dead.name, id, dead.position);
        self.log(
            LevelEventKind::UnitDied {
                unit: id,
                player: owner,
            },
            format!("{} died at {}", dead.name, dead.position),
        );

        if defeated {
            tracing::info!("{} defeated", owner);
            self.log(
                LevelEventKind::PlayerDefeated { player: owner },
                format!("{} has no units left", owner),
            );
            self.resolve_outcome();

            if self.outcome == LevelOutcome::Ongoing && self.turns.current_id() == Some(owner) {
                self.advance_turns(Duration::ZERO)?;
            }
        }
        Ok(())
    }

    fn resolve_outcome(&mut self) {
        let standing: Vec<PlayerId> = self
            .turns
            .players()
            .iter()
            .filter(|p| !p.is_defeated())
            .map(|p| p.id)
            .collect();

        let outcome = match standing.as_slice() {
            [] => LevelOutcome::Draw,
            [winner] => LevelOutcome::Victory(*winner),
            _ => return,
        };

        self.outcome = outcome;
        tracing::info!("Level ended: {:?}", outcome);
        self.log(LevelEventKind::LevelEnded { outcome }, format!("Level ended: {:?}", outcome));
    }
}

fn reject(unit: UnitId, reason: MoveRejectReason) -> TacticsError {
    tracing::debug!("Move of {} rejected: {}", unit, reason);
    TacticsError::rejected(unit, reason)
}
