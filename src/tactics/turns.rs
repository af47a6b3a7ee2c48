//! Turn rotation
//!
//! The controller owns the players in join order and a cursor naming the
//! current one. Exactly the cursor player has `is_current_player` set.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerId;
use crate::tactics::player::Player;

/// Record of one hand-over between players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTransition {
    pub ended: PlayerId,
    pub started: PlayerId,
    pub round: u32,
}

#[derive(Debug, Default)]
pub struct TurnController {
    players: Vec<Player>,
    cursor: usize,
    round: u32,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a player; the first one to join starts playing at once
    pub fn add_player(&mut self, mut player: Player) -> PlayerId {
        let id = player.id;
        if self.players.is_empty() {
            player.start_turn();
            self.cursor = 0;
            self.round = 1;
            tracing::debug!("{} ({}) opens round 1", player.name, id);
        }
        self.players.push(player);
        id
    }

    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.cursor)
    }

    pub fn current_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.cursor)
    }

    pub fn current_id(&self) -> Option<PlayerId> {
        self.current().map(|p| p.id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Completed wraps of the rotation, starting at 1
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Update every player; hand over the turn if the current one is done
    pub fn update(&mut self, dt: Duration) -> Option<TurnTransition> {
        let mut current_done = false;
        for (index, player) in self.players.iter_mut().enumerate() {
            let finished = player.update(dt);
            if index == self.cursor {
                current_done = finished || player.is_defeated();
            }
        }

        if current_done {
            self.advance()
        } else {
            None
        }
    }

    /// Next undefeated player after the cursor, wrapping around
    fn next_index(&self) -> Option<usize> {
        let len = self.players.len();
        (1..=len)
            .map(|offset| (self.cursor + offset) % len)
            .find(|&index| !self.players[index].is_defeated())
    }

    fn advance(&mut self) -> Option<TurnTransition> {
        let next = self.next_index()?;
        let ended = self.players[self.cursor].id;
        self.players[self.cursor].end_turn();

        if next <= self.cursor {
            self.round += 1;
        }
        self.cursor = next;
        self.players[next].start_turn();

        let started = self.players[next].id;
        tracing::debug!("Turn passes {} -> {} (round {})", ended, started, self.round);

        Some(TurnTransition {
            ended,
            started,
            round: self.round,
        })
    }
}
