use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{GridPos, PlayerId, UnitId};

/// Why a move request was refused; the selection stays active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejectReason {
    Occupied,
    Untraversable,
    OutOfRange,
    NoPath,
    AlreadyMoved,
}

impl fmt::Display for MoveRejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MoveRejectReason::Occupied => "target cell is occupied",
            MoveRejectReason::Untraversable => "terrain cannot be traversed by this unit",
            MoveRejectReason::OutOfRange => "target is beyond the unit's move range",
            MoveRejectReason::NoPath => "no path to the target",
            MoveRejectReason::AlreadyMoved => "unit has already moved this turn",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: GridPos, width: u32, height: u32 },

    #[error("Move of {unit} rejected: {reason}")]
    MoveRejected { unit: UnitId, reason: MoveRejectReason },

    #[error("{0} is not the current player")]
    NotCurrentPlayer(PlayerId),

    #[error("Path retrace exceeded {bound} steps (corrupted search state)")]
    SearchInternalInconsistency { bound: usize },

    #[error("Unit not found: {0}")]
    UnknownUnit(UnitId),

    #[error("Player not found: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Level is already decided")]
    LevelDecided,

    #[error("Player roster must contain at least one unit")]
    EmptyRoster,

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Cannot place unit at {pos}: {reason}")]
    InvalidPlacement { pos: GridPos, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TacticsError {
    pub fn rejected(unit: UnitId, reason: MoveRejectReason) -> Self {
        TacticsError::MoveRejected { unit, reason }
    }

    /// The rejection reason, if this is a recoverable move rejection
    pub fn reject_reason(&self) -> Option<MoveRejectReason> {
        match self {
            TacticsError::MoveRejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TacticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_extraction() {
        let err = TacticsError::rejected(UnitId::new(1), MoveRejectReason::OutOfRange);
        assert_eq!(err.reject_reason(), Some(MoveRejectReason::OutOfRange));
        assert_eq!(TacticsError::EmptyRoster.reject_reason(), None);
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = TacticsError::OutOfBounds {
            pos: GridPos::new(10, -1),
            width: 10,
            height: 8,
        };
        assert_eq!(err.to_string(), "Position (10, -1) is outside the 10x8 grid");
    }
}
