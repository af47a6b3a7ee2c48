pub mod config;
pub mod error;
pub mod types;

pub use config::TacticsConfig;
pub use error::{MoveRejectReason, Result, TacticsError};
pub use types::{GridPos, PlayerId, Tick, UnitId};
