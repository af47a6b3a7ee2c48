//! Grid Tactics - turn-based tactics simulation core

pub mod core;
pub mod tactics;
