//! Level configuration with documented defaults
//!
//! Every tunable the tactics core reads lives here. A config is owned by the
//! `Level` it was handed to; there is no process-wide instance.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};
use crate::tactics::visibility::FogMode;

/// Configuration for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    // === FOG OF WAR ===
    /// How visibility behaves for human-controlled sides
    ///
    /// - `disabled`: every cell is visible from load
    /// - `permanent`: cells stay lit once revealed
    /// - `persistent`: cells darken again once no friendly unit sees them
    pub fog_mode: FogMode,

    // === PATHFINDING ===
    /// Maximum number of `came_from` links followed when rebuilding a path
    ///
    /// A legitimate path on any grid this core handles is far shorter. Hitting
    /// the bound means the search table holds a cycle.
    pub retrace_bound: usize,

    // === UNIT DEFAULTS ===
    /// Move range given to units whose roster entry does not set one
    pub default_move_range: u32,

    /// View range given to units whose roster entry does not set one
    pub default_view_range: u32,

    /// Starting and maximum health
    pub default_max_health: i32,

    /// Starting and maximum mana
    pub default_max_mana: i32,

    // === TURN TIMING ===
    /// Seconds of accumulated update time before the placeholder AI ends its turn
    pub ai_turn_seconds: f32,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            fog_mode: FogMode::Persistent,
            retrace_bound: 500,
            default_move_range: 4,
            default_view_range: 3,
            default_max_health: 100,
            default_max_mana: 100,
            ai_turn_seconds: 10.0,
        }
    }
}

impl TacticsConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fog_mode(mut self, fog_mode: FogMode) -> Self {
        self.fog_mode = fog_mode;
        self
    }

    /// Placeholder AI turn length as a duration
    pub fn ai_turn_duration(&self) -> Duration {
        Duration::from_secs_f32(self.ai_turn_seconds.max(0.0))
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.retrace_bound == 0 {
            return Err("retrace_bound must be at least 1".into());
        }

        if self.default_max_health <= 0 {
            return Err(format!(
                "default_max_health ({}) must be positive",
                self.default_max_health
            ));
        }

        if self.default_max_mana < 0 {
            return Err(format!(
                "default_max_mana ({}) must not be negative",
                self.default_max_mana
            ));
        }

        if !self.ai_turn_seconds.is_finite() || self.ai_turn_seconds <= 0.0 {
            return Err(format!(
                "ai_turn_seconds ({}) must be a positive number",
                self.ai_turn_seconds
            ));
        }

        Ok(())
    }

    /// Parse and validate a config from TOML text; missing keys keep defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TacticsConfig =
            toml::from_str(content).map_err(|e| TacticsError::Config(e.to_string()))?;
        config.validate().map_err(TacticsError::Config)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loading tactics config from {}", path.display());
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TacticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_unit_baseline() {
        let config = TacticsConfig::new();
        assert_eq!(config.retrace_bound, 500);
        assert_eq!(config.default_move_range, 4);
        assert_eq!(config.default_view_range, 3);
        assert_eq!(config.default_max_health, 100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TacticsConfig::from_toml_str(
            r#"
            fog_mode = "permanent"
            default_move_range = 6
            "#,
        )
        .expect("Failed to parse TOML");

        assert_eq!(config.fog_mode, FogMode::Permanent);
        assert_eq!(config.default_move_range, 6);
        assert_eq!(config.default_view_range, 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = TacticsConfig::from_toml_str("retrace_bound = 0");
        assert!(matches!(result, Err(TacticsError::Config(_))));

        let result = TacticsConfig::from_toml_str("ai_turn_seconds = -1.0");
        assert!(matches!(result, Err(TacticsError::Config(_))));
    }

    #[test]
    fn test_unknown_fog_mode_rejected() {
        let result = TacticsConfig::from_toml_str(r#"fog_mode = "sometimes""#);
        assert!(matches!(result, Err(TacticsError::Config(_))));
    }

    #[test]
    fn test_ai_turn_duration() {
        let mut config = TacticsConfig::new();
        config.ai_turn_seconds = 2.5;
        assert_eq!(config.ai_turn_duration(), Duration::from_millis(2500));
    }
}
