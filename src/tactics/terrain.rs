//! Terrain classification and per-class traversal rules
//!
//! Terrain never changes after the map is built. What a unit may enter is a
//! property of its traversal class, not of the grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Traversal category of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainKind {
    #[default]
    None,       // Open ground
    Water,      // Sea, lake
    Mountain,   // Peaks
    Flyable,    // Lava, chasms: fliers only
    Impassable, // Walls
}

impl TerrainKind {
    /// Map-glyph used by the ASCII grid format
    pub fn glyph(&self) -> char {
        match self {
            TerrainKind::None => '.',
            TerrainKind::Water => '~',
            TerrainKind::Mountain => '^',
            TerrainKind::Flyable => '*',
            TerrainKind::Impassable => '#',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainKind::None),
            '~' => Some(TerrainKind::Water),
            '^' => Some(TerrainKind::Mountain),
            '*' => Some(TerrainKind::Flyable),
            '#' => Some(TerrainKind::Impassable),
            _ => None,
        }
    }

    /// Collision-layer index as stored by the map loader (tile id minus tileset start)
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(TerrainKind::None),
            1 => Some(TerrainKind::Water),
            2 => Some(TerrainKind::Mountain),
            3 => Some(TerrainKind::Flyable),
            4 => Some(TerrainKind::Impassable),
            _ => None,
        }
    }
}

/// Which terrain a class of unit may enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TraversalPolicy {
    #[default]
    Ground,  // Melee classes
    Stealth, // Assassins
    Flying,
}

impl TraversalPolicy {
    pub fn can_traverse(&self, terrain: TerrainKind) -> bool {
        match self {
            TraversalPolicy::Ground | TraversalPolicy::Stealth => {
                matches!(terrain, TerrainKind::None)
            }
            TraversalPolicy::Flying => matches!(
                terrain,
                TerrainKind::None | TerrainKind::Water | TerrainKind::Mountain | TerrainKind::Flyable
            ),
        }
    }

    pub fn all() -> [TraversalPolicy; 3] {
        [
            TraversalPolicy::Ground,
            TraversalPolicy::Stealth,
            TraversalPolicy::Flying,
        ]
    }
}

impl fmt::Display for TraversalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalPolicy::Ground => "ground",
            TraversalPolicy::Stealth => "stealth",
            TraversalPolicy::Flying => "flying",
        };
        f.write_str(name)
    }
}

impl FromStr for TraversalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ground" | "melee" | "bladesmaster" => Ok(TraversalPolicy::Ground),
            "stealth" | "assassin" => Ok(TraversalPolicy::Stealth),
            "flying" | "flyer" | "dragon" => Ok(TraversalPolicy::Flying),
            other => Err(format!("unknown unit class '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TERRAIN: [TerrainKind; 5] = [
        TerrainKind::None,
        TerrainKind::Water,
        TerrainKind::Mountain,
        TerrainKind::Flyable,
        TerrainKind::Impassable,
    ];

    #[test]
    fn test_ground_only_open_terrain() {
        assert!(TraversalPolicy::Ground.can_traverse(TerrainKind::None));
        assert!(!TraversalPolicy::Ground.can_traverse(TerrainKind::Water));
        assert!(!TraversalPolicy::Ground.can_traverse(TerrainKind::Mountain));
        assert!(!TraversalPolicy::Ground.can_traverse(TerrainKind::Flyable));
    }

    #[test]
    fn test_stealth_matches_ground() {
        for terrain in ALL_TERRAIN {
            assert_eq!(
                TraversalPolicy::Stealth.can_traverse(terrain),
                TraversalPolicy::Ground.can_traverse(terrain)
            );
        }
    }

    #[test]
    fn test_flying_crosses_everything_but_walls() {
        assert!(TraversalPolicy::Flying.can_traverse(TerrainKind::None));
        assert!(TraversalPolicy::Flying.can_traverse(TerrainKind::Water));
        assert!(TraversalPolicy::Flying.can_traverse(TerrainKind::Mountain));
        assert!(TraversalPolicy::Flying.can_traverse(TerrainKind::Flyable));
    }

    #[test]
    fn test_impassable_for_every_class() {
        for policy in TraversalPolicy::all() {
            assert!(!policy.can_traverse(TerrainKind::Impassable));
        }
    }

    #[test]
    fn test_glyph_round_trip() {
        for terrain in ALL_TERRAIN {
            assert_eq!(TerrainKind::from_glyph(terrain.glyph()), Some(terrain));
        }
        assert_eq!(TerrainKind::from_glyph('x'), None);
    }

    #[test]
    fn test_collision_index_mapping() {
        assert_eq!(TerrainKind::from_index(0), Some(TerrainKind::None));
        assert_eq!(TerrainKind::from_index(4), Some(TerrainKind::Impassable));
        assert_eq!(TerrainKind::from_index(5), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Assassin".parse::<TraversalPolicy>(), Ok(TraversalPolicy::Stealth));
        assert_eq!("flying".parse::<TraversalPolicy>(), Ok(TraversalPolicy::Flying));
        assert_eq!("bladesmaster".parse::<TraversalPolicy>(), Ok(TraversalPolicy::Ground));
        assert!("wizard".parse::<TraversalPolicy>().is_err());
    }
}
