use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::dock::SpawnConfig;

/// Session configuration.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
///
/// # Example
///
/// ```
/// use blockfit_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "noise_cells": 0 }"#).unwrap();
/// assert_eq!(config.noise_cells, 0);
/// assert_eq!(config.spawn.offer_size, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of neutral cells pre-filled at session start.
    ///
    /// Requests beyond the free cells of the board fill it completely.
    pub noise_cells: usize,
    pub spawn: SpawnConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            noise_cells: 5,
            spawn: SpawnConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default noise with no bombs or stars.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            spawn: SpawnConfig::CLASSIC,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn.validate().map_err(ConfigError::Spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpawnConfigError;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.noise_cells, 5);
        assert!((config.spawn.bomb_chance - 0.10).abs() < f64::EPSILON);
        assert!((config.spawn.star_chance - 0.10).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_nested_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "spawn": { "bomb_chance": 0.0, "offer_size": 3 } }"#)
                .unwrap();
        assert_eq!(config.noise_cells, 5);
        assert!(config.spawn.bomb_chance.abs() < f64::EPSILON);
        assert!((config.spawn.star_chance - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.spawn.offer_size, 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<GameConfig>(r#"{ "noise": 3 }"#).is_err());
    }

    #[test]
    fn test_oversized_noise_is_valid() {
        let config = GameConfig {
            noise_cells: 101,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_errors() {
        let config = GameConfig {
            spawn: SpawnConfig {
                star_chance: 2.0,
                ..SpawnConfig::default()
            },
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Spawn(SpawnConfigError::ChanceOutOfRange))
        ));
    }
}
