//! Tunable game configuration.
//!
//! Every section deserialises with defaults so that partial configuration
//! files only need to list the values they override.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TileCoord, TileGrid};

/// Complete configuration for one game session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid dimensions.
    pub grid: GridConfig,
    /// Starting balance, lives and refund policy.
    pub economy: EconomyConfig,
    /// Wave count and difficulty curve.
    pub waves: WaveConfig,
    /// Path generation retry budgets.
    pub pathing: PathingConfig,
    /// Projectile and spawn spacing parameters.
    pub combat: CombatConfig,
}

/// Dimensions of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows, including the two border rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 30,
            rows: 17,
            tile_size: 40,
        }
    }
}

impl GridConfig {
    /// Converts the configuration into a grid description.
    #[must_use]
    pub const fn tile_grid(&self) -> TileGrid {
        TileGrid::new(
            TileCoord::new(self.columns),
            TileCoord::new(self.rows),
            self.tile_size,
        )
    }
}

/// Starting economy and refund policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Coins available when a game starts.
    pub starting_coins: u32,
    /// Lives available when a game starts.
    pub starting_health: u32,
    /// Fraction of the purchase price returned on sale or undo.
    pub refund_ratio: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins: 200,
            starting_health: 20,
            refund_ratio: 0.6,
        }
    }
}

/// Wave count and escalation curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Number of waves to clear for victory.
    pub total: u32,
    /// Enemy count before per-wave growth.
    pub base_enemy_count: u32,
    /// Additional enemies per wave number.
    pub enemies_per_wave: u32,
    /// Spawn interval in ticks before per-wave shortening.
    pub base_spawn_interval: u32,
    /// Lower bound on the spawn interval in ticks.
    pub min_spawn_interval: u32,
    /// Health multiplier growth per wave after the first.
    pub health_growth: f32,
    /// Speed multiplier growth per wave after the first.
    pub speed_growth: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            total: 5,
            base_enemy_count: 5,
            enemies_per_wave: 3,
            base_spawn_interval: 36,
            min_spawn_interval: 20,
            health_growth: 0.08,
            speed_growth: 0.02,
        }
    }
}

/// Retry budgets for the path generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathingConfig {
    /// Full generation attempts before falling back to the previous path.
    pub generation_attempts: u32,
    /// Draws allowed while picking waypoints within one attempt.
    pub waypoint_attempts: u32,
}

impl Default for PathingConfig {
    fn default() -> Self {
        Self {
            generation_attempts: 80,
            waypoint_attempts: 60,
        }
    }
}

/// Projectile speed and spawn spacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatConfig {
    /// Pixels travelled by a projectile per tick.
    pub projectile_speed: f32,
    /// Minimum distance in pixels between the path entrance and any active enemy before a spawn.
    pub spawn_clearance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 8.0,
            spawn_clearance: 24.0,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot host an entry column, waypoints and an exit column.
    #[error("grid must be at least 5 columns wide, got {0}")]
    GridTooNarrow(u32),
    /// The grid has no interior row between the borders.
    #[error("grid must be at least 3 rows tall, got {0}")]
    GridTooShort(u32),
    /// Tiles must span at least one pixel.
    #[error("tile size must be positive")]
    ZeroTileSize,
    /// A game needs at least one wave.
    #[error("at least one wave is required")]
    NoWaves,
    /// The refund ratio lies outside `0.0..=1.0`.
    #[error("refund ratio must lie within 0..=1, got {0}")]
    RefundRatioOutOfRange(f32),
    /// A retry budget is zero.
    #[error("{0} must be positive")]
    ZeroBudget(&'static str),
    /// A speed or distance is not a positive finite number.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive {
        /// Name of the offending field.
        name: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// The spawn interval bounds are inconsistent.
    #[error("minimum spawn interval {min} must be positive and at most the base interval {base}")]
    SpawnIntervalBounds {
        /// Configured minimum.
        min: u32,
        /// Configured base.
        base: u32,
    },
}

impl GameConfig {
    /// Checks that every value can drive a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.columns < 5 {
            return Err(ConfigError::GridTooNarrow(self.grid.columns));
        }
        if self.grid.rows < 3 {
            return Err(ConfigError::GridTooShort(self.grid.rows));
        }
        if self.grid.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.waves.total == 0 {
            return Err(ConfigError::NoWaves);
        }
        let ratio = self.economy.refund_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::RefundRatioOutOfRange(ratio));
        }
        if self.pathing.generation_attempts == 0 {
            return Err(ConfigError::ZeroBudget("pathing.generation_attempts"));
        }
        if self.pathing.waypoint_attempts == 0 {
            return Err(ConfigError::ZeroBudget("pathing.waypoint_attempts"));
        }
        positive("combat.projectile_speed", self.combat.projectile_speed)?;
        positive("combat.spawn_clearance", self.combat.spawn_clearance)?;
        let waves = &self.waves;
        if waves.min_spawn_interval == 0 || waves.min_spawn_interval > waves.base_spawn_interval {
            return Err(ConfigError::SpawnIntervalBounds {
                min: waves.min_spawn_interval,
                base: waves.base_spawn_interval,
            });
        }
        if !(waves.health_growth >= 0.0 && waves.health_growth.is_finite()) {
            return Err(ConfigError::NonPositive {
                name: "waves.health_growth",
                value: waves.health_growth,
            });
        }
        if !(waves.speed_growth >= 0.0 && waves.speed_growth.is_finite()) {
            return Err(ConfigError::NonPositive {
                name: "waves.speed_growth",
                value: waves.speed_growth,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn narrow_grid_is_rejected() {
        let mut config = GameConfig::default();
        config.grid.columns = 4;
        assert_eq!(config.validate(), Err(ConfigError::GridTooNarrow(4)));
    }

    #[test]
    fn refund_ratio_must_be_a_fraction() {
        let mut config = GameConfig::default();
        config.economy.refund_ratio = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RefundRatioOutOfRange(1.5))
        );
    }

    #[test]
    fn spawn_interval_floor_cannot_exceed_base() {
        let mut config = GameConfig::default();
        config.waves.min_spawn_interval = 40;
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnIntervalBounds { min: 40, base: 36 })
        );
    }

    #[test]
    fn zero_budgets_are_rejected() {
        let mut config = GameConfig::default();
        config.pathing.generation_attempts = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroBudget("pathing.generation_attempts"))
        );
    }

    #[test]
    fn grid_config_builds_matching_tile_grid() {
        let grid = GridConfig::default().tile_grid();
        assert_eq!(grid.columns().get(), 30);
        assert_eq!(grid.rows().get(), 17);
        assert_eq!(grid.width(), 1_200);
    }
}
