#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Tower Defence adapters.
//!
//! Backends receive a [`Scene`] built from read-only world snapshots, resolve
//! sprites through an [`AssetLookup`] and play [`SoundCue`] values derived
//! from world events. Nothing here can mutate the simulation.

mod assets;
mod audio;

use anyhow::Result as AnyResult;
use glam::Vec2;
use tower_defence_core::{EnemyId, EnemyKind, GameMode, Tile, TowerId, TowerKind};

pub use assets::{AssetLookup, AssetManifest, NoAssets, Placeholder, SpriteAsset, SpriteKey};
pub use audio::{cues_from_events, AudioSink, SilentAudio, SoundCue};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Tile layout with per-tile buildability.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: u32,
    buildable: Vec<bool>,
}

impl GridPresentation {
    /// Creates a grid description, querying `is_buildable` once per tile.
    #[must_use]
    pub fn new<F>(columns: u32, rows: u32, tile_size: u32, mut is_buildable: F) -> Self
    where
        F: FnMut(Tile) -> bool,
    {
        let mut buildable = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                buildable.push(is_buildable(Tile::new(column, row)));
            }
        }
        Self {
            columns,
            rows,
            tile_size,
            buildable,
        }
    }

    /// Reports whether the tile was buildable when the scene was captured.
    #[must_use]
    pub fn is_buildable(&self, tile: Tile) -> bool {
        if tile.column() >= self.columns || tile.row() >= self.rows {
            return false;
        }
        let index = u64::from(tile.row()) * u64::from(self.columns) + u64::from(tile.column());
        usize::try_from(index)
            .ok()
            .and_then(|index| self.buildable.get(index).copied())
            .unwrap_or(false)
    }

    /// Width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.columns * self.tile_size
    }

    /// Height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.rows * self.tile_size
    }
}

/// Enemy drawn with a health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Archetype used to pick the sprite.
    pub kind: EnemyKind,
    /// Pixel position.
    pub position: Vec2,
    /// Remaining health as a fraction of maximum health.
    pub health_ratio: f32,
}

/// Tower drawn at its tile centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Archetype used to pick the sprite.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: Tile,
    /// Pixel position of the tile centre.
    pub position: Vec2,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Direction of the last shot in radians.
    pub facing: f32,
    /// Whether the player selected this tower.
    pub selected: bool,
    /// Whether the range circle should be drawn.
    pub show_range: bool,
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Pixel position.
    pub position: Vec2,
    /// Direction of travel in radians.
    pub heading: f32,
}

/// Counters shown in the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Remaining player health.
    pub health: u32,
    /// Spendable balance.
    pub coins: u32,
    /// Accumulated score.
    pub score: u32,
    /// One-based current wave.
    pub wave: u32,
    /// Number of waves in the game.
    pub total_waves: u32,
}

/// One row of the open build menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildMenuItem {
    /// Tower offered by the row.
    pub kind: TowerKind,
    /// Purchase price.
    pub cost: u32,
    /// Whether the player can afford it; disabled rows are drawn greyed out.
    pub enabled: bool,
}

/// Build menu opened for an empty tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildMenuPresentation {
    /// Tile the tower would be built on.
    pub tile: Tile,
    /// Rows in display order, cheapest first.
    pub items: Vec<BuildMenuItem>,
}

/// Context menu for a selected tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerMenuPresentation {
    /// Selected tower.
    pub tower: TowerId,
    /// Coins returned if the tower is sold.
    pub refund: u32,
    /// Whether the range circle is currently shown.
    pub show_range: bool,
}

/// Complete read-only description of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Active screen.
    pub mode: GameMode,
    /// Grid geometry and buildability.
    pub grid: GridPresentation,
    /// Tiles of the active path.
    pub path_tiles: Vec<Tile>,
    /// Pixel polyline of the active path.
    pub path_points: Vec<Vec2>,
    /// Enemies on the path.
    pub enemies: Vec<SceneEnemy>,
    /// Placed towers.
    pub towers: Vec<SceneTower>,
    /// Projectiles in flight.
    pub projectiles: Vec<SceneProjectile>,
    /// Heads-up display counters.
    pub hud: Hud,
    /// Build menu, when open.
    pub build_menu: Option<BuildMenuPresentation>,
    /// Tower context menu, when open.
    pub tower_menu: Option<TowerMenuPresentation>,
    /// Leaderboard scores, best first.
    pub leaderboard: Vec<u32>,
}

/// Backend capable of presenting scenes.
pub trait RenderingBackend {
    /// Draws one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_presentation_captures_buildability_row_major() {
        let grid = GridPresentation::new(3, 2, 10, |tile| tile.column() != 1);

        assert!(grid.is_buildable(Tile::new(0, 0)));
        assert!(!grid.is_buildable(Tile::new(1, 1)));
        assert!(grid.is_buildable(Tile::new(2, 1)));
        assert!(!grid.is_buildable(Tile::new(3, 0)));
        assert_eq!((grid.width(), grid.height()), (30, 20));
    }

    #[test]
    fn byte_colors_are_normalised() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }
}
