#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that the
//! simulation and presentation collaborators react to. Read access flows
//! through the snapshot types defined here so that no collaborator ever holds
//! a mutable handle to world state.

mod archetypes;
mod config;
mod scores;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use archetypes::{
    validate_archetypes, ArchetypeError, EnemyArchetype, EnemyKind, EnemyStats, TowerArchetype,
    TowerKind, TowerStats, ENEMY_ARCHETYPES, TOWER_ARCHETYPES,
};
pub use config::{
    CombatConfig, ConfigError, EconomyConfig, GameConfig, GridConfig, PathingConfig, WaveConfig,
};
pub use scores::{ScoreStore, ScoreStoreError, LEADERBOARD_CAPACITY};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tower Defence.";

/// Number of simulation ticks executed per simulated second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Describes the active screen of the game state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen waiting for the player to start or open the leaderboard.
    Menu,
    /// Active play; the only mode that advances the simulation.
    Game,
    /// Leaderboard listing, shown after a victory or from the menu.
    Leaderboard,
    /// Defeat screen shown once the player runs out of health.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's tile grid, discarding towers, path and entities.
    ConfigureGrid {
        /// Number of tile columns laid out in the grid.
        columns: TileCoord,
        /// Number of tile rows laid out in the grid, including both border rows.
        rows: TileCoord,
        /// Side length of a single square tile measured in pixels.
        tile_size: u32,
    },
    /// Resets the economy and clears every entity, tower and pending spawn.
    ResetGame {
        /// Spendable balance granted at the start of the game.
        coins: u32,
        /// Number of enemies that may reach the exit before defeat.
        health: u32,
        /// Number of waves that must be cleared to win.
        total_waves: u32,
        /// Fraction of the purchase price refunded on sale or undo.
        refund_ratio: f32,
    },
    /// Updates projectile speed and the spawn clearance radius.
    ConfigureCombat {
        /// Pixels travelled by a projectile per tick.
        projectile_speed: f32,
        /// Minimum distance in pixels between the entrance and any enemy before a spawn.
        spawn_clearance: f32,
    },
    /// Installs a freshly generated path for enemies to follow.
    InstallPath {
        /// Ordered tiles from the entry column to the exit column.
        tiles: Vec<Tile>,
        /// Resampled pixel polyline derived from `tiles`.
        pixels: Vec<Vec2>,
    },
    /// Starts a wave by filling the pending spawn queue.
    BeginWave {
        /// One-based index of the wave being started.
        wave: u32,
        /// Enemy archetypes in the order they will enter the path.
        roster: Vec<EnemyKind>,
        /// Number of ticks between successive spawns.
        spawn_interval: u32,
        /// Health and speed multipliers applied to every enemy of the wave.
        scaling: WaveScaling,
    },
    /// Advances the simulation by a single fixed tick.
    Tick,
    /// Requests placement of a tower on the provided tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that the tower will occupy.
        tile: Tile,
    },
    /// Requests the sale of an existing tower.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests removal of the most recently placed tower that is still standing.
    UndoPlacement,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks processed since the game started.
        tick: u64,
    },
    /// Confirms that a new path was installed.
    PathInstalled {
        /// Number of tiles composing the path.
        tiles: usize,
        /// Number of points in the resampled pixel polyline.
        points: usize,
    },
    /// Announces that a wave started and its roster was enqueued.
    WaveStarted {
        /// One-based index of the wave.
        wave: u32,
        /// Number of enemies waiting in the spawn queue.
        enemies: usize,
    },
    /// Confirms that an enemy left the spawn queue and entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached the end of the path and cost the player health.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Player health remaining after the penalty.
        health: u32,
    },
    /// Reports that a killing blow landed on an enemy.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Coins and score granted for the kill.
        bounty: u32,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Archetype of the firing tower.
        kind: TowerKind,
        /// Enemy the projectile is homing onto.
        target: EnemyId,
    },
    /// Reports that a projectile reached its target and applied damage.
    ProjectileImpact {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage applied to the target.
        damage: u32,
    },
    /// Reports that a projectile was discarded because its target disappeared.
    ProjectileOrphaned {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Reports that the pending queue drained and no enemies remain on the path.
    WaveCleared {
        /// One-based index of the wave that was cleared.
        wave: u32,
    },
    /// Reports that player health dropped to zero.
    PlayerDefeated {
        /// Final score of the game.
        score: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: Tile,
        /// Coins debited for the purchase.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the placement request.
        tile: Tile,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Tile freed by the removal.
        tile: Tile,
        /// Coins refunded to the player.
        refund: u32,
        /// Whether the tower was sold or undone.
        cause: RemovalCause,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index within the tile grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord(u32);

impl TileCoord {
    /// Creates a new tile coordinate wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    column: u32,
    row: u32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev distance between two tiles.
    #[must_use]
    pub fn chebyshev_distance(self, other: Tile) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Reports whether `other` shares an edge with this tile.
    #[must_use]
    pub fn is_orthogonal_neighbor(self, other: Tile) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }
}

/// Describes the discrete tile layout of the playing field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: TileCoord,
    rows: TileCoord,
    tile_size: u32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: TileCoord, rows: TileCoord, tile_size: u32) -> Self {
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> TileCoord {
        self.rows
    }

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Total width of the grid measured in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.columns.get() * self.tile_size
    }

    /// Total height of the grid measured in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.rows.get() * self.tile_size
    }

    /// Reports whether the tile lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, tile: Tile) -> bool {
        tile.column() < self.columns.get() && tile.row() < self.rows.get()
    }

    /// Reports whether the row is playable, i.e. not one of the two border rows.
    #[must_use]
    pub const fn is_interior_row(&self, row: u32) -> bool {
        row >= 1 && row + 1 < self.rows.get()
    }

    /// Pixel position of the tile's centre.
    #[must_use]
    pub fn tile_center(&self, tile: Tile) -> Vec2 {
        tile_center(tile, self.tile_size)
    }

    /// Tile containing the provided pixel position, if it lies on the grid.
    #[must_use]
    pub fn tile_at(&self, point: Vec2) -> Option<Tile> {
        if point.x < 0.0 || point.y < 0.0 || self.tile_size == 0 {
            return None;
        }

        let size = self.tile_size as f32;
        let tile = Tile::new((point.x / size) as u32, (point.y / size) as u32);
        self.contains(tile).then_some(tile)
    }
}

/// Pixel position of a tile's centre for the provided tile size.
///
/// The half-tile offset is rounded down so that odd tile sizes stay on whole
/// pixels.
#[must_use]
pub fn tile_center(tile: Tile, tile_size: u32) -> Vec2 {
    let half = tile_size / 2;
    Vec2::new(
        (tile.column() * tile_size + half) as f32,
        (tile.row() * tile_size + half) as f32,
    )
}

/// Health and speed multipliers applied uniformly to one wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveScaling {
    /// Factor applied to each archetype's maximum health.
    pub health: f32,
    /// Factor applied to each archetype's movement speed.
    pub speed: f32,
}

impl WaveScaling {
    /// Scaling that leaves archetype stats unchanged.
    pub const IDENTITY: Self = Self {
        health: 1.0,
        speed: 1.0,
    };
}

impl Default for WaveScaling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside the configured grid.
    OutOfBounds,
    /// Another tower already occupies the tile.
    Occupied,
    /// The tile belongs to the active enemy path.
    OnPath,
    /// The player cannot afford the tower.
    InsufficientFunds,
}

/// Describes why a tower left the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// The player sold the tower explicitly.
    Sold,
    /// The player undid the tower's placement.
    Undone,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Continuous pixel position.
    pub position: Vec2,
    /// Index of the pixel-path point most recently reached.
    pub path_index: usize,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn after wave scaling.
    pub max_health: u32,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of maximum health in `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: Tile,
    /// Pixel position of the tower, the centre of its tile.
    pub position: Vec2,
    /// Direction of the last shot in radians, measured from the positive x axis.
    pub facing: f32,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current pixel position.
    pub position: Vec2,
    /// Enemy the projectile is homing onto.
    pub target: EnemyId,
    /// Direction of travel in radians.
    pub heading: f32,
}

/// Read-only copy of the player's economy and progression counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EconomySnapshot {
    /// Spendable balance.
    pub coins: u32,
    /// Accumulated score from kills.
    pub score: u32,
    /// Remaining player health.
    pub health: u32,
    /// One-based index of the current wave.
    pub wave: u32,
    /// Number of waves in the game.
    pub total_waves: u32,
}

#[cfg(test)]
mod tests {
    use super::{
        tile_center, EnemyId, EnemyKind, EnemySnapshot, PlacementError, Tile, TileCoord,
        TileGrid, TowerId, TowerKind,
    };
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn chebyshev_distance_uses_dominant_axis() {
        let origin = Tile::new(1, 1);
        assert_eq!(origin.chebyshev_distance(Tile::new(4, 3)), 3);
        assert_eq!(Tile::new(4, 3).chebyshev_distance(origin), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn orthogonal_neighbors_exclude_diagonals() {
        let tile = Tile::new(3, 3);
        assert!(tile.is_orthogonal_neighbor(Tile::new(3, 4)));
        assert!(tile.is_orthogonal_neighbor(Tile::new(2, 3)));
        assert!(!tile.is_orthogonal_neighbor(Tile::new(4, 4)));
        assert!(!tile.is_orthogonal_neighbor(tile));
    }

    #[test]
    fn tile_center_rounds_half_tile_down() {
        assert_eq!(tile_center(Tile::new(2, 1), 40), Vec2::new(100.0, 60.0));
        assert_eq!(tile_center(Tile::new(0, 0), 5), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn grid_reports_interior_rows_and_pixel_lookup() {
        let grid = TileGrid::new(TileCoord::new(30), TileCoord::new(17), 40);
        assert!(!grid.is_interior_row(0));
        assert!(grid.is_interior_row(1));
        assert!(grid.is_interior_row(15));
        assert!(!grid.is_interior_row(16));
        assert_eq!(grid.tile_at(Vec2::new(85.0, 41.0)), Some(Tile::new(2, 1)));
        assert_eq!(grid.tile_at(Vec2::new(1_200.0, 10.0)), None);
        assert_eq!(grid.tile_at(Vec2::new(-1.0, 10.0)), None);
    }

    #[test]
    fn health_ratio_is_clamped() {
        let snapshot = EnemySnapshot {
            id: EnemyId::new(1),
            kind: EnemyKind::Scout,
            position: Vec2::ZERO,
            path_index: 0,
            health: 10,
            max_health: 40,
        };
        assert!((snapshot.health_ratio() - 0.25).abs() < f32::EPSILON);

        let empty = EnemySnapshot {
            max_health: 0,
            ..snapshot
        };
        assert_eq!(empty.health_ratio(), 0.0);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_identity_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&TowerKind::Sniper);
        assert_round_trip(&Tile::new(5, 7));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::OnPath);
    }
}
