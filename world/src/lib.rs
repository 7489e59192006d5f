#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tower Defence.
//!
//! The world owns every mutable piece of a running game: the build grid, the
//! active path, placed towers and their placement history, enemies on the
//! path, the pending spawn queue, projectiles in flight and the economy. It is
//! mutated only through [`apply`] and observed only through [`query`].

mod enemies;
mod grid;
mod projectiles;
mod towers;

use std::collections::VecDeque;

use glam::Vec2;
use tower_defence_core::{
    Command, EconomySnapshot, EnemyId, EnemyKind, Event, GameConfig, PlacementError, ProjectileId,
    RemovalCause, Tile, TileGrid, TowerKind, WaveScaling, WELCOME_BANNER,
};
use tracing::{debug, info};

use crate::{
    enemies::Enemy,
    grid::BuildGrid,
    projectiles::{Projectile, ProjectileOutcome},
    towers::{Tower, TowerRegistry},
};

/// Represents the authoritative Tower Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: BuildGrid,
    path_tiles: Vec<Tile>,
    path_pixels: Vec<Vec2>,
    towers: TowerRegistry,
    enemies: Vec<Enemy>,
    pending: VecDeque<Enemy>,
    projectiles: Vec<Projectile>,
    economy: EconomySnapshot,
    refund_ratio: f32,
    projectile_speed: f32,
    spawn_clearance: f32,
    spawn_timer: u32,
    spawn_interval: u32,
    wave_in_progress: bool,
    defeat_reported: bool,
    next_enemy_id: u32,
    next_projectile_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world laid out with the default configuration, ready for a new game.
    #[must_use]
    pub fn new() -> Self {
        let config = GameConfig::default();
        Self {
            banner: WELCOME_BANNER,
            grid: BuildGrid::new(config.grid.tile_grid()),
            path_tiles: Vec::new(),
            path_pixels: Vec::new(),
            towers: TowerRegistry::new(),
            enemies: Vec::new(),
            pending: VecDeque::new(),
            projectiles: Vec::new(),
            economy: EconomySnapshot {
                coins: config.economy.starting_coins,
                score: 0,
                health: config.economy.starting_health,
                wave: 1,
                total_waves: config.waves.total,
            },
            refund_ratio: config.economy.refund_ratio,
            projectile_speed: config.combat.projectile_speed,
            spawn_clearance: config.combat.spawn_clearance,
            spawn_timer: 0,
            spawn_interval: config.waves.base_spawn_interval,
            wave_in_progress: false,
            defeat_reported: false,
            next_enemy_id: 0,
            next_projectile_id: 0,
            tick_index: 0,
        }
    }

    fn clear_entities(&mut self) {
        self.towers = TowerRegistry::new();
        self.grid = BuildGrid::new(*self.grid.tile_grid());
        self.path_tiles.clear();
        self.path_pixels.clear();
        self.enemies.clear();
        self.pending.clear();
        self.projectiles.clear();
        self.spawn_timer = 0;
        self.wave_in_progress = false;
        self.defeat_reported = false;
    }

    fn refund_for(&self, kind: TowerKind) -> u32 {
        let refund = f64::from(kind.stats().cost) * f64::from(self.refund_ratio);
        refund.max(0.0).floor() as u32
    }

    fn place_tower(&mut self, kind: TowerKind, tile: Tile, out_events: &mut Vec<Event>) {
        let cost = kind.stats().cost;
        let rejection = if !self.grid.tile_grid().contains(tile) {
            Some(PlacementError::OutOfBounds)
        } else if self.grid.is_occupied(tile) {
            Some(PlacementError::Occupied)
        } else if self.grid.is_on_path(tile) {
            Some(PlacementError::OnPath)
        } else if self.economy.coins < cost {
            Some(PlacementError::InsufficientFunds)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(?kind, ?tile, ?reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
            return;
        }

        self.economy.coins -= cost;
        let position = self.grid.tile_grid().tile_center(tile);
        let tower = self.towers.insert(kind, tile, position);
        self.grid.occupy(tile);
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            tile,
            cost,
        });
    }

    fn release_tower(&mut self, tower: Tower, cause: RemovalCause, out_events: &mut Vec<Event>) {
        let refund = self.refund_for(tower.kind());
        self.economy.coins = self.economy.coins.saturating_add(refund);
        self.grid.vacate(tower.tile());
        out_events.push(Event::TowerRemoved {
            tower: tower.id(),
            tile: tower.tile(),
            refund,
            cause,
        });
    }

    fn begin_wave(
        &mut self,
        wave: u32,
        roster: Vec<EnemyKind>,
        spawn_interval: u32,
        scaling: WaveScaling,
        out_events: &mut Vec<Event>,
    ) {
        self.pending.clear();
        self.enemies.clear();
        self.spawn_timer = 0;
        self.spawn_interval = spawn_interval;
        self.economy.wave = wave;

        for kind in roster {
            let id = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
            self.pending.push_back(Enemy::new(id, kind, scaling));
        }

        self.wave_in_progress = true;
        info!(wave, enemies = self.pending.len(), "wave started");
        out_events.push(Event::WaveStarted {
            wave,
            enemies: self.pending.len(),
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.spawn_next(out_events);
        self.move_enemies(out_events);
        self.fire_towers(out_events);
        self.advance_projectiles(out_events);
        self.resolve_wave_state(out_events);
    }

    fn spawn_next(&mut self, out_events: &mut Vec<Event>) {
        self.spawn_timer = self.spawn_timer.saturating_add(1);
        if self.spawn_timer < self.spawn_interval || self.pending.is_empty() {
            return;
        }

        let Some(&entrance) = self.path_pixels.first() else {
            self.spawn_timer = self.spawn_interval;
            return;
        };

        if !self.entrance_clear(entrance) {
            debug!(tick = self.tick_index, "spawn deferred, entrance occupied");
            self.spawn_timer = self.spawn_interval;
            return;
        }

        let Some(mut enemy) = self.pending.pop_front() else {
            return;
        };
        enemy.enter(entrance);
        self.spawn_timer = 0;
        out_events.push(Event::EnemySpawned {
            enemy: enemy.id(),
            kind: enemy.kind(),
        });
        self.enemies.push(enemy);
    }

    fn entrance_clear(&self, entrance: Vec2) -> bool {
        let clearance_sq = self.spawn_clearance * self.spawn_clearance;
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .all(|enemy| enemy.position().distance_squared(entrance) >= clearance_sq)
    }

    fn move_enemies(&mut self, out_events: &mut Vec<Event>) {
        let path = &self.path_pixels;
        let economy = &mut self.economy;
        self.enemies.retain_mut(|enemy| {
            if !enemy.is_alive() {
                return false;
            }

            enemy.advance(path);
            if enemy.reached_end() {
                economy.health = economy.health.saturating_sub(1);
                out_events.push(Event::EnemyEscaped {
                    enemy: enemy.id(),
                    health: economy.health,
                });
                return false;
            }
            true
        });
    }

    fn fire_towers(&mut self, out_events: &mut Vec<Event>) {
        let enemies = &self.enemies;
        for tower in self.towers.iter_mut() {
            let Some(target) = tower.shoot(enemies) else {
                continue;
            };

            let id = ProjectileId::new(self.next_projectile_id);
            self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
            self.projectiles.push(Projectile::new(
                id,
                tower.position(),
                target,
                tower.stats().damage,
                self.projectile_speed,
            ));
            out_events.push(Event::ProjectileFired {
                tower: tower.id(),
                kind: tower.kind(),
                target,
            });
        }
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let enemies = &mut self.enemies;
        let economy = &mut self.economy;
        self.projectiles
            .retain_mut(|projectile| match projectile.advance(enemies) {
                ProjectileOutcome::InFlight => true,
                ProjectileOutcome::Impact {
                    target,
                    damage,
                    reward,
                } => {
                    out_events.push(Event::ProjectileImpact {
                        projectile: projectile.id(),
                        target,
                        damage,
                    });
                    if reward > 0 {
                        economy.coins = economy.coins.saturating_add(reward);
                        economy.score = economy.score.saturating_add(reward);
                        out_events.push(Event::EnemyKilled {
                            enemy: target,
                            bounty: reward,
                        });
                    }
                    false
                }
                ProjectileOutcome::Orphaned => {
                    out_events.push(Event::ProjectileOrphaned {
                        projectile: projectile.id(),
                    });
                    false
                }
            });
    }

    fn resolve_wave_state(&mut self, out_events: &mut Vec<Event>) {
        if self.economy.health == 0 {
            if !self.defeat_reported {
                self.defeat_reported = true;
                self.wave_in_progress = false;
                info!(score = self.economy.score, "player defeated");
                out_events.push(Event::PlayerDefeated {
                    score: self.economy.score,
                });
            }
            return;
        }

        let cleared = self.pending.is_empty() && self.enemies.iter().all(|enemy| !enemy.is_alive());
        if self.wave_in_progress && cleared {
            self.wave_in_progress = false;
            info!(wave = self.economy.wave, "wave cleared");
            out_events.push(Event::WaveCleared {
                wave: self.economy.wave,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            tile_size,
        } => {
            world.grid = BuildGrid::new(TileGrid::new(columns, rows, tile_size));
            world.clear_entities();
        }
        Command::ResetGame {
            coins,
            health,
            total_waves,
            refund_ratio,
        } => {
            world.clear_entities();
            world.economy = EconomySnapshot {
                coins,
                score: 0,
                health,
                wave: 1,
                total_waves,
            };
            world.refund_ratio = refund_ratio;
            world.next_enemy_id = 0;
            world.next_projectile_id = 0;
            world.tick_index = 0;
        }
        Command::ConfigureCombat {
            projectile_speed,
            spawn_clearance,
        } => {
            world.projectile_speed = projectile_speed;
            world.spawn_clearance = spawn_clearance;
        }
        Command::InstallPath { tiles, pixels } => {
            world.grid.set_path(&tiles);
            out_events.push(Event::PathInstalled {
                tiles: tiles.len(),
                points: pixels.len(),
            });
            world.path_tiles = tiles;
            world.path_pixels = pixels;
        }
        Command::BeginWave {
            wave,
            roster,
            spawn_interval,
            scaling,
        } => world.begin_wave(wave, roster, spawn_interval, scaling, out_events),
        Command::Tick => world.tick(out_events),
        Command::PlaceTower { kind, tile } => world.place_tower(kind, tile, out_events),
        Command::SellTower { tower } => match world.towers.remove(tower) {
            Some(removed) => world.release_tower(removed, RemovalCause::Sold, out_events),
            None => debug!(?tower, "sale ignored, tower not placed"),
        },
        Command::UndoPlacement => match world.towers.undo() {
            Some(removed) => world.release_tower(removed, RemovalCause::Undone, out_events),
            None => debug!("undo ignored, placement history empty"),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::HashSet;

    use glam::Vec2;
    use tower_defence_core::{
        EconomySnapshot, EnemyKind, EnemySnapshot, ProjectileSnapshot, Tile, TileGrid, TowerId,
        TowerKind, TowerSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        world.grid.tile_grid()
    }

    /// Reports whether a tower could be placed on the tile, ignoring cost.
    #[must_use]
    pub fn is_buildable(world: &World, tile: Tile) -> bool {
        world.grid.is_buildable(tile)
    }

    /// Tiles of the active path from entry to exit.
    #[must_use]
    pub fn path_tiles(world: &World) -> &[Tile] {
        &world.path_tiles
    }

    /// Resampled pixel polyline of the active path.
    #[must_use]
    pub fn path_pixels(world: &World) -> &[Vec2] {
        &world.path_pixels
    }

    /// Reports whether a path has been installed since the last reset.
    #[must_use]
    pub fn has_path(world: &World) -> bool {
        !world.path_pixels.is_empty()
    }

    /// Tiles that path generation must route around: every tile holding a tower.
    #[must_use]
    pub fn blocked_tiles(world: &World) -> HashSet<Tile> {
        world.towers.iter().map(|tower| tower.tile()).collect()
    }

    /// Snapshots of the enemies currently on the path, in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world
            .enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.snapshot())
            .collect()
    }

    /// Archetypes still waiting in the spawn queue, front first.
    #[must_use]
    pub fn pending_spawns(world: &World) -> Vec<EnemyKind> {
        world.pending.iter().map(|enemy| enemy.kind()).collect()
    }

    /// Snapshots of every placed tower in placement order.
    #[must_use]
    pub fn towers(world: &World) -> Vec<TowerSnapshot> {
        world.towers.iter().map(|tower| tower.snapshot()).collect()
    }

    /// Snapshot of the tower with the provided identifier, if it is still placed.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(id).map(|tower| tower.snapshot())
    }

    /// Snapshot of the tower standing on the tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, tile: Tile) -> Option<TowerSnapshot> {
        world.towers.at(tile).map(|tower| tower.snapshot())
    }

    /// Coins a sale or undo of a tower of this kind would return.
    #[must_use]
    pub fn refund_quote(world: &World, kind: TowerKind) -> u32 {
        world.refund_for(kind)
    }

    /// Identifiers of placed towers, oldest first, as consulted by undo.
    #[must_use]
    pub fn placement_history(world: &World) -> &[TowerId] {
        world.towers.history()
    }

    /// Snapshots of projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Copy of the economy and progression counters.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        world.economy
    }

    /// Ticks between successive spawns in the current wave.
    #[must_use]
    pub fn spawn_interval(world: &World) -> u32 {
        world.spawn_interval
    }

    /// Reports whether a wave is running and has not yet been cleared.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        world.wave_in_progress
    }

    /// Number of ticks processed since the last reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
