#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session state machine driving the Tower Defence world.
//!
//! A [`Session`] owns the world, the seeded random stream and the player's
//! selection. It translates [`PlayerAction`] values into world commands,
//! advances the world one fixed tick at a time while in [`GameMode::Game`],
//! starts each wave on a freshly generated path when one can be found, and
//! records the final score exactly once when the game is won or lost.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tower_defence_core::{
    validate_archetypes, ArchetypeError, Command, ConfigError, Event, GameConfig, GameMode,
    ScoreStore, Tile, TileCoord, TowerId,
};
use tower_defence_system_build_menu::BuildMenu;
use tower_defence_system_pathing::{to_pixels, PathGenerator};
use tower_defence_system_waves::WavePlanner;
use tower_defence_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Input the player can give, already mapped from raw keys and clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Starts a new game from the title screen.
    StartGame,
    /// Opens the leaderboard from the title screen.
    ShowLeaderboard,
    /// Leaves the leaderboard or defeat screen.
    ReturnToMenu,
    /// Clicks a tile: selects a tower or opens the build menu on an empty tile.
    SelectTile(Tile),
    /// Buys the option at the given index of the open build menu.
    Build(usize),
    /// Shows or hides the selected tower's range.
    ToggleRange,
    /// Sells the selected tower.
    SellSelected,
    /// Removes the most recently placed tower still standing.
    UndoLastPlacement,
    /// Closes any open menu and clears the selection.
    CloseMenus,
}

/// Player selection and open menus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Tower whose context menu is open.
    pub tower: Option<TowerId>,
    /// Whether the selected tower's range is shown.
    pub show_range: bool,
    /// Tile the open build menu would build on.
    pub build_tile: Option<Tile>,
}

/// Failures that prevent a session from starting.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The archetype tables are inconsistent.
    #[error(transparent)]
    Archetypes(#[from] ArchetypeError),
    /// The configuration cannot drive a playable game.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

enum TickOutcome {
    Defeated(u32),
    Cleared(u32),
}

/// One player's run through menus, waves and the leaderboard.
#[derive(Debug)]
pub struct Session<S> {
    mode: GameMode,
    world: World,
    config: GameConfig,
    rng: ChaCha8Rng,
    paths: PathGenerator,
    planner: WavePlanner,
    menu: BuildMenu,
    store: S,
    selection: Selection,
    leaderboard: Vec<u32>,
    final_score: Option<u32>,
    events: Vec<Event>,
}

impl<S: ScoreStore> Session<S> {
    /// Validates the archetype tables and configuration, then opens the title screen.
    pub fn new(config: GameConfig, store: S, seed: u64) -> Result<Self, SessionError> {
        validate_archetypes()?;
        config.validate()?;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: TileCoord::new(config.grid.columns),
                rows: TileCoord::new(config.grid.rows),
                tile_size: config.grid.tile_size,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::ConfigureCombat {
                projectile_speed: config.combat.projectile_speed,
                spawn_clearance: config.combat.spawn_clearance,
            },
            &mut events,
        );

        info!(seed, "session created");
        Ok(Self {
            mode: GameMode::Menu,
            world,
            paths: PathGenerator::new(config.pathing),
            planner: WavePlanner::new(config.waves),
            menu: BuildMenu::new(),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            store,
            selection: Selection::default(),
            leaderboard: Vec::new(),
            final_score: None,
            events,
        })
    }

    /// Active screen.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Cost-ordered build menu.
    #[must_use]
    pub fn build_menu(&self) -> &BuildMenu {
        &self.menu
    }

    /// Current selection and open menus.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Leaderboard as last loaded or saved.
    #[must_use]
    pub fn leaderboard(&self) -> &[u32] {
        &self.leaderboard
    }

    /// Score recorded when the last game ended.
    #[must_use]
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Events produced by the most recent [`Session::tick`] or [`Session::handle`] call.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Applies one player action for the active screen; actions for other screens are ignored.
    pub fn handle(&mut self, action: PlayerAction) {
        self.events.clear();
        match (self.mode, action) {
            (GameMode::Menu, PlayerAction::StartGame) => {
                self.mode = GameMode::Game;
                self.reset_game();
            }
            (GameMode::Menu, PlayerAction::ShowLeaderboard) => {
                self.leaderboard = match self.store.load() {
                    Ok(scores) => scores,
                    Err(error) => {
                        warn!(%error, "failed to load leaderboard");
                        Vec::new()
                    }
                };
                self.mode = GameMode::Leaderboard;
            }
            (GameMode::Leaderboard | GameMode::GameOver, PlayerAction::ReturnToMenu) => {
                self.mode = GameMode::Menu;
            }
            (GameMode::Game, PlayerAction::SelectTile(tile)) => self.select_tile(tile),
            (GameMode::Game, PlayerAction::Build(index)) => self.build(index),
            (GameMode::Game, PlayerAction::ToggleRange) => {
                if self.selection.tower.is_some() {
                    self.selection.show_range = !self.selection.show_range;
                }
            }
            (GameMode::Game, PlayerAction::SellSelected) => {
                if let Some(tower) = self.selection.tower {
                    self.apply(Command::SellTower { tower });
                    self.selection = Selection::default();
                }
            }
            (GameMode::Game, PlayerAction::UndoLastPlacement) => {
                self.apply(Command::UndoPlacement);
                let selected = self.selection.tower;
                let removed_selected = self.events.iter().any(|event| {
                    matches!(event, Event::TowerRemoved { tower, .. } if Some(*tower) == selected)
                });
                if removed_selected {
                    self.selection = Selection::default();
                }
            }
            (GameMode::Game, PlayerAction::CloseMenus) => self.selection = Selection::default(),
            (mode, action) => debug!(?mode, ?action, "action ignored on this screen"),
        }
    }

    /// Advances the game by one fixed tick. Does nothing outside [`GameMode::Game`].
    pub fn tick(&mut self) {
        self.events.clear();
        if self.mode != GameMode::Game {
            return;
        }

        let start = self.events.len();
        self.apply(Command::Tick);

        // The world reports defeat and wave clear in different ticks.
        let outcome = self.events[start..].iter().find_map(|event| match event {
            Event::PlayerDefeated { score } => Some(TickOutcome::Defeated(*score)),
            Event::WaveCleared { wave } => Some(TickOutcome::Cleared(*wave)),
            _ => None,
        });
        match outcome {
            Some(TickOutcome::Defeated(score)) => self.finish(GameMode::GameOver, score),
            Some(TickOutcome::Cleared(wave)) => {
                let economy = query::economy(&self.world);
                if wave < economy.total_waves {
                    self.start_wave(wave + 1);
                } else {
                    self.finish(GameMode::Leaderboard, economy.score);
                }
            }
            None => {}
        }
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn reset_game(&mut self) {
        let economy = self.config.economy;
        self.apply(Command::ResetGame {
            coins: economy.starting_coins,
            health: economy.starting_health,
            total_waves: self.config.waves.total,
            refund_ratio: economy.refund_ratio,
        });
        self.selection = Selection::default();
        self.final_score = None;
        self.start_wave(1);
    }

    /// Generates a path around the towers and enqueues the wave's roster.
    ///
    /// When generation exhausts its budget the previous path stays installed
    /// and the wave starts empty, so it clears on the next tick and the
    /// following wave start tries generation again.
    fn start_wave(&mut self, wave: u32) {
        self.selection = Selection::default();

        let installed = self.install_path();
        let plan = self.planner.plan(wave, &mut self.rng);
        let roster = if installed {
            plan.roster
        } else {
            warn!(wave, "no fresh path, wave starts empty");
            Vec::new()
        };
        self.apply(Command::BeginWave {
            wave: plan.wave,
            roster,
            spawn_interval: plan.spawn_interval,
            scaling: plan.scaling,
        });
    }

    fn install_path(&mut self) -> bool {
        let grid = *query::tile_grid(&self.world);
        let blocked = query::blocked_tiles(&self.world);
        let Some(path) = self.paths.generate(&grid, &blocked, &mut self.rng) else {
            return false;
        };
        let tiles = path.into_tiles();
        let pixels = to_pixels(&tiles, grid.tile_size());
        self.apply(Command::InstallPath { tiles, pixels });
        true
    }

    fn finish(&mut self, mode: GameMode, score: u32) {
        match self.store.save(score) {
            Ok(scores) => self.leaderboard = scores,
            Err(error) => warn!(%error, score, "failed to save score"),
        }
        info!(?mode, score, "game finished");
        self.final_score = Some(score);
        self.selection = Selection::default();
        self.mode = mode;
    }

    fn select_tile(&mut self, tile: Tile) {
        if let Some(tower) = query::tower_at(&self.world, tile) {
            self.selection = Selection {
                tower: Some(tower.id),
                show_range: false,
                build_tile: None,
            };
            return;
        }

        self.selection = Selection::default();
        if query::is_buildable(&self.world, tile) {
            self.selection.build_tile = Some(tile);
        }
    }

    fn build(&mut self, index: usize) {
        let Some(tile) = self.selection.build_tile.take() else {
            return;
        };
        let coins = query::economy(&self.world).coins;
        match self.menu.choose(index, coins) {
            Some(kind) => self.apply(Command::PlaceTower { kind, tile }),
            None => debug!(index, coins, "build option unavailable"),
        }
    }
}
