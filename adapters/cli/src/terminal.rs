//! Text backend that draws scenes as character grids.

use std::{collections::HashMap, fmt::Write as _, io::Write};

use anyhow::{Context, Result};
use tower_defence_core::{GameMode, Tile, TileCoord, TileGrid, TowerKind};
use tower_defence_rendering::{
    AssetLookup, AudioSink, RenderingBackend, Scene, SoundCue, SpriteAsset, SpriteKey,
};

const PATH: char = '#';
const BUILDABLE: char = '.';
const BLOCKED: char = ' ';

/// Writes one text frame per presented scene.
pub(crate) struct TerminalRenderer<W, A> {
    out: W,
    assets: A,
}

impl<W: Write, A: AssetLookup> TerminalRenderer<W, A> {
    pub(crate) fn new(out: W, assets: A) -> Self {
        Self { out, assets }
    }

    fn glyph(&self, key: SpriteKey) -> char {
        match self.assets.resolve(key) {
            SpriteAsset::Placeholder(placeholder) => placeholder.glyph,
            SpriteAsset::Loaded(_) => key.name().chars().next().unwrap_or('?'),
        }
    }

    fn draw(&self, scene: &Scene) -> String {
        let mut frame = String::new();
        match scene.mode {
            GameMode::Menu => frame.push_str("== Tower Defence ==\n"),
            GameMode::Game => self.draw_board(scene, &mut frame),
            GameMode::Leaderboard | GameMode::GameOver => {
                let title = if scene.mode == GameMode::GameOver {
                    "== Game Over =="
                } else {
                    "== Leaderboard =="
                };
                frame.push_str(title);
                frame.push('\n');
                frame.push_str(&leaderboard_lines(&scene.leaderboard));
            }
        }
        frame
    }

    fn draw_board(&self, scene: &Scene, frame: &mut String) {
        let grid = &scene.grid;
        let tiles = TileGrid::new(
            TileCoord::new(grid.columns),
            TileCoord::new(grid.rows),
            grid.tile_size,
        );
        let mut cells = base_cells(&tiles, &scene.path_tiles, |tile| grid.is_buildable(tile));

        for tower in &scene.towers {
            set(&mut cells, &tiles, tower.tile, self.glyph(SpriteKey::Tower(tower.kind)));
        }
        for enemy in &scene.enemies {
            if let Some(tile) = tiles.tile_at(enemy.position) {
                set(&mut cells, &tiles, tile, self.glyph(SpriteKey::Enemy(enemy.kind)));
            }
        }
        for projectile in &scene.projectiles {
            if let Some(tile) = tiles.tile_at(projectile.position) {
                set(&mut cells, &tiles, tile, self.glyph(SpriteKey::Projectile));
            }
        }

        let hud = scene.hud;
        let _ = writeln!(
            frame,
            "wave {}/{}  health {}  coins {}  score {}",
            hud.wave, hud.total_waves, hud.health, hud.coins, hud.score
        );
        frame.push_str(&join_rows(&cells));
    }
}

impl<W: Write, A: AssetLookup> RenderingBackend for TerminalRenderer<W, A> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let frame = self.draw(scene);
        self.out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush())
            .context("failed to write frame to terminal")
    }
}

/// Draws a bare path over an otherwise empty grid.
pub(crate) fn path_map(grid: &TileGrid, path: &[Tile]) -> String {
    join_rows(&base_cells(grid, path, |_| true))
}

pub(crate) fn leaderboard_lines(scores: &[u32]) -> String {
    if scores.is_empty() {
        return "no scores recorded\n".to_owned();
    }
    let mut lines = String::new();
    for (rank, score) in scores.iter().enumerate() {
        let _ = writeln!(lines, "{:>2}. {score}", rank + 1);
    }
    lines
}

fn base_cells<F>(grid: &TileGrid, path: &[Tile], is_buildable: F) -> Vec<Vec<char>>
where
    F: Fn(Tile) -> bool,
{
    let mut cells: Vec<Vec<char>> = (0..grid.rows().get())
        .map(|row| {
            (0..grid.columns().get())
                .map(|column| {
                    if is_buildable(Tile::new(column, row)) {
                        BUILDABLE
                    } else {
                        BLOCKED
                    }
                })
                .collect()
        })
        .collect();
    for tile in path {
        set(&mut cells, grid, *tile, PATH);
    }
    cells
}

fn set(cells: &mut [Vec<char>], grid: &TileGrid, tile: Tile, glyph: char) {
    if !grid.contains(tile) {
        return;
    }
    if let Some(cell) = cells
        .get_mut(tile.row() as usize)
        .and_then(|row| row.get_mut(tile.column() as usize))
    {
        *cell = glyph;
    }
}

fn join_rows(cells: &[Vec<char>]) -> String {
    let mut text = String::with_capacity(cells.iter().map(|row| row.len() + 1).sum());
    for row in cells {
        text.extend(row.iter());
        text.push('\n');
    }
    text
}

/// Counts tower shots instead of playing them.
#[derive(Debug, Default)]
pub(crate) struct CueTally {
    shots: HashMap<TowerKind, u64>,
}

impl CueTally {
    pub(crate) fn summary(&self) -> String {
        TowerKind::ALL
            .into_iter()
            .map(|kind| format!("{} {}", kind.name(), self.shots.get(&kind).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl AudioSink for CueTally {
    fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::TowerFired(kind) => *self.shots.entry(kind).or_insert(0) += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{tile_center, EnemyId, EnemyKind, TowerId};
    use tower_defence_rendering::{GridPresentation, Hud, NoAssets, SceneEnemy, SceneTower};

    fn scene() -> Scene {
        let path_tiles: Vec<Tile> = (0..4).map(|column| Tile::new(column, 1)).collect();
        Scene {
            mode: GameMode::Game,
            grid: GridPresentation::new(4, 3, 10, |tile| tile.row() != 1),
            path_points: path_tiles.iter().map(|tile| tile_center(*tile, 10)).collect(),
            path_tiles,
            enemies: vec![SceneEnemy {
                id: EnemyId::new(0),
                kind: EnemyKind::Scout,
                position: tile_center(Tile::new(1, 1), 10),
                health_ratio: 1.0,
            }],
            towers: vec![SceneTower {
                id: TowerId::new(0),
                kind: TowerKind::Sniper,
                tile: Tile::new(2, 0),
                position: tile_center(Tile::new(2, 0), 10),
                range: 200.0,
                facing: 0.0,
                selected: false,
                show_range: false,
            }],
            projectiles: Vec::new(),
            hud: Hud {
                health: 20,
                coins: 100,
                score: 0,
                wave: 1,
                total_waves: 5,
            },
            build_menu: None,
            tower_menu: None,
            leaderboard: Vec::new(),
        }
    }

    #[test]
    fn board_frames_use_placeholder_glyphs() {
        let mut out = Vec::new();
        TerminalRenderer::new(&mut out, NoAssets)
            .present(&scene())
            .expect("frame written");

        let frame = String::from_utf8(out).expect("utf-8 frame");
        assert_eq!(
            frame,
            "wave 1/5  health 20  coins 100  score 0\n..N.\n#s##\n....\n\n"
        );
    }

    #[test]
    fn path_map_marks_only_the_path() {
        let grid = TileGrid::new(TileCoord::new(3), TileCoord::new(3), 10);
        let path = [Tile::new(0, 1), Tile::new(1, 1), Tile::new(1, 2), Tile::new(2, 2)];
        assert_eq!(path_map(&grid, &path), "...\n##.\n.##\n");
    }

    #[test]
    fn tally_counts_shots_per_tower() {
        let mut tally = CueTally::default();
        tally.play(SoundCue::TowerFired(TowerKind::Sniper));
        tally.play(SoundCue::TowerFired(TowerKind::Sniper));
        tally.play(SoundCue::TowerFired(TowerKind::Shotgun));
        assert_eq!(tally.summary(), "Bazooka 0, Sniper 2, Shotgun 1");
    }
}
