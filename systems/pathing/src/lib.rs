#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural path generation for enemy routes.
//!
//! A route runs from a random entry tile in the first column to a random exit
//! tile in the last column, detouring through one or two waypoints whose
//! columns increase left to right. Tiles occupied by towers are routed around.
//! Single attempts may fail once towers fragment the grid; [`PathGenerator`]
//! retries within a fixed budget.

mod graph;
mod resample;

use std::collections::HashSet;

use rand::Rng;
use tower_defence_core::{PathingConfig, Tile, TileGrid};
use tracing::{debug, warn};

pub use resample::to_pixels;

use crate::graph::PathGraph;

/// Columns kept free of waypoints at the exit side of the grid.
const WAYPOINT_EXIT_MARGIN: u32 = 4;

/// Tile route produced by a successful generation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPath {
    tiles: Vec<Tile>,
    waypoints: Vec<Tile>,
}

impl GeneratedPath {
    /// Ordered tiles from the entry column to the exit column.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Waypoints the route was forced through, sorted by column.
    #[must_use]
    pub fn waypoints(&self) -> &[Tile] {
        &self.waypoints
    }

    /// Consumes the route, yielding its tiles.
    #[must_use]
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

/// Runs a single generation attempt.
///
/// Returns `None` when the entry or exit tile is blocked or when any
/// consecutive pair of route points is disconnected.
pub fn generate_path<R>(
    grid: &TileGrid,
    blocked: &HashSet<Tile>,
    waypoint_attempts: u32,
    rng: &mut R,
) -> Option<GeneratedPath>
where
    R: Rng + ?Sized,
{
    let columns = grid.columns().get();
    let rows = grid.rows().get();
    if columns == 0 || rows < 3 {
        return None;
    }

    let entry = Tile::new(0, rng.gen_range(1..=rows - 2));
    let exit = Tile::new(columns - 1, rng.gen_range(1..=rows - 2));
    if blocked.contains(&entry) || blocked.contains(&exit) {
        return None;
    }

    let graph = PathGraph::build(grid, blocked, rng);
    let waypoints = pick_waypoints(columns, rows, blocked, waypoint_attempts, rng);

    let mut stops = Vec::with_capacity(waypoints.len() + 2);
    stops.push(entry);
    stops.extend_from_slice(&waypoints);
    stops.push(exit);

    let mut tiles: Vec<Tile> = Vec::new();
    for (index, leg) in stops.windows(2).enumerate() {
        let segment = graph.shortest_path(leg[0], leg[1])?;
        let skip = usize::from(index > 0);
        tiles.extend(segment.into_iter().skip(skip));
    }

    Some(GeneratedPath { tiles, waypoints })
}

/// Draws one or two waypoints with distinct columns, sorted by column.
fn pick_waypoints<R>(
    columns: u32,
    rows: u32,
    blocked: &HashSet<Tile>,
    attempts: u32,
    rng: &mut R,
) -> Vec<Tile>
where
    R: Rng + ?Sized,
{
    let wanted = if rng.gen_bool(0.5) { 1 } else { 2 };
    let max_column = columns.saturating_sub(WAYPOINT_EXIT_MARGIN);
    let mut waypoints: Vec<Tile> = Vec::with_capacity(wanted);
    if max_column < 1 {
        return waypoints;
    }

    let mut tries = 0;
    while waypoints.len() < wanted && tries < attempts {
        tries += 1;
        let candidate = Tile::new(
            rng.gen_range(1..=max_column),
            rng.gen_range(1..=rows - 2),
        );
        if blocked.contains(&candidate) {
            continue;
        }
        if waypoints
            .iter()
            .any(|waypoint| waypoint.column() == candidate.column())
        {
            continue;
        }
        waypoints.push(candidate);
    }

    waypoints.sort_by_key(|waypoint| waypoint.column());
    waypoints
}

/// Path generator that retries failed attempts within a fixed budget.
#[derive(Clone, Copy, Debug)]
pub struct PathGenerator {
    config: PathingConfig,
}

impl PathGenerator {
    /// Creates a generator with the provided retry budgets.
    #[must_use]
    pub const fn new(config: PathingConfig) -> Self {
        Self { config }
    }

    /// Attempts generation up to `generation_attempts` times.
    ///
    /// Returns `None` once the budget is exhausted; callers keep whatever
    /// path they already have.
    pub fn generate<R>(
        &self,
        grid: &TileGrid,
        blocked: &HashSet<Tile>,
        rng: &mut R,
    ) -> Option<GeneratedPath>
    where
        R: Rng + ?Sized,
    {
        for attempt in 1..=self.config.generation_attempts {
            if let Some(path) = generate_path(grid, blocked, self.config.waypoint_attempts, rng) {
                debug!(attempt, tiles = path.tiles.len(), "path generated");
                return Some(path);
            }
        }

        warn!(
            attempts = self.config.generation_attempts,
            blocked = blocked.len(),
            "path generation exhausted its retry budget"
        );
        None
    }
}

impl Default for PathGenerator {
    fn default() -> Self {
        Self::new(PathingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tower_defence_core::TileCoord;

    fn grid(columns: u32, rows: u32) -> TileGrid {
        TileGrid::new(TileCoord::new(columns), TileCoord::new(rows), 40)
    }

    #[test]
    fn identical_seed_reproduces_the_route() {
        let grid = grid(30, 17);
        let first = generate_path(&grid, &HashSet::new(), 60, &mut ChaCha8Rng::seed_from_u64(11));
        let second = generate_path(&grid, &HashSet::new(), 60, &mut ChaCha8Rng::seed_from_u64(11));
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn waypoints_stay_clear_of_the_exit_columns() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let waypoints = pick_waypoints(30, 17, &HashSet::new(), 60, &mut rng);
            assert!(!waypoints.is_empty() && waypoints.len() <= 2);
            assert!(waypoints
                .iter()
                .all(|tile| (1..=26).contains(&tile.column()) && (1..=15).contains(&tile.row())));
            assert!(waypoints
                .windows(2)
                .all(|pair| pair[0].column() < pair[1].column()));
        }
    }

    #[test]
    fn fully_blocked_waypoint_area_yields_no_waypoints() {
        let blocked: HashSet<Tile> = (1..=2)
            .flat_map(|column| (1..=3).map(move |row| Tile::new(column, row)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(pick_waypoints(6, 5, &blocked, 60, &mut rng).is_empty());
    }

    #[test]
    fn walled_grid_exhausts_the_retry_budget() {
        let grid = grid(8, 5);
        let blocked: HashSet<Tile> = (1..4).map(|row| Tile::new(6, row)).collect();
        let generator = PathGenerator::new(PathingConfig {
            generation_attempts: 10,
            waypoint_attempts: 60,
        });
        assert!(generator
            .generate(&grid, &blocked, &mut ChaCha8Rng::seed_from_u64(4))
            .is_none());
    }

    #[test]
    fn blocked_entry_column_fails_immediately() {
        let grid = grid(8, 5);
        let blocked: HashSet<Tile> = (1..4).map(|row| Tile::new(0, row)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert!(generate_path(&grid, &blocked, 60, &mut rng).is_none());
    }
}
