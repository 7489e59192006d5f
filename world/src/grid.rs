//! Per-tile buildability state.

use tower_defence_core::{Tile, TileGrid};

/// Dense tower-occupancy and path masks laid over the tile grid.
///
/// A tile is buildable iff it lies on the grid, no tower occupies it and it is
/// not part of the active path. Path tiles stay traversable for enemies.
#[derive(Clone, Debug)]
pub(crate) struct BuildGrid {
    grid: TileGrid,
    towers: Vec<bool>,
    path: Vec<bool>,
}

impl BuildGrid {
    /// Creates an empty grid with every tile buildable.
    pub(crate) fn new(grid: TileGrid) -> Self {
        let count = usize::try_from(grid.columns().get()).unwrap_or(0)
            * usize::try_from(grid.rows().get()).unwrap_or(0);
        Self {
            grid,
            towers: vec![false; count],
            path: vec![false; count],
        }
    }

    /// Geometry of the underlying tile grid.
    pub(crate) const fn tile_grid(&self) -> &TileGrid {
        &self.grid
    }

    pub(crate) fn is_buildable(&self, tile: Tile) -> bool {
        self.index(tile)
            .is_some_and(|index| !self.towers[index] && !self.path[index])
    }

    pub(crate) fn is_occupied(&self, tile: Tile) -> bool {
        self.index(tile).is_some_and(|index| self.towers[index])
    }

    pub(crate) fn is_on_path(&self, tile: Tile) -> bool {
        self.index(tile).is_some_and(|index| self.path[index])
    }

    pub(crate) fn occupy(&mut self, tile: Tile) {
        if let Some(index) = self.index(tile) {
            self.towers[index] = true;
        }
    }

    pub(crate) fn vacate(&mut self, tile: Tile) {
        if let Some(index) = self.index(tile) {
            self.towers[index] = false;
        }
    }

    /// Replaces the path mask with the provided tiles. Off-grid tiles are ignored.
    pub(crate) fn set_path(&mut self, tiles: &[Tile]) {
        self.path.fill(false);
        for &tile in tiles {
            if let Some(index) = self.index(tile) {
                self.path[index] = true;
            }
        }
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        if !self.grid.contains(tile) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.grid.columns().get()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
