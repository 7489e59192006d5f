//! Conversion of tile paths into evenly spaced pixel polylines.

use glam::Vec2;
use tower_defence_core::{tile_center, Tile};

/// Resamples a tile path into a polyline of tile-centre-to-tile-centre steps.
///
/// Each pair of consecutive tiles contributes `chebyshev_distance × tile_size`
/// points (at least one), interpolated from the first centre toward the
/// second. The last tile's centre closes the polyline, so a single-tile path
/// yields exactly that centre and an empty path yields nothing.
#[must_use]
pub fn to_pixels(tiles: &[Tile], tile_size: u32) -> Vec<Vec2> {
    let Some(&last) = tiles.last() else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for pair in tiles.windows(2) {
        let from = tile_center(pair[0], tile_size);
        let to = tile_center(pair[1], tile_size);
        let steps = (pair[0].chebyshev_distance(pair[1]) * tile_size).max(1);
        let delta = to - from;
        points.extend((0..steps).map(|step| from + delta * (step as f32 / steps as f32)));
    }
    points.push(tile_center(last, tile_size));
    points
}
