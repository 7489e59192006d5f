//! Scripted player used by headless games.

use tower_defence_core::{Event, ScoreStore, Tile, TowerKind};
use tower_defence_simulation::{PlayerAction, Session};
use tower_defence_world::{query, World};

/// Buys the most expensive affordable tower on the free tile that overlooks the most path.
///
/// Returns the archetype bought, or `None` when nothing was affordable or no tile is free.
pub(crate) fn build_for_wave<S: ScoreStore>(session: &mut Session<S>) -> Option<TowerKind> {
    let coins = query::economy(session.world()).coins;
    let index = session
        .build_menu()
        .entries(coins)
        .iter()
        .rposition(|entry| entry.enabled)?;
    let tile = best_tile(session.world())?;

    session.handle(PlayerAction::SelectTile(tile));
    session.handle(PlayerAction::Build(index));
    session.events().iter().find_map(|event| match event {
        Event::TowerPlaced { kind, .. } => Some(*kind),
        _ => None,
    })
}

fn best_tile(world: &World) -> Option<Tile> {
    let path = query::path_tiles(world);
    let grid = query::tile_grid(world);

    let mut best: Option<(usize, Tile)> = None;
    for row in 0..grid.rows().get() {
        for column in 0..grid.columns().get() {
            let tile = Tile::new(column, row);
            if !query::is_buildable(world, tile) {
                continue;
            }
            let overlooked = path
                .iter()
                .filter(|step| step.chebyshev_distance(tile) <= 1)
                .count();
            if overlooked > 0 && best.map_or(true, |(most, _)| overlooked > most) {
                best = Some((overlooked, tile));
            }
        }
    }
    best.map(|(_, tile)| tile)
}
