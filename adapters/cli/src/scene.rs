//! Frame assembly from world queries and the session's selection.

use tower_defence_core::ScoreStore;
use tower_defence_rendering::{
    BuildMenuItem, BuildMenuPresentation, GridPresentation, Hud, Scene, SceneEnemy,
    SceneProjectile, SceneTower, TowerMenuPresentation,
};
use tower_defence_simulation::Session;
use tower_defence_world::query;

/// Builds a read-only description of the session's current frame.
pub(crate) fn capture<S: ScoreStore>(session: &Session<S>) -> Scene {
    let world = session.world();
    let selection = session.selection();
    let grid = query::tile_grid(world);
    let economy = query::economy(world);

    let enemies = query::enemies(world)
        .into_iter()
        .map(|enemy| SceneEnemy {
            id: enemy.id,
            kind: enemy.kind,
            position: enemy.position,
            health_ratio: enemy.health_ratio(),
        })
        .collect();

    let towers = query::towers(world)
        .into_iter()
        .map(|tower| {
            let selected = selection.tower == Some(tower.id);
            SceneTower {
                id: tower.id,
                kind: tower.kind,
                tile: tower.tile,
                position: tower.position,
                range: tower.kind.stats().range,
                facing: tower.facing,
                selected,
                show_range: selected && selection.show_range,
            }
        })
        .collect();

    let projectiles = query::projectiles(world)
        .into_iter()
        .map(|projectile| SceneProjectile {
            position: projectile.position,
            heading: projectile.heading,
        })
        .collect();

    let build_menu = selection.build_tile.map(|tile| BuildMenuPresentation {
        tile,
        items: session
            .build_menu()
            .entries(economy.coins)
            .into_iter()
            .map(|entry| BuildMenuItem {
                kind: entry.option.kind(),
                cost: entry.option.kind().stats().cost,
                enabled: entry.enabled,
            })
            .collect(),
    });

    let tower_menu = selection
        .tower
        .and_then(|id| query::tower(world, id))
        .map(|tower| TowerMenuPresentation {
            tower: tower.id,
            refund: query::refund_quote(world, tower.kind),
            show_range: selection.show_range,
        });

    Scene {
        mode: session.mode(),
        grid: GridPresentation::new(
            grid.columns().get(),
            grid.rows().get(),
            grid.tile_size(),
            |tile| query::is_buildable(world, tile),
        ),
        path_tiles: query::path_tiles(world).to_vec(),
        path_points: query::path_pixels(world).to_vec(),
        enemies,
        towers,
        projectiles,
        hud: Hud {
            health: economy.health,
            coins: economy.coins,
            score: economy.score,
            wave: economy.wave,
            total_waves: economy.total_waves,
        },
        build_menu,
        tower_menu,
        leaderboard: session.leaderboard().to_vec(),
    }
}
