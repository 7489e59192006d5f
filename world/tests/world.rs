use glam::Vec2;
use tower_defence_core::{
    tile_center, Command, EnemyKind, Event, PlacementError, RemovalCause, Tile, TileCoord,
    TowerKind, WaveScaling,
};
use tower_defence_world::{self as world, query, World};

const TILE_SIZE: u32 = 40;

fn corridor_world(coins: u32, health: u32) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            columns: TileCoord::new(10),
            rows: TileCoord::new(5),
            tile_size: TILE_SIZE,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::ResetGame {
            coins,
            health,
            total_waves: 3,
            refund_ratio: 0.6,
        },
        &mut events,
    );

    let tiles: Vec<Tile> = (0..10).map(|column| Tile::new(column, 2)).collect();
    let pixels: Vec<Vec2> = tiles
        .iter()
        .map(|tile| tile_center(*tile, TILE_SIZE))
        .collect();
    world::apply(&mut world, Command::InstallPath { tiles, pixels }, &mut events);
    world
}

fn begin_wave(world: &mut World, roster: Vec<EnemyKind>, events: &mut Vec<Event>) {
    world::apply(
        world,
        Command::BeginWave {
            wave: 1,
            roster,
            spawn_interval: 1,
            scaling: WaveScaling::IDENTITY,
        },
        events,
    );
}

fn place(world: &mut World, kind: TowerKind, tile: Tile) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::PlaceTower { kind, tile }, &mut events);
    events
}

#[test]
fn placement_is_rejected_for_each_reason_without_mutation() {
    let mut world = corridor_world(60, 20);

    let placed = place(&mut world, TowerKind::Bazooka, Tile::new(3, 1));
    assert!(matches!(
        placed.as_slice(),
        [Event::TowerPlaced { cost: 50, .. }]
    ));

    let cases = [
        (TowerKind::Bazooka, Tile::new(10, 1), PlacementError::OutOfBounds),
        (TowerKind::Bazooka, Tile::new(3, 1), PlacementError::Occupied),
        (TowerKind::Bazooka, Tile::new(4, 2), PlacementError::OnPath),
        (TowerKind::Sniper, Tile::new(5, 3), PlacementError::InsufficientFunds),
    ];
    for (kind, tile, expected) in cases {
        let events = place(&mut world, kind, tile);
        assert_eq!(
            events,
            vec![Event::TowerPlacementRejected {
                kind,
                tile,
                reason: expected,
            }]
        );
    }

    assert_eq!(query::economy(&world).coins, 10);
    assert_eq!(query::towers(&world).len(), 1);
}

#[test]
fn sold_tower_is_never_resurrected_by_undo() {
    let mut world = corridor_world(200, 20);
    let _ = place(&mut world, TowerKind::Bazooka, Tile::new(1, 1));
    let second = match place(&mut world, TowerKind::Sniper, Tile::new(2, 1)).as_slice() {
        [Event::TowerPlaced { tower, .. }] => *tower,
        other => panic!("unexpected events: {other:?}"),
    };

    let mut events = Vec::new();
    world::apply(&mut world, Command::SellTower { tower: second }, &mut events);
    assert_eq!(
        events,
        vec![Event::TowerRemoved {
            tower: second,
            tile: Tile::new(2, 1),
            refund: 60,
            cause: RemovalCause::Sold,
        }]
    );
    assert!(query::is_buildable(&world, Tile::new(2, 1)));

    events.clear();
    world::apply(&mut world, Command::UndoPlacement, &mut events);
    assert!(matches!(
        events.as_slice(),
        [Event::TowerRemoved {
            tile,
            refund: 30,
            cause: RemovalCause::Undone,
            ..
        }] if *tile == Tile::new(1, 1)
    ));

    events.clear();
    world::apply(&mut world, Command::UndoPlacement, &mut events);
    assert!(events.is_empty());
    assert!(query::towers(&world).is_empty());
    assert!(query::placement_history(&world).is_empty());
    assert_eq!(query::economy(&world).coins, 140);
}

#[test]
fn path_tiles_are_not_buildable_and_towers_block_generation() {
    let mut world = corridor_world(200, 20);
    let _ = place(&mut world, TowerKind::Shotgun, Tile::new(6, 3));

    assert!(!query::is_buildable(&world, Tile::new(0, 2)));
    assert!(query::is_buildable(&world, Tile::new(0, 0)));
    let blocked = query::blocked_tiles(&world);
    assert_eq!(blocked.len(), 1);
    assert!(blocked.contains(&Tile::new(6, 3)));
}

#[test]
fn sniper_kills_scout_and_wave_clears_once() {
    let mut world = corridor_world(200, 5);
    let _ = place(&mut world, TowerKind::Sniper, Tile::new(3, 1));

    let mut events = Vec::new();
    begin_wave(&mut world, vec![EnemyKind::Scout], &mut events);
    for _ in 0..200 {
        world::apply(&mut world, Command::Tick, &mut events);
    }

    let fired: Vec<u64> = events
        .iter()
        .scan(0, |tick, event| {
            if let Event::TimeAdvanced { tick: now } = event {
                *tick = *now;
            }
            Some((*tick, event))
        })
        .filter(|(_, event)| matches!(event, Event::ProjectileFired { .. }))
        .map(|(tick, _)| tick)
        .collect();
    assert_eq!(fired, vec![90]);

    let kills: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyKilled { bounty, .. } => Some(*bounty),
            _ => None,
        })
        .collect();
    assert_eq!(kills, vec![10]);

    let clears = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCleared { wave: 1 }))
        .count();
    assert_eq!(clears, 1);

    let economy = query::economy(&world);
    assert_eq!(economy.coins, 110);
    assert_eq!(economy.score, 10);
    assert_eq!(economy.health, 5);
    assert!(!query::wave_in_progress(&world));
    assert!(query::enemies(&world).is_empty());
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn escaping_enemies_cost_one_health_each() {
    let mut world = corridor_world(200, 20);
    let mut events = Vec::new();
    begin_wave(
        &mut world,
        vec![EnemyKind::Scout, EnemyKind::Soldier],
        &mut events,
    );
    assert_eq!(
        query::pending_spawns(&world),
        vec![EnemyKind::Scout, EnemyKind::Soldier]
    );

    for _ in 0..1_000 {
        world::apply(&mut world, Command::Tick, &mut events);
    }

    let escapes: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyEscaped { health, .. } => Some(*health),
            _ => None,
        })
        .collect();
    assert_eq!(escapes, vec![19, 18]);
    assert!(events.contains(&Event::WaveCleared { wave: 1 }));
    assert_eq!(query::economy(&world).score, 0);
}

#[test]
fn wave_start_scales_enemies_and_sets_interval() {
    let mut world = corridor_world(200, 20);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BeginWave {
            wave: 3,
            roster: vec![EnemyKind::Trooper],
            spawn_interval: 33,
            scaling: WaveScaling {
                health: 1.16,
                speed: 1.04,
            },
        },
        &mut events,
    );
    assert_eq!(events, vec![Event::WaveStarted { wave: 3, enemies: 1 }]);
    assert_eq!(query::spawn_interval(&world), 33);
    assert_eq!(query::economy(&world).wave, 3);

    for _ in 0..33 {
        world::apply(&mut world, Command::Tick, &mut events);
    }
    let enemies = query::enemies(&world);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].max_health, 81);
    assert_eq!(enemies[0].kind, EnemyKind::Trooper);
}
